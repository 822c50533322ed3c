//! Athena deployment tool
//!
//! Deploys the Athena contract, wired to an already-deployed dependency,
//! to one configured network.
//!
//! # Flow
//!
//! ```text
//!   .env + process env ──┐
//!                        ▼
//!   deploy.toml ──▶ config::load ──▶ config::resolve ──▶ ResolvedConfig
//!                                                            │
//!                              ┌─────────────────────────────┘
//!                              ▼
//!                    blockchain::ContractDeployer (wallet + RPC client)
//!                              │
//!                              ▼
//!                    deploy::DeploymentRunner
//!                       submit ─▶ wait for receipt ─▶ "Athena deployed to 0x…"
//! ```
//!
//! Exit status is 0 on success and 1 on any failure; stdout carries only the
//! result line, everything else goes to stderr.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use athena_deploy::blockchain::ContractDeployer;
use athena_deploy::config::{load_config, resolve_from_process_env, DeployConfig};
use athena_deploy::deploy::{report_failure, DeployError, DeploymentRunner};
use athena_deploy::observability::init_logging;

#[derive(Parser)]
#[command(name = "athena-deploy")]
#[command(about = "Deploy the Athena contract to a configured network", long_about = None)]
struct Cli {
    /// Deployment configuration file
    #[arg(short, long, default_value = "deploy.toml")]
    config: PathBuf,

    /// Network to deploy to (defaults to `default_network` in the config)
    #[arg(short, long)]
    network: Option<String>,

    /// Log level (overrides the config; RUST_LOG overrides both)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let dotenv = dotenvy::dotenv();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => return ExitCode::from(report_failure(&mut io::stderr(), &DeployError::from(e))),
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.observability.log_level.clone());
    init_logging(&level);

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Failed to load .env"),
    }

    tracing::info!(config = %cli.config.display(), "athena-deploy v0.1.0 starting");

    let runner = match prepare(&config, cli.network.as_deref()).await {
        Ok(runner) => runner,
        Err(e) => return ExitCode::from(report_failure(&mut io::stderr(), &e)),
    };

    let code = runner.run(&mut io::stdout(), &mut io::stderr()).await;
    ExitCode::from(code)
}

/// Resolve the environment and connect the deployer.
async fn prepare(
    config: &DeployConfig,
    network: Option<&str>,
) -> Result<DeploymentRunner<ContractDeployer>, DeployError> {
    let resolved = resolve_from_process_env(config, network)?;

    tracing::info!(
        network = %resolved.network.name,
        contract = %resolved.plan.contract,
        compiler = %resolved.compiler_version,
        "Configuration resolved"
    );

    let deployer = ContractDeployer::connect(&resolved).await?;
    Ok(DeploymentRunner::new(resolved.plan, deployer))
}
