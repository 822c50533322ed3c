//! Environment resolution.
//!
//! Turns a validated [`DeployConfig`] plus an environment lookup into the
//! concrete values a deployment needs. The lookup is injected so callers (and
//! tests) decide where variables come from.

use std::fmt;
use std::time::Duration;

use crate::config::loader::ConfigError;
use crate::config::schema::{DependencySource, DeployConfig};
use crate::config::validation::check_compiler_version;
use crate::deploy::request::DeploymentPlan;

/// Environment variable that overrides `[compiler] version`.
pub const COMPILER_VERSION_ENV_VAR: &str = "COMPILER_VERSION";

/// A network with its endpoint and credentials filled in.
#[derive(Clone)]
pub struct ResolvedNetwork {
    pub name: String,
    /// Empty when nothing was configured; the provider rejects it later.
    pub rpc_url: String,
    /// Empty means read-only: nothing can be signed.
    pub signing_credentials: Vec<String>,
    pub chain_id: Option<u64>,
    pub rpc_timeout: Duration,
    pub confirmation_blocks: u32,
    pub poll_interval: Duration,
}

impl fmt::Debug for ResolvedNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedNetwork")
            .field("name", &self.name)
            .field("rpc_url", &self.rpc_url)
            .field("signing_credentials", &format!("<{} redacted>", self.signing_credentials.len()))
            .field("chain_id", &self.chain_id)
            .field("rpc_timeout", &self.rpc_timeout)
            .field("confirmation_blocks", &self.confirmation_blocks)
            .finish()
    }
}

/// Everything a deployment run needs, with no further environment access.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub network: ResolvedNetwork,
    pub compiler_version: String,
    pub plan: DeploymentPlan,
}

/// Resolve a configuration against an environment lookup.
///
/// `network` selects a network by name; `None` uses `default_network`.
pub fn resolve<F>(
    config: &DeployConfig,
    network: Option<&str>,
    env: F,
) -> Result<ResolvedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let name = network.unwrap_or(config.default_network.as_str());
    let network_config = config
        .networks
        .get(name)
        .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))?;

    let rpc_url = network_config
        .url_env
        .as_deref()
        .and_then(&env)
        .filter(|url| !url.is_empty())
        .or_else(|| network_config.url.clone())
        .unwrap_or_default();

    // A set-but-empty key still counts as one credential; it fails at signing.
    let signing_credentials = network_config
        .accounts_env
        .as_deref()
        .and_then(&env)
        .map(|key| vec![key])
        .unwrap_or_default();

    let compiler_version = env(COMPILER_VERSION_ENV_VAR)
        .filter(|v| !v.is_empty())
        .or_else(|| config.compiler.version.clone())
        .ok_or(ConfigError::MissingCompilerVersion)?;
    check_compiler_version(&compiler_version)
        .map_err(|e| ConfigError::Validation(vec![e]))?;

    let dependency: DependencySource = config
        .deployment
        .dependency
        .source()
        .map_err(|e| ConfigError::Validation(vec![e]))?;

    if rpc_url.is_empty() {
        tracing::warn!(network = %name, "No RPC URL configured");
    }
    if signing_credentials.is_empty() {
        tracing::warn!(network = %name, "No signing credentials configured (read-only)");
    }

    Ok(ResolvedConfig {
        network: ResolvedNetwork {
            name: name.to_string(),
            rpc_url: rpc_url.clone(),
            signing_credentials,
            chain_id: network_config.chain_id,
            rpc_timeout: Duration::from_secs(network_config.rpc_timeout_secs),
            confirmation_blocks: network_config.confirmation_blocks,
            poll_interval: Duration::from_millis(network_config.poll_interval_ms),
        },
        compiler_version,
        plan: DeploymentPlan {
            contract: config.deployment.contract.clone(),
            dependency,
            artifacts_dir: config.deployment.artifacts_dir.clone(),
            network_name: name.to_string(),
            rpc_url,
        },
    })
}

/// Resolve against the process environment.
pub fn resolve_from_process_env(
    config: &DeployConfig,
    network: Option<&str>,
) -> Result<ResolvedConfig, ConfigError> {
    resolve(config, network, |key| std::env::var(key).ok())
}
