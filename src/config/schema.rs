//! Configuration schema definitions.
//!
//! This module defines the on-disk configuration for a deployment run.
//! All types derive Serde traits for deserialization from `deploy.toml`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::config::validation::ValidationError;

/// Root configuration for the deployment tool.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeployConfig {
    /// Network used when none is selected on the command line.
    #[serde(default = "default_network_name")]
    pub default_network: String,

    /// Solidity compiler settings.
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Named networks (e.g. `bsctestnet`).
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,

    /// The contract to deploy.
    pub deployment: DeploymentConfig,

    /// Observability settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

fn default_network_name() -> String {
    "bsctestnet".to_string()
}

/// Compiler settings.
///
/// The version has no fallback: it must come from the file or from the
/// `COMPILER_VERSION` environment variable.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Exact solc version the artifacts were built with (e.g. "0.8.20").
    pub version: Option<String>,
}

/// A network the tool can deploy to.
///
/// Signing keys are never read from the file, only from the environment
/// variable named by `accounts_env`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Literal JSON-RPC endpoint, used when `url_env` is unset or empty.
    pub url: Option<String>,

    /// Environment variable holding the JSON-RPC endpoint.
    pub url_env: Option<String>,

    /// Environment variable holding the signing key.
    pub accounts_env: Option<String>,

    /// Expected chain ID (e.g. 97 for BSC testnet). Checked, never enforced.
    pub chain_id: Option<u64>,

    /// Timeout applied to each individual RPC request, in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of blocks (including the inclusion block) before a deployment
    /// counts as confirmed.
    pub confirmation_blocks: u32,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            url: None,
            url_env: None,
            accounts_env: None,
            chain_id: None,
            rpc_timeout_secs: 30,
            confirmation_blocks: 1,
            poll_interval_ms: 2000,
        }
    }
}

/// Deployment target settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeploymentConfig {
    /// Name of the contract to deploy (matches the artifact's `contractName`).
    pub contract: String,

    /// Root of the Hardhat build output.
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,

    /// The contract whose address is passed to the constructor.
    pub dependency: DependencyConfig,
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

/// Where the dependency contract comes from.
///
/// Exactly one of `address` or `deploy` must be set.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DependencyConfig {
    /// Name used when reporting a freshly deployed dependency.
    pub label: Option<String>,

    /// Address of an already-deployed contract.
    pub address: Option<String>,

    /// Deploy the dependency on every run instead.
    pub deploy: Option<DependencyDeployConfig>,
}

/// A dependency deployed fresh on each run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DependencyDeployConfig {
    /// Contract name of the dependency.
    pub contract: String,

    /// Constructor arguments, coerced against the constructor ABI.
    #[serde(default)]
    pub args: Vec<String>,
}

/// The validated form of [`DependencyConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySource {
    /// Reuse a contract that is already on chain.
    Existing(Address),
    /// Deploy a new instance before the target.
    Deploy {
        contract: String,
        label: String,
        args: Vec<String>,
    },
}

impl DependencyConfig {
    /// Interpret the raw settings as a [`DependencySource`].
    pub fn source(&self) -> Result<DependencySource, ValidationError> {
        match (&self.address, &self.deploy) {
            (Some(_), Some(_)) => Err(ValidationError::AmbiguousDependency),
            (None, None) => Err(ValidationError::MissingDependency),
            (Some(raw), None) => raw
                .trim()
                .parse::<Address>()
                .map(DependencySource::Existing)
                .map_err(|e| ValidationError::InvalidDependencyAddress {
                    value: raw.clone(),
                    reason: e.to_string(),
                }),
            (None, Some(deploy)) => {
                if deploy.contract.trim().is_empty() {
                    return Err(ValidationError::EmptyContractName("deployment.dependency.deploy"));
                }
                Ok(DependencySource::Deploy {
                    contract: deploy.contract.clone(),
                    label: self.label.clone().unwrap_or_else(|| deploy.contract.clone()),
                    args: deploy.args.clone(),
                })
            }
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
