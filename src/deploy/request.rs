//! Deployment request and result types.

use std::fmt;
use std::path::PathBuf;

use alloy::primitives::{Address, TxHash};

use crate::config::schema::DependencySource;

/// What to deploy and where, as injected into the runner.
#[derive(Debug, Clone)]
pub struct DeploymentPlan {
    /// Target contract name.
    pub contract: String,
    /// Source of the address handed to the target's constructor.
    pub dependency: DependencySource,
    /// Root of the Hardhat build output.
    pub artifacts_dir: PathBuf,
    /// Name of the selected network.
    pub network_name: String,
    /// JSON-RPC endpoint of the selected network.
    pub rpc_url: String,
}

/// The network a request is aimed at. Credentials stay with the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkTarget {
    pub name: String,
    pub rpc_url: String,
}

/// A single contract-creation request.
///
/// Built right before submission and dropped once the provider answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    /// Contract name, as found in the build artifacts.
    pub contract: String,
    /// Constructor arguments in declaration order.
    pub constructor_args: Vec<String>,
    pub network: NetworkTarget,
}

impl DeploymentRequest {
    pub fn new(contract: impl Into<String>, constructor_args: Vec<String>, network: NetworkTarget) -> Self {
        Self {
            contract: contract.into(),
            constructor_args,
            network,
        }
    }
}

/// Handle for a submitted creation transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeployment {
    pub contract: String,
    pub tx_hash: TxHash,
}

/// A contract confirmed on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub contract: String,
    pub address: Address,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

/// Local view of a deployment's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentState {
    Pending,
    Deployed(Address),
    Failed(String),
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentState::Pending => write!(f, "pending"),
            DeploymentState::Deployed(address) => write!(f, "deployed at {}", address),
            DeploymentState::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Outcome of a full run: an optional fresh dependency, then the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReport {
    /// Report label and deployment of a dependency deployed in this run.
    pub dependency: Option<(String, Deployment)>,
    pub target: Deployment,
}

/// The operator-facing success line.
pub fn deployed_line(label: &str, address: Address) -> String {
    format!("{} deployed to {}", label, address)
}
