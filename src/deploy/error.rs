//! The single "deployment failed" error class.

use thiserror::Error;

use crate::blockchain::types::BlockchainError;
use crate::config::loader::ConfigError;
use crate::deploy::artifact::ArtifactError;

/// Any failure between loading configuration and confirming the contract.
///
/// The variant only records where the failure came from; callers treat them
/// all the same way.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("deployment failed: {0}")]
    Config(#[from] ConfigError),

    #[error("deployment failed: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("deployment failed: {0}")]
    Blockchain(#[from] BlockchainError),

    /// Raised by provider implementations outside the `blockchain` module.
    #[error("deployment failed: {0}")]
    Provider(String),
}

/// Result type for deployment operations.
pub type DeployResult<T> = Result<T, DeployError>;
