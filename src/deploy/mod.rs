//! Contract deployment.
//!
//! # Data Flow
//! ```text
//! DeploymentPlan (from config::resolve)
//!     → runner.rs (dependency, then target; reports the outcome)
//!     → provider.rs (DeploymentProvider: submit, wait_for_deployment)
//!     → artifact.rs (bytecode + constructor encoding, for the alloy provider)
//! ```

pub mod artifact;
pub mod error;
pub mod provider;
pub mod request;
pub mod runner;

pub use artifact::{ArtifactError, ArtifactStore, ContractArtifact};
pub use error::{DeployError, DeployResult};
pub use provider::DeploymentProvider;
pub use request::{
    deployed_line, Deployment, DeploymentPlan, DeploymentReport, DeploymentRequest,
    DeploymentState, NetworkTarget, PendingDeployment,
};
pub use runner::{report_failure, DeploymentRunner, EXIT_FAILURE, EXIT_SUCCESS};
