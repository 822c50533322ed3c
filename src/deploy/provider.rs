//! The deployment provider seam.
//!
//! A provider owns everything network-facing: binding a contract name to its
//! bytecode, signing, broadcasting and watching for confirmation. The runner
//! only sees this trait, which keeps it testable with in-memory stubs.

use std::future::Future;

use crate::deploy::error::DeployResult;
use crate::deploy::request::{Deployment, DeploymentRequest, PendingDeployment};

/// External collaborator that creates contracts on chain.
pub trait DeploymentProvider {
    /// Bind the named contract to its constructor arguments and submit the
    /// creation transaction.
    fn submit(
        &self,
        request: &DeploymentRequest,
    ) -> impl Future<Output = DeployResult<PendingDeployment>> + Send;

    /// Suspend until the pending deployment resolves to a live address or
    /// fails.
    fn wait_for_deployment(
        &self,
        pending: PendingDeployment,
    ) -> impl Future<Output = DeployResult<Deployment>> + Send;
}
