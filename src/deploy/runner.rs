//! The deployment runner.
//!
//! One sequential procedure:
//! ```text
//! dependency address (config, or a fresh deployment)
//!     → submit target with [dependency] as constructor args
//!     → wait for confirmation
//!     → "<Contract> deployed to <address>" on stdout, exit 0
//!
//! any failure → "Error: deployment failed: …" on stderr, exit 1
//! ```
//! No retries and no cleanup: the provider is the only source of truth for
//! what happened on chain.

use std::io::Write;

use alloy::primitives::Address;

use crate::config::schema::DependencySource;
use crate::deploy::error::{DeployError, DeployResult};
use crate::deploy::provider::DeploymentProvider;
use crate::deploy::request::{
    deployed_line, Deployment, DeploymentPlan, DeploymentReport, DeploymentRequest,
    DeploymentState, NetworkTarget,
};

/// Process exit status on success.
pub const EXIT_SUCCESS: u8 = 0;
/// Process exit status on any failure.
pub const EXIT_FAILURE: u8 = 1;

/// Drives a [`DeploymentPlan`] through a [`DeploymentProvider`].
pub struct DeploymentRunner<P> {
    plan: DeploymentPlan,
    provider: P,
}

impl<P: DeploymentProvider> DeploymentRunner<P> {
    pub fn new(plan: DeploymentPlan, provider: P) -> Self {
        Self { plan, provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Deploy the target contract.
    ///
    /// Calling this twice submits two independent creation transactions.
    pub async fn deploy(&self) -> DeployResult<DeploymentReport> {
        let (dependency_address, dependency) = self.resolve_dependency().await?;

        let request = DeploymentRequest::new(
            self.plan.contract.clone(),
            vec![dependency_address.to_string()],
            self.network(),
        );
        let target = self.deploy_one(&request).await?;

        Ok(DeploymentReport { dependency, target })
    }

    /// Deploy and report the outcome.
    ///
    /// Writes one `deployed to` line per contract created to `stdout`, or the
    /// error to `stderr`, and returns the process exit status.
    pub async fn run<O, E>(&self, stdout: &mut O, stderr: &mut E) -> u8
    where
        O: Write,
        E: Write,
    {
        let report = match self.deploy().await {
            Ok(report) => report,
            Err(e) => return report_failure(stderr, &e),
        };

        let mut lines = Vec::with_capacity(2);
        if let Some((label, deployment)) = &report.dependency {
            lines.push(deployed_line(label, deployment.address));
        }
        lines.push(deployed_line(&report.target.contract, report.target.address));

        for line in lines {
            if let Err(e) = writeln!(stdout, "{}", line) {
                let _ = writeln!(stderr, "Error: failed to write to stdout: {}", e);
                return EXIT_FAILURE;
            }
        }
        EXIT_SUCCESS
    }

    /// The address passed to the target's constructor.
    ///
    /// Returns the fresh deployment too when the dependency is deployed in
    /// this run.
    async fn resolve_dependency(&self) -> DeployResult<(Address, Option<(String, Deployment)>)> {
        match &self.plan.dependency {
            DependencySource::Existing(address) => {
                tracing::info!(dependency = %address, "Using existing dependency contract");
                Ok((*address, None))
            }
            DependencySource::Deploy { contract, label, args } => {
                tracing::info!(dependency = %contract, "Deploying dependency contract");
                let request = DeploymentRequest::new(contract.clone(), args.clone(), self.network());
                let deployment = self.deploy_one(&request).await?;
                Ok((deployment.address, Some((label.clone(), deployment))))
            }
        }
    }

    async fn deploy_one(&self, request: &DeploymentRequest) -> DeployResult<Deployment> {
        let mut state = DeploymentState::Pending;
        tracing::info!(
            contract = %request.contract,
            network = %request.network.name,
            args = ?request.constructor_args,
            state = %state,
            "Submitting deployment"
        );

        let result = self.submit_and_wait(request).await;

        state = match &result {
            Ok(deployment) => DeploymentState::Deployed(deployment.address),
            Err(e) => DeploymentState::Failed(e.to_string()),
        };
        match &result {
            Ok(deployment) => tracing::info!(
                contract = %request.contract,
                tx_hash = %deployment.tx_hash,
                block_number = ?deployment.block_number,
                state = %state,
                "Deployment confirmed"
            ),
            Err(_) => tracing::error!(contract = %request.contract, state = %state, "Deployment failed"),
        }
        result
    }

    async fn submit_and_wait(&self, request: &DeploymentRequest) -> DeployResult<Deployment> {
        let pending = self.provider.submit(request).await?;
        tracing::info!(
            contract = %pending.contract,
            tx_hash = %pending.tx_hash,
            "Creation transaction submitted, waiting for confirmation"
        );
        self.provider.wait_for_deployment(pending).await
    }

    fn network(&self) -> NetworkTarget {
        NetworkTarget {
            name: self.plan.network_name.clone(),
            rpc_url: self.plan.rpc_url.clone(),
        }
    }
}

/// Write a failure to `stderr` and return the failure exit status.
pub fn report_failure<E: Write>(stderr: &mut E, error: &DeployError) -> u8 {
    let _ = writeln!(stderr, "Error: {}", error);
    EXIT_FAILURE
}
