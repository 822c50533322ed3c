//! Contract-creation transactions and confirmation monitoring.
//!
//! # Responsibilities
//! - Bind a contract name to its artifact and constructor arguments
//! - Sign and broadcast the creation transaction
//! - Poll for the receipt until the contract is live
//!
//! There is no overall deadline on confirmation; each RPC request is bounded
//! by the client's timeout and nothing is retried.

use std::future::Future;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::TransactionRequest;
use tokio::time::{interval, MissedTickBehavior};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ConfirmationStatus};
use crate::blockchain::wallet::Wallet;
use crate::config::ResolvedConfig;
use crate::deploy::artifact::ArtifactStore;
use crate::deploy::error::DeployResult;
use crate::deploy::provider::DeploymentProvider;
use crate::deploy::request::{Deployment, DeploymentRequest, PendingDeployment};

/// Deployment provider backed by a JSON-RPC node and Hardhat artifacts.
#[derive(Debug, Clone)]
pub struct ContractDeployer {
    client: BlockchainClient,
    artifacts: ArtifactStore,
    compiler_version: String,
}

impl ContractDeployer {
    /// Create a deployer from its parts.
    pub fn new(client: BlockchainClient, artifacts: ArtifactStore, compiler_version: String) -> Self {
        Self {
            client,
            artifacts,
            compiler_version,
        }
    }

    /// Build the wallet and client for a resolved configuration.
    pub async fn connect(config: &ResolvedConfig) -> BlockchainResult<Self> {
        let wallet = Wallet::from_credentials(&config.network.name, &config.network.signing_credentials)?;
        let client = BlockchainClient::new(&config.network, &wallet).await?;

        tracing::info!(
            network = %config.network.name,
            deployer = %wallet.address(),
            compiler = %config.compiler_version,
            "Deployer ready"
        );

        Ok(Self::new(
            client,
            ArtifactStore::new(config.plan.artifacts_dir.clone()),
            config.compiler_version.clone(),
        ))
    }

    /// Check a creation transaction's receipt once.
    pub async fn confirmation_status(&self, tx_hash: TxHash) -> BlockchainResult<ConfirmationStatus> {
        let receipt = match self.client.get_transaction_receipt(tx_hash).await? {
            Some(r) => r,
            None => return Ok(ConfirmationStatus::Pending),
        };

        if !receipt.status() {
            return Err(BlockchainError::Reverted(tx_hash));
        }
        let address = receipt
            .contract_address
            .ok_or(BlockchainError::NoContractAddress(tx_hash))?;

        let required = self.client.confirmation_blocks();
        let current_block = self.client.get_block_number().await?;
        let tx_block = receipt.block_number.unwrap_or(current_block);
        // The inclusion block counts as the first confirmation
        let confirmations =
            u32::try_from(current_block.saturating_sub(tx_block) + 1).unwrap_or(u32::MAX);

        if confirmations >= required {
            Ok(ConfirmationStatus::Confirmed {
                address,
                block_number: tx_block,
            })
        } else {
            Ok(ConfirmationStatus::Confirming {
                current: confirmations,
                required,
            })
        }
    }

    /// Wait until a creation transaction is confirmed.
    pub async fn wait_for_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<(Address, u64)> {
        let mut ticker = interval(self.client.network().poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match self.confirmation_status(tx_hash).await? {
                ConfirmationStatus::Pending => {
                    tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                }
                ConfirmationStatus::Confirming { current, required } => {
                    tracing::debug!(
                        tx_hash = %tx_hash,
                        confirmations = current,
                        required = required,
                        "Waiting for confirmations"
                    );
                }
                ConfirmationStatus::Confirmed { address, block_number } => {
                    return Ok((address, block_number));
                }
            }
        }
    }
}

impl DeploymentProvider for ContractDeployer {
    fn submit(
        &self,
        request: &DeploymentRequest,
    ) -> impl Future<Output = DeployResult<PendingDeployment>> + Send {
        self.submit_creation(request)
    }

    fn wait_for_deployment(
        &self,
        pending: PendingDeployment,
    ) -> impl Future<Output = DeployResult<Deployment>> + Send {
        self.await_creation(pending)
    }
}

impl ContractDeployer {
    async fn submit_creation(&self, request: &DeploymentRequest) -> DeployResult<PendingDeployment> {
        let artifact = self.artifacts.load(&request.contract, &self.compiler_version)?;
        let code = artifact.creation_code(&request.constructor_args)?;

        let tx = TransactionRequest::default().with_deploy_code(code);
        let tx_hash = self.client.send_transaction(tx).await?;

        Ok(PendingDeployment {
            contract: request.contract.clone(),
            tx_hash,
        })
    }

    async fn await_creation(&self, pending: PendingDeployment) -> DeployResult<Deployment> {
        let (address, block_number) = self.wait_for_confirmation(pending.tx_hash).await?;
        Ok(Deployment {
            contract: pending.contract,
            address,
            tx_hash: pending.tx_hash,
            block_number: Some(block_number),
        })
    }
}
