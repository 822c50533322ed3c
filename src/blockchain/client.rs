//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the network's JSON-RPC endpoint with a signing wallet
//! - Query chain state (chain id, block number, receipts)
//! - Broadcast wallet-filled transactions (nonce, gas and chain id are filled
//!   by alloy's recommended fillers)
//! - Bound every request by the configured timeout

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::TxHash;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::TransportResult;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::blockchain::wallet::Wallet;
use crate::config::ResolvedNetwork;

/// Blockchain RPC client wrapper.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    /// Network this client talks to.
    network: ResolvedNetwork,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// # Arguments
    /// * `network` - Resolved network (URL, timeouts, expected chain id)
    /// * `wallet` - Wallet that signs outgoing transactions
    ///
    /// # Returns
    /// A new client, or an error if the URL is empty or malformed
    pub async fn new(network: &ResolvedNetwork, wallet: &Wallet) -> BlockchainResult<Self> {
        if network.rpc_url.is_empty() {
            return Err(BlockchainError::NotAvailable(format!(
                "no RPC URL configured for network '{}'",
                network.name
            )));
        }

        let url: url::Url = network.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", network.rpc_url, e))
        })?;

        let provider = ProviderBuilder::new()
            .wallet(wallet.ethereum_wallet())
            .connect_http(url);

        let client = Self {
            provider: Arc::new(provider) as Arc<dyn Provider + Send + Sync>,
            network: network.clone(),
            timeout_duration: network.rpc_timeout,
        };

        // Verify chain ID matches configuration
        if network.chain_id.is_some() {
            match client.verify_chain_id().await {
                Ok(()) => {
                    tracing::info!(
                        network = %network.name,
                        chain_id = ?network.chain_id,
                        "Blockchain client initialized"
                    );
                }
                Err(e) => {
                    // Don't fail here; a real problem resurfaces on submission
                    tracing::warn!(
                        error = %e,
                        "Blockchain client initialized but chain verification failed"
                    );
                }
            }
        } else {
            tracing::info!(network = %network.name, "Blockchain client initialized");
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let Some(expected) = self.network.chain_id else {
            return Ok(());
        };
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != expected {
            return Err(BlockchainError::ChainMismatch {
                expected,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.call(self.provider.get_chain_id()).await.map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.call(self.provider.get_block_number()).await
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.call(self.provider.get_transaction_receipt(tx_hash)).await
    }

    /// Fill, sign and broadcast a transaction, returning its hash.
    pub async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let pending = self.call(self.provider.send_transaction(tx)).await?;
        Ok(*pending.tx_hash())
    }

    /// Get the network configuration.
    pub fn network(&self) -> &ResolvedNetwork {
        &self.network
    }

    /// Get the number of confirmation blocks required.
    pub fn confirmation_blocks(&self) -> u32 {
        self.network.confirmation_blocks
    }

    async fn call<T, F>(&self, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = TransportResult<T>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => Err(BlockchainError::Rpc(e.to_string())),
            Err(_) => Err(BlockchainError::Timeout(self.timeout_duration.as_secs())),
        }
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("network", &self.network.name)
            .field("rpc_url", &self.network.rpc_url)
            .field("chain_id", &self.network.chain_id)
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}
