//! Wallet management.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables (see `config::resolve`)
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Signing wallet for deployment transactions.
#[derive(Debug, Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    ///
    /// # Security
    /// The private key is parsed and stored securely. It is never logged.
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        // Strip 0x prefix if present
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::debug!(address = %signer.address(), "Wallet initialized");

        Ok(Self { signer })
    }

    /// Build a wallet from the network's signing credentials.
    ///
    /// The first credential signs; an empty list means read-only mode, which
    /// cannot deploy.
    pub fn from_credentials(network: &str, credentials: &[String]) -> BlockchainResult<Self> {
        let first = credentials.first().ok_or_else(|| {
            BlockchainError::Wallet(format!(
                "No signing credentials configured for network '{}'",
                network
            ))
        })?;
        if credentials.len() > 1 {
            tracing::debug!(count = credentials.len(), "Using first of several signing credentials");
        }
        Self::from_private_key(first)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The signer wrapped for alloy's wallet filler.
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}
