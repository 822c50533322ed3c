//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! ResolvedNetwork (RPC URL, signing credentials)
//!     → wallet.rs (key loading, signing)
//!     → client.rs (RPC connection with timeouts)
//!     → transaction.rs (bind artifact, sign, broadcast, confirm)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use transaction::ContractDeployer;
pub use types::{BlockchainError, ChainId, ConfirmationStatus};
pub use wallet::Wallet;
