//! Athena contract deployment library

pub mod blockchain;
pub mod config;
pub mod deploy;
pub mod observability;

pub use config::{DeployConfig, ResolvedConfig};
pub use deploy::{DeploymentProvider, DeploymentRunner};
