//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! deploy.toml
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DeployConfig (validated, immutable)
//!     → resolve.rs (+ environment: RPC URL, signing key, compiler version)
//!     → ResolvedConfig, injected into the deployment runner
//! ```
//!
//! # Design Decisions
//! - Sections default where a sensible value exists; the compiler version and
//!   the dependency contract never do
//! - Validation separates syntactic (serde) from semantic checks
//! - Environment access is confined to `resolve_from_process_env`

pub mod loader;
pub mod resolve;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use resolve::{resolve, resolve_from_process_env, ResolvedConfig, ResolvedNetwork};
pub use schema::{DependencySource, DeployConfig, NetworkConfig};
