//! Observability subsystem.
//!
//! Structured logging through `tracing`; every subsystem logs with fields
//! (`contract`, `network`, `tx_hash`) rather than formatted strings.

pub mod logging;

pub use logging::init_logging;
