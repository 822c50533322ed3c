//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once, at startup
//! - Keep stdout free for the deployment result: logs go to stderr
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - Dependencies (alloy, hyper) log at `warn` unless `RUST_LOG` says otherwise

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(level: &str) -> String {
    format!("warn,athena_deploy={}", level)
}

/// Install the global subscriber, writing to stderr.
pub fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(level))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
