//! Covary Tools
//!
//! CLI harnesses around the explorer session.

use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging with a default filter.
///
/// Use the `RUST_LOG` environment variable to override the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,covary_runtime=info,covary_explorer=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
