//! Observability subsystem
//!
//! - Structured logging through `tracing`
//! - Lock-free pipeline counters
//! - Timing for the engine call
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on compilation or decoding
//! 3. Logging is initialised once, by the binary

mod metrics;
mod scope;

pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::Timer;

use std::sync::OnceLock;

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber. Honors `RUST_LOG`, defaults to `info`.
/// Later calls are no-ops.
pub fn init_logging() {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    INSTALLED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
