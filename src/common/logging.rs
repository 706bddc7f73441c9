//! Logging and tracing configuration
//!
//! Console progress for suites goes through [`crate::suite::Reporter`];
//! this module only wires up diagnostic logging.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing to stderr
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// Default level is INFO for this crate, WARN for dependencies.
/// Returns `false` if a global subscriber was already installed.
pub fn init() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ricochet=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .is_ok()
}
