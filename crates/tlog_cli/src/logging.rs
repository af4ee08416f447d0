//! Tracing subscriber setup for developer logging.
//!
//! User-facing messages go through diagnostics; tracing events carry the
//! internal detail (log loads, saves, skipped lines). `RUST_LOG` takes
//! precedence; otherwise only warnings are shown, or debug events with
//! `--verbose`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber, writing to stderr.
pub fn initialize(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
