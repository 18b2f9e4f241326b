//! Tracing initialisation for the `saber` binary.
//!
//! Log lines always go to stderr so that result tables written to stdout stay
//! machine-readable.

use std::io;

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Default level for a `-v` count: warn, info, debug, then trace.
pub(crate) fn level_for_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `verbosity` when set. Only the first call in a
/// process takes effect.
pub(crate) fn init_tracing(json: bool, verbosity: u8) {
    let level = level_for_verbosity(verbosity);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let layer = fmt::layer().with_target(false).with_writer(io::stderr);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .ok();
    }
}
