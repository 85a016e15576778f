//! Tracing subscriber setup

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogLevel;

/// Filter used when `RUST_LOG` is unset or empty
fn filter_for(level: LogLevel) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level.into()).into())
        .from_env_lossy()
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `level`. Calling this twice is
/// harmless; the second call leaves the first subscriber in place.
pub fn init(level: LogLevel) {
    let filter = filter_for(level);

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();
}
