//! Logging setup for the `sevenseg` binary.
//!
//! Events go to stderr through a `tracing` subscriber. The default level is
//! derived from the `-d` count, and `RUST_LOG` can override it:
//!
//! | `-d` count | Level |
//! |------------|-------|
//! | 0 | `warn` |
//! | 1 | `debug` |
//! | 2+ | `trace` |

use std::io;

use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    prelude::*,
};

use crate::config::Verbosity;

/// Level used when `RUST_LOG` is unset.
pub fn default_level(verbosity: Verbosity) -> LevelFilter {
    match verbosity.level() {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber. Call once, early in `main`.
pub fn init(verbosity: Verbosity) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level(verbosity).into())
        .with_env_var("RUST_LOG")
        .from_env_lossy();

    // A second init (e.g. from tests) leaves the first subscriber in place
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init();
}
