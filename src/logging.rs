//! Logging setup for the binary
//!
//! Logs go to stderr so they never mix with program output on stdout.

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is not set, by `-v` count
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize logging. `RUST_LOG` overrides the verbosity-derived default.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
