//! Logging setup for hosts of the correlator.
//!
//! The core only emits `tracing` events: plan construction at `debug`,
//! numerical warnings at `warn`, per-call detail at `trace`. Installing a
//! subscriber is left to the host, through [`init_tracing`] or its own.

mod types;

pub use types::LogLevel;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingSection;

/// Initialize the global tracing subscriber.
///
/// - Respects the RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr
///
/// Should be called once at startup.
pub fn init_tracing(default_level: LogLevel) {
    init_with(default_level, true);
}

/// Initialize the global tracing subscriber from the `[logging]` section.
pub fn init_from_settings(section: &LoggingSection) {
    init_with(section.level, section.show_target);
}

fn init_with(default_level: LogLevel, show_target: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(show_target).with_thread_ids(false))
        .with(filter)
        .init();
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

/// Convert LogLevel to filter string.
fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcc::{gcc, GccConfig};

    #[test]
    fn level_to_filter_works() {
        assert_eq!(level_to_filter_str(LogLevel::Debug), "debug");
        assert_eq!(level_to_filter_str(LogLevel::Info), "info");
        assert_eq!(level_to_filter_str(LogLevel::Error), "error");
    }

    #[test]
    fn warnings_are_logged_without_failing() {
        init_test_tracing();
        // All-zero input floors every PHAT bin and emits a warning event
        let zeros = vec![0.0; 16];
        let output = gcc(&zeros, &zeros, &GccConfig::phat()).unwrap();
        assert!(!output.diagnostics.is_empty());
    }
}
