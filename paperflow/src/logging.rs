//! Diagnostics for the paperflow CLI.
//!
//! Tracing output goes to stderr. Command output (status lines, tables,
//! verdicts) goes to stdout and is never filtered. Permissive chair lookups
//! report swallowed failures at `warn`, so the default level keeps them
//! visible.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "warn,paperflow=debug" } else { "warn" }
}

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins over `verbose`:
/// ```bash
/// RUST_LOG=paperflow::io=trace paperflow status
/// ```
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_enables_crate_debug() {
        assert_eq!(default_directive(false), "warn");
        assert!(default_directive(true).contains("paperflow=debug"));
        assert!(EnvFilter::try_new(default_directive(true)).is_ok());
    }
}
