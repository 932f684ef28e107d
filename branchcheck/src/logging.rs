//! Diagnostic tracing for branchcheck.
//!
//! - **Tracing (this module)**: diagnostics via `RUST_LOG` or `--verbose`,
//!   output to stderr.
//! - **Console progress**: per-repository and per-branch lines on stdout,
//!   printed by the binary regardless of the filter.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,branchcheck=debug"
    } else {
        "warn"
    }
}

/// Build the filter: `RUST_LOG` wins, otherwise [`default_directive`].
pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Initialize the tracing subscriber.
///
/// Output: stderr, compact format, no timestamps (runs are short and the
/// console progress already orders events).
///
/// # Example
/// ```bash
/// RUST_LOG=branchcheck=trace branchcheck --settings branchcheck.conf
/// branchcheck --settings branchcheck.conf --verbose
/// ```
pub fn init(verbose: bool) {
    tracing_subscriber::registry()
        .with(filter(verbose))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false)
                .compact(),
        )
        .init();
}
