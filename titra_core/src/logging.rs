//! Tracing setup for the `titra` binary and the unit tests.
//!
//! Everything is written to stderr. Stdout carries only calculation output,
//! so `titra calc --json` can be piped straight into another tool.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter directive used when `RUST_LOG` is not set
///
/// Quiet runs only show warnings (skipped history lines and the like);
/// verbose runs add debug output from our own crates without pulling in
/// dependency chatter.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,titra_core=debug,titra=debug"
    } else {
        "warn"
    }
}

fn filter_or(directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// Install the stderr subscriber for the CLI
///
/// `RUST_LOG` takes precedence over `verbose`. Calling this twice is a no-op.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(filter_or(default_directive(verbose)))
        .with(
            fmt::layer()
                .compact()
                .with_target(verbose)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::registry()
        .with(filter_or("titra_core=trace"))
        .with(fmt::layer().compact().with_test_writer())
        .try_init();
}
