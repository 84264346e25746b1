//! Operator-facing tracing, distinct from compiler diagnostics: this is
//! output describing what the driver itself is doing (phase entry/exit,
//! files read, chosen word width and pointer model), not output describing
//! the user's B source. Suppressed entirely when stdout is the output
//! stream (`-S`/`-E`), since `tracing`'s `fmt` layer defaults to stderr
//! anyway but callers should still avoid logging progress the user didn't
//! ask to see mixed into piped C.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `BCC_LOG` overrides the derived level; otherwise `-v`/`--verbose` selects
/// DEBUG and the default is INFO.
pub fn init(verbose: bool) -> Result<(), String> {
    let filter = std::env::var("BCC_LOG").ok().map(EnvFilter::new).unwrap_or_else(|| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| format!("failed to initialise logging: {e}"))
}
