//! Diagnostic logging.
//!
//! Diagnostics go to stderr through `tracing`. The level comes from the
//! `AGENTDEX_LOG` environment variable when set (any `EnvFilter` directive),
//! otherwise from the number of `-v` flags.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a filter directive.
pub const LOG_ENV_VAR: &str = "AGENTDEX_LOG";

/// Level for a given `-v` count.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn build_env_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)))
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init_logging(verbose: u8) {
    let _ = tracing_subscriber::registry()
        .with(build_env_filter(verbose))
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
