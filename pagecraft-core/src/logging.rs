//! Logging configuration using tracing

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "PAGECRAFT_LOG";

const DEFAULT_FILTER: &str = "pagecraft=info,warn";

/// Initialize the logging subsystem
///
/// Logs go to stderr so rendered HTML on stdout stays clean. Level is
/// controlled by `PAGECRAFT_LOG`.
///
/// # Examples
/// ```bash
/// PAGECRAFT_LOG=debug pagecraft render page.json
/// PAGECRAFT_LOG=pagecraft_render=trace pagecraft check pages/*.json
/// ```
pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init()
}
