//! Tracing setup for the hook binary.
//!
//! Logs go to stderr so stdout carries only the report GitLab relays to the
//! pushing user.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "ECA_HOOK_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Only the first call takes effect.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .ok();
}
