// Tracing subscriber setup for the `analyze` binary.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "NEUMA_LOG";
const DEFAULT_FILTER: &str = "neuma_corpus=info,neuma_patterns=info";

/// Install a stderr subscriber filtered by `NEUMA_LOG`. A second call, or a
/// subscriber already installed by the host, leaves the existing one in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
