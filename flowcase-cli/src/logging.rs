use tracing_subscriber::EnvFilter;

use crate::args::LogFormat;

pub const LOG_ENV: &str = "FLOWCASE_LOG";

/// Install the global subscriber. Logs go to stderr so stdout stays
/// reserved for results and events.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
