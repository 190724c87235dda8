use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::errors::{AppError, AppResult};

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `warn`, or `debug` when `verbose`.
/// Calling it twice is harmless: the second call reports an error that
/// callers are free to ignore.
pub fn init_tracing(verbose: bool) -> AppResult<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| AppError::Other(err.to_string()))
}
