//! Sets up logging for the command-line driver.

use std::{fs::OpenOptions, path::Path, sync::Arc};

use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::Error;

/// Install the global `tracing` subscriber.
///
/// Logs at the `info` level and above are written to stderr, unless
/// overridden with the `RUST_LOG` environment variable. If `log_file` is
/// given, logs at the `debug` level and above are also appended to it.
///
/// # Errors
/// Returns an [Error::LoggingError] if the log file cannot be opened or a
/// global subscriber has already been installed.
pub fn setup_logging(log_file: Option<&Path>) -> Result<(), Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    let debug_log = match log_file {
        Some(path) => {
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|error| Error::LoggingError(format!("{}: {error}", path.display())))?;

            Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file))
                    .with_filter(filter::LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .try_init()
        .map_err(|error| Error::LoggingError(error.to_string()))
}
