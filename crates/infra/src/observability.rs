//! Logging setup
//!
//! Everything always goes to the rotation log file; stdout echo is
//! optional and meant for interactive or rehearsal runs.

use keyrotor_domain::constants::RUN_LOG_FILE;
use keyrotor_domain::{Result, RotationError};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Returns the appender guard; dropping it flushes the log file, so the
/// caller must hold it for the lifetime of the run.
pub fn init_logging(log_dir: &str, console_echo: bool) -> Result<WorkerGuard> {
    let appender = tracing_appender::rolling::never(log_dir, RUN_LOG_FILE);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer().with_writer(file_writer).with_ansi(false);
    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    let init_result = if console_echo {
        registry.with(fmt::layer().with_writer(std::io::stdout)).try_init()
    } else {
        registry.try_init()
    };
    init_result
        .map_err(|err| RotationError::Config(format!("logging initialization failed: {}", err)))?;

    Ok(guard)
}
