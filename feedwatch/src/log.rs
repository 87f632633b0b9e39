use std::{fs::File, io, path::Path};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE: &str = "feedwatch.log";

/// Installs the global subscriber writing to `<log_dir>/feedwatch.log`.
///
/// `RUST_LOG` wins over `level`. With `console` set, events are also written
/// to stderr, which is only safe when the terminal is not drawn on.
/// The returned guard must be held until exit, dropping it flushes the file.
pub fn setup_logger(
    log_dir: &Path,
    level: &str,
    console: bool,
) -> Result<WorkerGuard, Box<dyn std::error::Error + Send + Sync>> {
    std::fs::create_dir_all(log_dir)?;
    let file = File::create(log_dir.join(LOG_FILE))?;
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let file_layer = fmt::layer()
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(non_blocking_writer);

    let console_layer = console.then(|| fmt::layer().with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    Ok(guard)
}
