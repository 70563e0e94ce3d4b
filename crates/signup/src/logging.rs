use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogConfig;

pub const LOG_FILE: &str = concat!(env!("CARGO_PKG_NAME"), ".log");

/// Install the global subscriber.
///
/// Console output goes to stderr, stdout is reserved for snapshots. With
/// `log.file` set, a non-blocking file layer writes into `data_dir`; keep the
/// returned guard alive until exit so the file gets flushed.
pub fn init(log: &LogConfig, data_dir: &Path) -> std::io::Result<Option<WorkerGuard>> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level))
    };

    let (file_layer, guard) = if log.file {
        std::fs::create_dir_all(data_dir)?;
        let file_appender = tracing_appender::rolling::never(data_dir, LOG_FILE);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = fmt::layer()
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_ansi(false)
            .with_writer(non_blocking)
            .with_filter(filter());
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter());

    // try_init: a second call (tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .with(tracing_error::ErrorLayer::default())
        .try_init();

    Ok(guard)
}
