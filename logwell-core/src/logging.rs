use crate::conf::{LogFormat, LoggingConfig};
use anyhow::{Context, Result, anyhow};
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Keeps the background log-file writer alive. Drop it last.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize logging.
///
/// - `RUST_LOG` wins over the configured level
/// - stdout gets JSON (flattened events) or pretty output
/// - when a log file is configured, events are also written there as JSON
/// - with `TOKIO_CONSOLE` set, tokio-console takes over instead
pub fn init_logging(cfg: &LoggingConfig) -> Result<LoggingGuard> {
    if std::env::var("TOKIO_CONSOLE").is_ok() {
        init_console_logging();
        return Ok(LoggingGuard { _file: None });
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&cfg.level)
            .with_context(|| format!("invalid log level '{}'", cfg.level))?,
    };

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    layers.push(match cfg.format {
        LogFormat::Json => fmt::layer().json().flatten_event(true).boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
    });

    let mut file_guard = None;
    if let Some(path) = &cfg.file {
        let (writer, guard) = file_writer(path)?;
        layers.push(
            fmt::layer()
                .json()
                .flatten_event(true)
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
        );
        file_guard = Some(guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("logging already initialized")?;

    Ok(LoggingGuard { _file: file_guard })
}

fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("log file path '{}' has no usable file name", path.display()))?;
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .with_context(|| format!("failed to open log file '{}'", path.display()))?;

    Ok(tracing_appender::non_blocking(appender))
}

fn init_console_logging() {
    console_subscriber::init();
}
