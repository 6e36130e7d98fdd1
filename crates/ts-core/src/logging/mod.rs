//! Logging init for ts-core.
//!
//! stdout stays reserved for command payloads; logs go to stderr or,
//! with `--log-file`, to an append-only file. While the selection UI
//! owns the terminal the binary turns logging off unless the user
//! explicitly opted in, so frames are never overwritten.

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use ts_common::{Error, Result};

/// Install the global subscriber. Call once, before the first event.
///
/// An explicit `TS_LOG`/`RUST_LOG` filter beats the configured level.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ts_core={}", config.level)));

    // ANSI only when writing to a live terminal; never into a file.
    let (writer, ansi) = match &config.file {
        Some(path) => (BoxMakeWriter::new(open_log_file(path)?), false),
        None => (
            BoxMakeWriter::new(std::io::stderr),
            std::io::stderr().is_terminal(),
        ),
    };

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Jsonl => {
            registry
                .with(fmt::layer().json().with_writer(writer).with_ansi(false))
                .init();
        }
        LogFormat::Human if config.timestamps => {
            registry
                .with(
                    fmt::layer()
                        .with_writer(writer)
                        .with_target(false)
                        .with_ansi(ansi),
                )
                .init();
        }
        LogFormat::Human => {
            registry
                .with(
                    fmt::layer()
                        .with_writer(writer)
                        .with_target(false)
                        .with_ansi(ansi)
                        .without_time(),
                )
                .init();
        }
    }

    Ok(())
}

/// Environment-driven init for tests and one-off tools.
pub fn init_default_logging() -> Result<()> {
    init_logging(&LogConfig::from_env(None, None))
}

fn open_log_file(path: &Path) -> Result<Arc<std::fs::File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::Config(format!("cannot open log file {}: {}", path.display(), e)))?;
    Ok(Arc::new(file))
}
