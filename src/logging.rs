// tracing-subscriber setup: local-time timestamps, env filter, optional log file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

use crate::config::{LogTarget, LoggingConfig};

pub struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

/// RUST_LOG wins over the configured level.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// stdout, or stdout plus the configured file (created with its parent dirs, appended to).
pub fn make_writer(config: &LoggingConfig) -> anyhow::Result<BoxMakeWriter> {
    match config.target {
        LogTarget::Console => Ok(BoxMakeWriter::new(std::io::stdout)),
        LogTarget::File => {
            if let Some(dir) = Path::new(&config.file).parent()
                && !dir.as_os_str().is_empty()
            {
                std::fs::create_dir_all(dir)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.file)?;
            Ok(BoxMakeWriter::new(std::io::stdout.and(Mutex::new(file))))
        }
    }
}

pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let writer = make_writer(config)?;
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(env_filter(config))
        .with_ansi(config.target == LogTarget::Console)
        .with_writer(writer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logging init: {}", e))
}
