//! `tracing` subscriber setup for the `drift-studio` binary.
//!
//! Workspace crates log at the level picked on the command line, other
//! crates stay at `warn`, and `RUST_LOG` wins when it is set. Feature values
//! read from patient rows only reach the log when `--log-data` is passed.
//!
//! ```ignore
//! use drift_cli::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::default())?;
//! ```

use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

static ROW_LOGGING: AtomicBool = AtomicBool::new(false);

/// Stand-in for row values while `--log-data` is off.
pub const REDACTED: &str = "[REDACTED]";

const WORKSPACE_CRATES: [&str; 4] = ["drift_cli", "drift_core", "drift_ingest", "drift_model"];

type FormatLayer = Box<dyn Layer<Registry> + Send + Sync>;

pub fn log_data_enabled() -> bool {
    ROW_LOGGING.load(Ordering::Relaxed)
}

/// `value` when `--log-data` is on, [`REDACTED`] otherwise.
pub fn redact_value(value: &str) -> &str {
    if log_data_enabled() { value } else { REDACTED }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level applied to the workspace crates.
    pub level_filter: LevelFilter,
    /// `RUST_LOG` replaces `level_filter` when present.
    pub use_env_filter: bool,
    pub with_timestamps: bool,
    pub with_target: bool,
    /// JSON output only: emit an event when each span closes.
    pub with_spans: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
    pub log_data: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    /// One JSON object per line.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_spans: true,
            with_ansi: true,
            format: LogFormat::Pretty,
            log_file: None,
            log_data: false,
        }
    }
}

/// Install the global subscriber, writing to stderr or `config.log_file`.
///
/// # Errors
///
/// Fails only when the log file cannot be opened for appending.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    match &config.log_file {
        Some(path) => {
            let file: File = OpenOptions::new().create(true).append(true).open(path)?;
            init_logging_with_writer(config, Mutex::new(file));
        }
        None => init_logging_with_writer(config, io::stderr),
    }
    Ok(())
}

/// Same as [`init_logging`] with a caller-supplied writer.
///
/// A second call keeps the subscriber that is already installed.
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    ROW_LOGGING.store(config.log_data, Ordering::Release);
    let installed = tracing_subscriber::registry()
        .with(format_layer(config, writer))
        .with(build_env_filter(config.level_filter, config.use_env_filter))
        .try_init();
    if installed.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}

fn format_layer<W>(config: &LogConfig, writer: W) -> FormatLayer
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let base = fmt::layer().with_writer(writer).with_target(config.with_target);
    match config.format {
        LogFormat::Json => {
            let spans = if config.with_spans { FmtSpan::CLOSE } else { FmtSpan::NONE };
            base.json().with_span_events(spans).boxed()
        }
        LogFormat::Compact => {
            let layer = base.compact().with_ansi(config.with_ansi);
            if config.with_timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
        LogFormat::Pretty => {
            let layer = base.with_ansi(config.with_ansi);
            if config.with_timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
    }
}

/// `warn` for everything, `level` for the workspace crates.
fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    std::iter::once("warn".to_string())
        .chain(WORKSPACE_CRATES.iter().map(|name| format!("{name}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

fn build_env_filter(level: LevelFilter, use_env: bool) -> EnvFilter {
    let from_level = || EnvFilter::new(default_directives(level));
    if use_env {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| from_level())
    } else {
        from_level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(
            default_directives(LevelFilter::DEBUG),
            "warn,drift_cli=debug,drift_core=debug,drift_ingest=debug,drift_model=debug"
        );
    }

    #[test]
    fn test_off_level_silences_workspace() {
        assert_eq!(
            default_directives(LevelFilter::OFF),
            "warn,drift_cli=off,drift_core=off,drift_ingest=off,drift_model=off"
        );
    }

    #[test]
    fn test_redaction_defaults_on() {
        assert!(!log_data_enabled());
        assert_eq!(redact_value("148"), REDACTED);
    }
}
