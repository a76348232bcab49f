use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use std::fs;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// How log output is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// Directory for log files (e.g., "logs")
    pub log_dir: String,
    /// Prefix for log files (e.g., "daner")
    pub log_prefix: String,
    /// Use debug level instead of info
    pub debug_mode: bool,
    /// Also log to the console with ANSI colors
    pub console_output: bool,
    /// Write the file log as one JSON object per line
    pub json_file: bool,
}

impl LogOptions {
    pub fn new(log_dir: impl Into<String>, log_prefix: impl Into<String>) -> Self {
        Self {
            log_dir: log_dir.into(),
            log_prefix: log_prefix.into(),
            debug_mode: false,
            console_output: false,
            json_file: false,
        }
    }
}

/// Setup logging with rotating file appender.
///
/// Logs are written to the specified directory with daily rotation.
///
/// # Arguments
/// * `log_dir` - Directory for log files (e.g., "logs")
/// * `log_prefix` - Prefix for log files (e.g., "daner")
/// * `debug_mode` - If true, use debug level; otherwise use info level
///
/// # Returns
/// A guard that must be held for the duration of the program to keep logging active
pub fn setup_logging(
    log_dir: &str,
    log_prefix: &str,
    debug_mode: bool,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let mut options = LogOptions::new(log_dir, log_prefix);
    options.debug_mode = debug_mode;
    init(&options)
}

/// Setup logging with optional console output for debugging.
///
/// # Arguments
/// * `log_dir` - Directory for log files
/// * `log_prefix` - Prefix for log files
/// * `debug_mode` - If true, use debug level; otherwise use info level
/// * `console_output` - If true, also log to console
///
/// # Returns
/// A guard that must be held for the duration of the program to keep logging active
pub fn setup_logging_with_console(
    log_dir: &str,
    log_prefix: &str,
    debug_mode: bool,
    console_output: bool,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let mut options = LogOptions::new(log_dir, log_prefix);
    options.debug_mode = debug_mode;
    options.console_output = console_output;
    init(&options)
}

/// Install the global subscriber described by `options`.
///
/// `RUST_LOG`, when set and valid, overrides the level chosen by `debug_mode`.
pub fn init(options: &LogOptions) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    ensure_log_dir(&options.log_dir)?;

    // Create daily rotating file appender
    let file_appender = rolling::daily(&options.log_dir, &options.log_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI codes in log files
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let file_layer = if options.json_file {
        file_layer.json().boxed()
    } else {
        file_layer.boxed()
    };

    // Option<Layer> is itself a layer; None when console output is off
    let console_layer = options.console_output.then(|| {
        tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(level_filter(options.debug_mode))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    tracing::info!(
        "Logging initialized: dir={}, prefix={}, debug={}, console={}, json={}",
        options.log_dir,
        options.log_prefix,
        options.debug_mode,
        options.console_output,
        options.json_file
    );

    Ok(guard)
}

fn level_filter(debug_mode: bool) -> EnvFilter {
    let default_level = if debug_mode { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn ensure_log_dir(log_dir: &str) -> Result<()> {
    let log_path = Utf8PathBuf::from(log_dir);
    if !log_path.exists() {
        fs::create_dir_all(&log_path)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_setup_logging_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("nested").join("logs");
        let log_dir = log_dir.to_str().unwrap();

        // May fail to install when another test already set the global subscriber;
        // the directory is created either way
        let _guard = setup_logging(log_dir, "test", false);

        assert!(Utf8PathBuf::from(log_dir).exists());
    }

    #[test]
    fn test_ensure_log_dir_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("logs");
        let log_dir = log_dir.to_str().unwrap();

        ensure_log_dir(log_dir).unwrap();
        ensure_log_dir(log_dir).unwrap();

        assert!(Utf8PathBuf::from(log_dir).is_dir());
    }

    #[test]
    fn test_log_options_defaults() {
        let options = LogOptions::new("logs", "daner");
        assert!(!options.debug_mode);
        assert!(!options.console_output);
        assert!(!options.json_file);
    }
}
