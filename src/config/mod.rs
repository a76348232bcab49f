pub mod storage;

pub use storage::{FileStore, KeyValueStore, MemoryStore, SETTINGS_KEY, StorageError, THEME_KEY};

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Timings of the simulated update cycle, in milliseconds unless noted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    pub startup_check_delay_ms: u64,
    pub reconnect_check_delay_ms: u64,
    pub recheck_interval_secs: u64,
    pub check_latency_ms: u64,
    pub download_step_ms: u64,
    pub download_steps: u32,
    pub install_delay_ms: u64,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            startup_check_delay_ms: 2000,
            reconnect_check_delay_ms: 1000,
            recheck_interval_secs: 300,
            check_latency_ms: 1500,
            download_step_ms: 200,
            download_steps: 20,
            install_delay_ms: 1000,
        }
    }
}

impl UpdateConfig {
    pub fn startup_check_delay(&self) -> Duration {
        Duration::from_millis(self.startup_check_delay_ms)
    }

    pub fn reconnect_check_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_check_delay_ms)
    }

    pub fn recheck_interval(&self) -> Duration {
        Duration::from_secs(self.recheck_interval_secs)
    }

    pub fn check_latency(&self) -> Duration {
        Duration::from_millis(self.check_latency_ms)
    }

    pub fn download_step(&self) -> Duration {
        Duration::from_millis(self.download_step_ms)
    }

    pub fn install_delay(&self) -> Duration {
        Duration::from_millis(self.install_delay_ms)
    }
}

/// Settings of the periodic connectivity probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    pub probe_addr: String,
    pub probe_interval_secs: u64,
    pub probe_timeout_ms: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe_addr: "1.1.1.1:53".to_string(),
            probe_interval_secs: 30,
            probe_timeout_ms: 1500,
        }
    }
}

/// Application configuration read once at start-up.
///
/// Sources, later ones winning: built-in defaults, `Daner.yaml` in the data
/// directory, `DANER_*` environment variables (`DANER_DEBUG_MODE=true`,
/// `DANER_UPDATE__CHECK_LATENCY_MS=10`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_dir: String,
    pub debug_mode: bool,
    pub console_logging: bool,
    /// Write the file log as JSON lines.
    pub json_logs: bool,
    /// Directory the export save dialog opens in.
    pub export_dir: Option<String>,
    pub update: UpdateConfig,
    pub connectivity: ConnectivityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            debug_mode: false,
            console_logging: true,
            json_logs: false,
            export_dir: None,
            update: UpdateConfig::default(),
            connectivity: ConnectivityConfig::default(),
        }
    }
}

/// Configuration manager for the application data directory.
///
/// Owns two files:
/// - `Daner.yaml`: optional application configuration ([`AppConfig`])
/// - `storage.yaml`: durable key-value storage for preferences ([`FileStore`])
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    app_config_path: Utf8PathBuf,
    storage_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified data directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory holding configuration and storage (e.g., "Daner Data")
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            app_config_path: config_dir.join("Daner.yaml"),
            storage_path: config_dir.join(storage::STORAGE_FILE_NAME),
            config_dir,
        })
    }

    /// Load the application configuration.
    ///
    /// # Returns
    /// The merged AppConfig; defaults when neither the file nor the environment set anything
    pub fn load_app_config(&self) -> Result<AppConfig> {
        if !self.app_config_path.exists() {
            tracing::debug!(
                "App config file not found at {}, using defaults and environment",
                self.app_config_path
            );
        }

        let config = config::Config::builder()
            .add_source(config::File::from(self.app_config_path.as_std_path()).required(false))
            .add_source(
                config::Environment::with_prefix("DANER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read app config: {}", self.app_config_path))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .with_context(|| format!("Failed to parse app config: {}", self.app_config_path))?;

        tracing::info!("Loaded app config from {}", self.config_dir);
        Ok(app_config)
    }

    /// Save the application configuration file.
    pub fn save_app_config(&self, app_config: &AppConfig) -> Result<()> {
        let yaml_string = serde_yaml_ng::to_string(app_config)
            .context("Failed to serialize app config to YAML")?;

        fs::write(&self.app_config_path, yaml_string)
            .with_context(|| format!("Failed to write app config: {}", self.app_config_path))?;

        tracing::info!("Saved app config to {}", self.app_config_path);
        Ok(())
    }

    /// Open the durable key-value storage kept in the data directory.
    pub fn open_storage(&self) -> FileStore {
        FileStore::open(&self.storage_path)
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn storage_path(&self) -> &Utf8Path {
        &self.storage_path
    }
}
