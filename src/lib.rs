// Daner - desktop shell for uploading, cleaning and exporting tabular datasets
//
// This is the library crate containing the stores, state and services.
// The binary crate (main.rs) provides the GUI entry point.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::{AppConfig, ConfigManager};
pub use metrics::UsageStats;
pub use models::{AppSettings, AppState, Theme, UpdateState};
pub use services::{SettingsStore, ThemeStore, UpdateSimulator};
pub use state::{StateChange, StateManager};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Directory holding `Daner.yaml` and the preference storage
pub const DATA_DIR: &str = "Daner Data";
