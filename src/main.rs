//! Daner - desktop shell for uploading, cleaning and exporting tabular datasets
//!
//! Main entry point for the GUI application.
//!
//! # Overview
//!
//! This binary crate provides the Slint GUI frontend for Daner. It initializes:
//! - Configuration loading ([`ConfigManager`]) from `Daner Data/`
//! - Logging infrastructure (file rotation + console output)
//! - Tokio async runtime (update timers, connectivity probe, file reads)
//! - The preference stores ([`SettingsStore`], [`ThemeStore`]) over durable storage
//! - The update simulator and network monitor
//! - State management ([`StateManager`])
//! - GUI controller ([`GuiController`] - bridges Slint UI with the stores)
//!
//! The application uses a hybrid threading model:
//! - **Main thread**: Runs the Slint event loop (blocking, synchronous)
//! - **Tokio workers**: Update cycle timers, connectivity probe, introspection, export writes
//! - **State listener**: Background std::thread for reactive UI updates
//!
//! # Configuration Files
//!
//! Expected in `Daner Data/` directory:
//! - `Daner.yaml`: Application configuration (optional, `DANER_*` env vars override it)
//! - `storage.yaml`: Persisted settings and theme id (created on first change)

use anyhow::Result;
use daner::config::KeyValueStore;
use daner::services::{FileIntrospector, NetworkMonitor, StyleVariables, ThreadRandom, TokioClock};
use daner::ui::GuiController;
use daner::ui::controller::AppContext;
use daner::{
    APP_NAME, ConfigManager, DATA_DIR, SettingsStore, StateManager, ThemeStore, UpdateSimulator,
    UsageStats, VERSION,
};
use std::sync::Arc;

/// Main entry point for the Daner GUI application
///
/// # Errors
///
/// This function can fail if:
/// - The data directory cannot be created or `Daner.yaml` is invalid
/// - Logging initialization fails (disk space, permissions)
/// - Tokio runtime creation fails (system resources)
/// - Slint UI initialization fails (graphics drivers, display)
fn main() -> Result<()> {
    let config_manager = ConfigManager::new(DATA_DIR)?;
    let app_config = config_manager.load_app_config()?;

    // Held until main returns so buffered log lines are flushed
    let _log_guard = daner::logging::init(&daner::logging::LogOptions {
        log_dir: app_config.log_dir.clone(),
        log_prefix: APP_NAME.to_string(),
        debug_mode: app_config.debug_mode,
        console_output: app_config.console_logging,
        json_file: app_config.json_logs,
    })?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("daner-worker")
        .build()?;
    let runtime_guard = runtime.enter();

    tracing::info!("Tokio runtime initialized");

    // Preferences
    let storage: Arc<dyn KeyValueStore> = Arc::new(config_manager.open_storage());
    let settings = Arc::new(SettingsStore::load(storage.clone()));
    let styles = Arc::new(StyleVariables::new());
    let themes = Arc::new(ThemeStore::load(storage, styles.clone()));
    let usage = Arc::new(UsageStats::new(settings.settings().anonymous_usage_stats));

    tracing::info!(
        "Preferences loaded - theme: {}, preview rows: {}",
        themes.current().id,
        settings.settings().preview_row_limit.rows()
    );

    // Update cycle
    let network = Arc::new(NetworkMonitor::new(true));
    let _probe = network.spawn_probe(&app_config.connectivity);
    let updates = UpdateSimulator::new(
        app_config.update.clone(),
        Arc::new(ThreadRandom),
        network.clone(),
        Arc::new(TokioClock),
    );
    let _auto_checks = updates.spawn_auto_checks(network.subscribe());

    let state_manager = Arc::new(StateManager::new());
    tracing::info!("State manager initialized");

    let context = AppContext {
        state: state_manager,
        settings,
        themes,
        styles,
        updates,
        introspector: FileIntrospector::new(),
        usage: usage.clone(),
        app_config: Arc::new(app_config),
    };

    // This wires up the Slint UI with the stores and the tokio runtime
    let gui_controller = GuiController::new(context, runtime.handle().clone())?;

    tracing::info!("GUI controller initialized, launching window");

    // Run the GUI (blocks until window is closed)
    let result = gui_controller.run();

    tracing::info!("GUI closed, shutting down");
    usage.log_summary();

    drop(runtime_guard);
    runtime.shutdown_timeout(std::time::Duration::from_secs(5));

    tracing::info!("Application shutdown complete");

    result.map_err(|e| {
        tracing::error!("GUI error: {}", e);
        anyhow::anyhow!("GUI error: {}", e)
    })
}
