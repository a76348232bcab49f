// GUI Controller - Bridges Slint UI with the Daner stores
//
// This module contains the GuiController which coordinates between:
// - Slint UI (MainWindow)
// - StateManager (view + dashboard flow)
// - SettingsStore / ThemeStore / UpdateSimulator (watch-channel stores)
// - EventLoopBridge (async/GUI coordination)
//
// It handles:
// - Setting up UI callbacks → store calls and async tasks
// - Subscribing to state changes and store values → UI updates
// - Native file pickers and save dialogs
// - Upload validation, introspection and export

use crate::config::AppConfig;
use crate::metrics::UsageStats;
use crate::models::catalog::{SAMPLE_DATA, preview_caption, preview_rows};
use crate::models::file::{format_file_size, format_number};
use crate::models::{
    AppSettings, AppState, AppView, ApplyOutcome, BatchSize, CLEANING_OPERATIONS, CleaningStep,
    CsvDelimiter, FileStats, PreviewRowLimit, SettingsPatch, Theme, UpdateState, UploadedFile,
};
use crate::models::theme::parse_hex_color;
use crate::services::export::{build_artifact, exportable_operations, write_artifact};
use crate::services::upload::ACCEPTED_EXTENSIONS;
use crate::services::{
    ExportFormat, FileIntrospector, LoginForm, RegistrationForm, SettingsStore, SocialProvider,
    StyleVariables, ThemeStore, UpdateSimulator, UploadDecision, validate_upload,
};
use crate::state::{StateChange, StateManager};
use crate::ui::bridge::{EventLoopBridge, EventLoopBridgeHandle};
use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use slint::{ComponentHandle, ModelRc, SharedString, StandardListViewItem, VecModel};
use std::sync::Arc;

// Include the generated Slint code
slint::include_modules!();

/// Everything the GUI talks to, built once by the composition root.
#[derive(Clone)]
pub struct AppContext {
    pub state: Arc<StateManager>,
    pub settings: Arc<SettingsStore>,
    pub themes: Arc<ThemeStore>,
    pub styles: Arc<StyleVariables>,
    pub updates: UpdateSimulator,
    pub introspector: FileIntrospector,
    pub usage: Arc<UsageStats>,
    pub app_config: Arc<AppConfig>,
}

/// GUI Controller that wires up the Slint UI with application state and logic
///
/// # Example
/// ```ignore
/// let controller = GuiController::new(context, runtime.handle().clone())?;
/// controller.run()?;  // Blocks until window is closed
/// ```
pub struct GuiController {
    /// The Slint UI window
    ui: MainWindow,

    /// Event loop bridge for coordinating between tokio and Slint
    _bridge: EventLoopBridge<MainWindow>,
}

impl GuiController {
    /// Create a new GUI controller
    ///
    /// # Arguments
    /// * `ctx` - The stores and services the UI drives
    /// * `tokio_handle` - Handle to the tokio runtime for spawning async tasks
    pub fn new(ctx: AppContext, tokio_handle: tokio::runtime::Handle) -> Result<Self> {
        let ui = MainWindow::new().context("Failed to create Slint UI")?;
        let bridge = EventLoopBridge::new(&ui, tokio_handle);

        Self::sync_ui_with_state(&ui, &ctx);
        Self::setup_callbacks(&ui, &bridge, &ctx);
        Self::setup_state_subscription(&bridge, &ctx);
        Self::setup_store_subscriptions(&bridge, &ctx);

        tracing::info!("GUI controller initialized");

        Ok(Self {
            ui,
            _bridge: bridge,
        })
    }

    /// Run the GUI (blocks until window is closed)
    pub fn run(self) -> Result<(), slint::PlatformError> {
        tracing::info!("Starting GUI event loop");
        self.ui.run()
    }

    /// Synchronize UI with current state
    ///
    /// Called once at startup; afterwards the subscriptions keep the UI current.
    fn sync_ui_with_state(ui: &MainWindow, ctx: &AppContext) {
        let state = ctx.state.snapshot();
        let settings = ctx.settings.settings();

        ui.set_view(view_index(state.view));
        ui.set_sidebar_collapsed(state.sidebar_collapsed);
        apply_file_panel(ui, &state);
        apply_dashboard(ui, &state);
        apply_settings(ui, &settings);

        let themes: Vec<ThemeEntry> = ctx
            .themes
            .themes()
            .iter()
            .map(|theme| ThemeEntry {
                id: theme.id.into(),
                name: theme.name.into(),
                description: theme.description.into(),
                accent: hex_to_color(theme.colors.accent),
            })
            .collect();
        ui.set_themes(ModelRc::new(VecModel::from(themes)));
        apply_theme(ui, ctx.themes.current(), &ctx.styles);

        apply_update_state(ui, &ctx.updates.snapshot());

        tracing::debug!("UI synchronized with initial state");
    }

    /// Set up Slint UI callbacks
    ///
    /// This connects Slint UI events (button clicks, etc.) to Rust logic.
    fn setup_callbacks(ui: &MainWindow, bridge: &EventLoopBridge<MainWindow>, ctx: &AppContext) {
        // ===== Authentication =====

        let state = ctx.state.clone();
        let ui_weak = ui.as_weak();
        ui.on_login(move |email, password| {
            let form = LoginForm {
                email: email.to_string(),
                password: password.to_string(),
            };
            let error = match state.login(&form) {
                Ok(_) => String::new(),
                Err(e) => {
                    tracing::debug!("Login rejected: {}", e);
                    e.to_string()
                }
            };
            if let Some(ui) = ui_weak.upgrade() {
                ui.set_auth_error(error.into());
            }
        });

        let state = ctx.state.clone();
        let ui_weak = ui.as_weak();
        ui.on_social_login(move |provider| {
            let provider = match provider.as_str() {
                "Apple" => SocialProvider::Apple,
                _ => SocialProvider::Google,
            };
            state.social_login(provider);
            if let Some(ui) = ui_weak.upgrade() {
                ui.set_auth_error(SharedString::new());
            }
        });

        let state = ctx.state.clone();
        let ui_weak = ui.as_weak();
        ui.on_register(move |first_name, last_name, email, password, confirm_password| {
            let form = RegistrationForm {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                confirm_password: confirm_password.to_string(),
            };
            let error = match state.register(&form) {
                Ok(_) => String::new(),
                Err(e) => e.to_string(),
            };
            if let Some(ui) = ui_weak.upgrade() {
                ui.set_auth_error(error.into());
            }
        });

        let state = ctx.state.clone();
        let ui_weak = ui.as_weak();
        ui.on_show_registration(move || {
            state.navigate(AppView::Registration);
            if let Some(ui) = ui_weak.upgrade() {
                ui.set_auth_error(SharedString::new());
            }
        });

        let state = ctx.state.clone();
        let ui_weak = ui.as_weak();
        ui.on_show_login(move || {
            state.navigate(AppView::Login);
            if let Some(ui) = ui_weak.upgrade() {
                ui.set_auth_error(SharedString::new());
            }
        });

        let state = ctx.state.clone();
        let settings = ctx.settings.clone();
        ui.on_logout(move || {
            state.logout(settings.settings().clear_data_on_logout);
        });

        let state = ctx.state.clone();
        ui.on_toggle_sidebar(move || {
            state.toggle_sidebar();
        });

        // ===== Upload =====

        let upload_ctx = ctx.clone();
        let bridge_handle = bridge.clone_handle();
        ui.on_upload_file(move || {
            tracing::debug!("Upload button clicked");
            if let Some(path) = Self::show_file_picker() {
                Self::handle_upload(&upload_ctx, &bridge_handle, path);
            }
        });

        let upload_ctx = ctx.clone();
        let bridge_handle = bridge.clone_handle();
        ui.on_upload_path(move |text| {
            let text = text.trim();
            if text.is_empty() {
                return;
            }
            Self::handle_upload(&upload_ctx, &bridge_handle, Utf8PathBuf::from(text));
        });

        // ===== Dashboard flow =====

        let state = ctx.state.clone();
        ui.on_cancel_session(move || {
            state.cancel_session();
        });

        let state = ctx.state.clone();
        ui.on_toggle_operation(move |id| {
            state.toggle_operation(id.as_str());
        });

        let state = ctx.state.clone();
        let settings = ctx.settings.clone();
        let usage = ctx.usage.clone();
        ui.on_apply_cleaning(move || {
            let confirm_first = settings.settings().confirm_before_cleaning;
            let (outcome, _) = state.request_apply(confirm_first);
            if outcome == ApplyOutcome::Applied {
                usage.record_cleaning();
            }
        });

        let state = ctx.state.clone();
        let usage = ctx.usage.clone();
        ui.on_confirm_apply(move || {
            let changes = state.confirm_apply();
            if changes.contains(&StateChange::StepChanged {
                step: CleaningStep::Cleaned,
            }) {
                usage.record_cleaning();
            }
        });

        let state = ctx.state.clone();
        ui.on_dismiss_confirmation(move || {
            state.dismiss_confirmation();
        });

        let export_ctx = ctx.clone();
        let bridge_handle = bridge.clone_handle();
        ui.on_export_data(move |extension| {
            Self::handle_export(&export_ctx, &bridge_handle, extension.as_str());
        });

        // ===== Theme =====

        let themes = ctx.themes.clone();
        let usage = ctx.usage.clone();
        let ui_weak = ui.as_weak();
        ui.on_select_theme(move |id| match themes.select(id.as_str()) {
            Ok(true) => usage.record_theme_change(),
            Ok(false) => {}
            Err(e) => {
                tracing::error!("Failed to save theme: {}", e);
                Self::show_message_dialog(&ui_weak, "Could not save theme", e.to_string());
            }
        });

        // ===== Updates =====

        let updates = ctx.updates.clone();
        let usage = ctx.usage.clone();
        let bridge_handle = bridge.clone_handle();
        ui.on_check_for_updates(move || {
            usage.record_update_check();
            let updates = updates.clone();
            // Offline checks are a silent no-op
            bridge_handle.spawn_async(move || async move {
                updates.check_for_updates().await;
            });
        });

        let updates = ctx.updates.clone();
        let bridge_handle = bridge.clone_handle();
        ui.on_install_update(move || {
            let updates = updates.clone();
            bridge_handle.spawn_async(move || async move {
                updates.install_update().await;
            });
        });

        // ===== Settings =====

        let settings = ctx.settings.clone();
        let ui_weak = ui.as_weak();
        ui.on_setting_toggled(move |key, value| match toggle_patch(key.as_str(), value) {
            Some(patch) => Self::save_settings(&settings, &ui_weak, &patch),
            None => tracing::warn!("Ignoring unknown setting toggle: {}", key),
        });

        let settings = ctx.settings.clone();
        let ui_weak = ui.as_weak();
        ui.on_preview_limit_selected(move |index| {
            if let Some(limit) = pick(&PreviewRowLimit::ALL, index) {
                let patch = SettingsPatch {
                    preview_row_limit: Some(limit),
                    ..Default::default()
                };
                Self::save_settings(&settings, &ui_weak, &patch);
            }
        });

        let settings = ctx.settings.clone();
        let ui_weak = ui.as_weak();
        ui.on_delimiter_selected(move |index| {
            if let Some(delimiter) = pick(&CsvDelimiter::ALL, index) {
                let patch = SettingsPatch {
                    csv_delimiter: Some(delimiter),
                    ..Default::default()
                };
                Self::save_settings(&settings, &ui_weak, &patch);
            }
        });

        let settings = ctx.settings.clone();
        let ui_weak = ui.as_weak();
        ui.on_batch_size_selected(move |index| {
            if let Some(size) = pick(&BatchSize::ALL, index) {
                let patch = SettingsPatch {
                    processing_batch_size: Some(size),
                    ..Default::default()
                };
                Self::save_settings(&settings, &ui_weak, &patch);
            }
        });

        let settings = ctx.settings.clone();
        let ui_weak = ui.as_weak();
        ui.on_reset_settings(move || {
            if let Err(e) = settings.reset() {
                tracing::error!("Failed to reset settings: {}", e);
                Self::show_message_dialog(&ui_weak, "Could not reset settings", e.to_string());
            }
        });
    }

    /// Subscribe to state changes and update UI accordingly
    ///
    /// This spawns a background thread that listens for state change events
    /// and updates the Slint UI via the EventLoopBridge.
    fn setup_state_subscription(bridge: &EventLoopBridge<MainWindow>, ctx: &AppContext) {
        let bridge_handle = bridge.clone_handle();
        let state_manager = Arc::clone(&ctx.state);
        let mut rx = ctx.state.subscribe();

        std::thread::spawn(move || {
            tracing::debug!("State subscription thread started");

            loop {
                match rx.blocking_recv() {
                    Ok(change) => {
                        tracing::trace!("State change received: {:?}", change);
                        let snapshot = state_manager.snapshot();

                        match change {
                            StateChange::ViewChanged { view } => {
                                bridge_handle.update_ui(move |ui| ui.set_view(view_index(view)));
                            }
                            StateChange::SidebarToggled { collapsed } => {
                                bridge_handle
                                    .update_ui(move |ui| ui.set_sidebar_collapsed(collapsed));
                            }
                            StateChange::FileUploaded { .. }
                            | StateChange::FileCleared
                            | StateChange::FileStatsUpdated { .. } => {
                                bridge_handle.update_ui(move |ui| apply_file_panel(ui, &snapshot));
                            }
                            StateChange::StepChanged { .. }
                            | StateChange::SelectionChanged { .. }
                            | StateChange::ConfirmationChanged { .. } => {
                                bridge_handle.update_ui(move |ui| apply_dashboard(ui, &snapshot));
                            }
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            "State subscription lagged by {} events, resyncing",
                            skipped
                        );
                        let snapshot = state_manager.snapshot();
                        bridge_handle.update_ui(move |ui| {
                            ui.set_view(view_index(snapshot.view));
                            apply_file_panel(ui, &snapshot);
                            apply_dashboard(ui, &snapshot);
                        });
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }

            tracing::debug!("State subscription thread terminated gracefully");
        });
    }

    /// Forward settings, theme and update-state changes to the UI
    fn setup_store_subscriptions(bridge: &EventLoopBridge<MainWindow>, ctx: &AppContext) {
        let handle = bridge.clone_handle();

        let usage = ctx.usage.clone();
        handle.forward_watch(ctx.settings.subscribe(), move |ui, settings: AppSettings| {
            usage.set_enabled(settings.anonymous_usage_stats);
            apply_settings(ui, &settings);
        });

        let styles = ctx.styles.clone();
        handle.forward_watch(ctx.themes.subscribe(), move |ui, theme: &'static Theme| {
            apply_theme(ui, theme, &styles);
        });

        handle.forward_watch(ctx.updates.subscribe(), |ui, update: UpdateState| {
            apply_update_state(ui, &update);
        });
    }

    /// Validate and install a picked or typed file, then inspect it
    ///
    /// Both upload entry points go through here so they accept and reject the
    /// same files with the same message.
    fn handle_upload(
        ctx: &AppContext,
        bridge: &EventLoopBridgeHandle<MainWindow>,
        path: Utf8PathBuf,
    ) {
        let name = path.file_name().unwrap_or(path.as_str()).to_string();

        if let UploadDecision::Rejected(rejection) = validate_upload(&name) {
            ctx.usage.record_rejected_upload();
            Self::show_message_dialog(bridge.ui_weak(), "Unsupported file", rejection.to_string());
            return;
        }

        let size = match std::fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                tracing::warn!("Could not read size of {}: {}", path, e);
                0
            }
        };

        let mut file = UploadedFile::from_path(path, size);
        let (upload_id, _) = ctx.state.upload_file(file.clone());
        file.upload_id = upload_id;
        ctx.usage.record_upload();

        let introspector = ctx.introspector;
        let state = Arc::clone(&ctx.state);
        bridge.spawn_async(move || async move {
            let stats = introspector.inspect(&file).await;
            state.apply_file_stats(upload_id, stats);
        });
    }

    /// Build the export for `extension`, ask where to save it and write it
    fn handle_export(
        ctx: &AppContext,
        bridge: &EventLoopBridgeHandle<MainWindow>,
        extension: &str,
    ) {
        let Some(format) = ExportFormat::from_extension(extension) else {
            tracing::warn!("Ignoring export request for unknown format: {}", extension);
            return;
        };

        let result = ctx
            .state
            .read(exportable_operations)
            .and_then(|operations| {
                build_artifact(format, &ctx.settings.settings(), &operations, chrono::Utc::now())
            });

        let artifact = match result {
            Ok(artifact) => artifact,
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                Self::show_message_dialog(bridge.ui_weak(), "Export failed", e.to_string());
                return;
            }
        };

        tracing::info!("Exporting as {}...", format.label());
        let Some(path) =
            Self::show_save_dialog(&artifact.file_name, ctx.app_config.export_dir.as_deref())
        else {
            tracing::debug!("Export cancelled");
            return;
        };

        let usage = ctx.usage.clone();
        let bridge_clone = bridge.clone();
        bridge.spawn_async(move || async move {
            match write_artifact(&artifact, &path).await {
                Ok(()) => {
                    usage.record_export();
                    bridge_clone.update_ui(move |ui| {
                        show_message(ui, "Export complete", format!("Saved {}", path));
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to write export to {}: {}", path, e);
                    bridge_clone.update_ui(move |ui| {
                        show_message(ui, "Export failed", e.to_string());
                    });
                }
            }
        });
    }

    fn save_settings(
        settings: &SettingsStore,
        ui_weak: &slint::Weak<MainWindow>,
        patch: &SettingsPatch,
    ) {
        if let Err(e) = settings.update(patch) {
            tracing::error!("Failed to save settings: {}", e);
            Self::show_message_dialog(ui_weak, "Could not save settings", e.to_string());
        }
    }

    /// Show an informational message dialog
    ///
    /// # Arguments
    /// * `ui_weak` - Weak reference to the UI
    /// * `title` - Dialog title
    /// * `message` - Message text
    fn show_message_dialog(
        ui_weak: &slint::Weak<MainWindow>,
        title: impl Into<SharedString>,
        message: impl Into<SharedString>,
    ) {
        if let Some(ui) = ui_weak.upgrade() {
            show_message(&ui, title, message);
        }
    }

    /// Show a native file picker for datasets
    ///
    /// # Returns
    /// The selected file path, or None if cancelled
    fn show_file_picker() -> Option<Utf8PathBuf> {
        use rfd::FileDialog;

        FileDialog::new()
            .set_title("Upload dataset")
            .add_filter("Datasets", &ACCEPTED_EXTENSIONS)
            .add_filter("All files", &["*"])
            .pick_file()
            .and_then(|path| {
                Utf8PathBuf::try_from(path)
                    .map_err(|e| {
                        tracing::error!("Failed to convert path to UTF-8: {}", e);
                        e
                    })
                    .ok()
            })
    }

    /// Show a native save dialog for an export artifact
    fn show_save_dialog(file_name: &str, directory: Option<&str>) -> Option<Utf8PathBuf> {
        use rfd::FileDialog;

        let mut dialog = FileDialog::new()
            .set_title("Save export")
            .set_file_name(file_name);

        if let Some(dir) = directory {
            dialog = dialog.set_directory(dir);
        }

        dialog.save_file().and_then(|path| {
            Utf8PathBuf::try_from(path)
                .map_err(|e| {
                    tracing::error!("Failed to convert path to UTF-8: {}", e);
                    e
                })
                .ok()
        })
    }
}

// ===== UI rendering helpers (run on the Slint thread) =====

fn show_message(ui: &MainWindow, title: impl Into<SharedString>, message: impl Into<SharedString>) {
    ui.set_message_title(title.into());
    ui.set_message_text(message.into());
    ui.set_show_message_dialog(true);
}

fn apply_file_panel(ui: &MainWindow, state: &AppState) {
    match &state.uploaded_file {
        Some(file) => {
            ui.set_has_file(true);
            ui.set_file_name(file.name.as_str().into());
            ui.set_file_size(format_file_size(file.size).into());
        }
        None => {
            ui.set_has_file(false);
            ui.set_file_name(SharedString::new());
            ui.set_file_size(SharedString::new());
        }
    }

    let (rows, columns) = stats_text(state.file_stats);
    ui.set_file_rows(rows.into());
    ui.set_file_columns(columns.into());
}

fn apply_dashboard(ui: &MainWindow, state: &AppState) {
    ui.set_step(step_index(state.step));
    ui.set_confirm_pending(state.awaiting_confirmation);
    ui.set_selected_count(state.selected_operations.len() as i32);
    ui.set_applied_summary(applied_summary(state).into());

    let operations: Vec<OperationEntry> = CLEANING_OPERATIONS
        .iter()
        .map(|op| OperationEntry {
            id: op.id.into(),
            label: op.label.into(),
            selected: state.is_selected(op.id),
        })
        .collect();
    ui.set_operations(ModelRc::new(VecModel::from(operations)));
}

fn apply_settings(ui: &MainWindow, settings: &AppSettings) {
    ui.set_preview_limit_index(index_of(&PreviewRowLimit::ALL, &settings.preview_row_limit));
    ui.set_delimiter_index(index_of(&CsvDelimiter::ALL, &settings.csv_delimiter));
    ui.set_batch_size_index(index_of(&BatchSize::ALL, &settings.processing_batch_size));
    ui.set_include_metadata(settings.include_metadata);
    ui.set_compress_exports(settings.compress_exports);
    ui.set_confirm_before_cleaning(settings.confirm_before_cleaning);
    ui.set_show_operation_summary(settings.show_operation_summary);
    ui.set_auto_detect_data_types(settings.auto_detect_data_types);
    ui.set_clear_data_on_logout(settings.clear_data_on_logout);
    ui.set_anonymous_usage_stats(settings.anonymous_usage_stats);
    ui.set_enable_experimental_features(settings.enable_experimental_features);
    ui.set_developer_mode(settings.developer_mode);

    let limit = settings.preview_row_limit.rows();
    ui.set_preview_caption(preview_caption(limit).into());

    let rows: Vec<ModelRc<StandardListViewItem>> = preview_rows(limit)
        .iter()
        .map(|row| {
            let cells: Vec<StandardListViewItem> = row
                .fields()
                .iter()
                .map(|field| StandardListViewItem::from(field.as_str()))
                .collect();
            ModelRc::new(VecModel::from(cells))
        })
        .collect();
    ui.set_preview_rows(ModelRc::new(VecModel::from(rows)));
}

/// Mirror the applied style variables into the Slint palette global.
fn apply_theme(ui: &MainWindow, theme: &Theme, styles: &StyleVariables) {
    let palette = ui.global::<Palette>();
    let color = |name: &str| {
        styles
            .get(name)
            .map(|hex| hex_to_color(&hex))
            .unwrap_or_default()
    };

    palette.set_background(color("--color-background"));
    palette.set_surface(color("--color-surface"));
    palette.set_surface_hover(color("--color-surface-hover"));
    palette.set_border(color("--color-border"));
    palette.set_text(color("--color-text"));
    palette.set_text_muted(color("--color-text-muted"));
    palette.set_accent(color("--color-accent"));
    palette.set_accent_hover(color("--color-accent-hover"));

    ui.set_current_theme_id(theme.id.into());
}

fn apply_update_state(ui: &MainWindow, update: &UpdateState) {
    ui.set_update_status(update.status_text().into());
    ui.set_update_checking(update.checking);
    ui.set_update_downloading(update.downloading);
    ui.set_update_downloaded(update.update_downloaded);
    ui.set_download_progress(i32::from(update.download_progress));
}

// ===== Pure helpers =====

fn view_index(view: AppView) -> i32 {
    match view {
        AppView::Login => 0,
        AppView::Registration => 1,
        AppView::Main => 2,
    }
}

fn step_index(step: CleaningStep) -> i32 {
    match step {
        CleaningStep::Initial => 0,
        CleaningStep::Selecting => 1,
        CleaningStep::Cleaned => 2,
    }
}

/// Sidebar text for rows and columns; `-` while stats are unknown.
fn stats_text(stats: Option<FileStats>) -> (String, String) {
    match stats {
        Some(stats) => (format_number(stats.rows), format_number(stats.columns)),
        None => ("-".to_string(), "-".to_string()),
    }
}

/// Labels of the selected operations, in selection order.
fn applied_summary(state: &AppState) -> String {
    let labels: Vec<&str> = state
        .selected_operations
        .iter()
        .filter_map(|id| CLEANING_OPERATIONS.iter().find(|op| op.id == id))
        .map(|op| op.label)
        .collect();
    format!("{} ({} rows)", labels.join(", "), SAMPLE_DATA.len())
}

/// Patch for a boolean setting identified by its persisted key.
fn toggle_patch(key: &str, value: bool) -> Option<SettingsPatch> {
    let mut patch = SettingsPatch::default();
    let field = match key {
        "includeMetadata" => &mut patch.include_metadata,
        "compressExports" => &mut patch.compress_exports,
        "confirmBeforeCleaning" => &mut patch.confirm_before_cleaning,
        "showOperationSummary" => &mut patch.show_operation_summary,
        "autoDetectDataTypes" => &mut patch.auto_detect_data_types,
        "clearDataOnLogout" => &mut patch.clear_data_on_logout,
        "anonymousUsageStats" => &mut patch.anonymous_usage_stats,
        "enableExperimentalFeatures" => &mut patch.enable_experimental_features,
        "developerMode" => &mut patch.developer_mode,
        _ => return None,
    };
    *field = Some(value);
    Some(patch)
}

fn pick<T: Copy>(options: &[T], index: i32) -> Option<T> {
    usize::try_from(index)
        .ok()
        .and_then(|i| options.get(i).copied())
}

fn index_of<T: PartialEq>(options: &[T], value: &T) -> i32 {
    options
        .iter()
        .position(|option| option == value)
        .map_or(-1, |i| i as i32)
}

fn hex_to_color(hex: &str) -> slint::Color {
    match parse_hex_color(hex) {
        Some((r, g, b)) => slint::Color::from_rgb_u8(r, g, b),
        None => {
            tracing::warn!("Invalid theme color: {}", hex);
            slint::Color::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_text() {
        assert_eq!(stats_text(None), ("-".to_string(), "-".to_string()));
        assert_eq!(
            stats_text(Some(FileStats {
                rows: 12345,
                columns: 7
            })),
            ("12,345".to_string(), "7".to_string())
        );
    }

    #[test]
    fn test_toggle_patch_keys() {
        let patch = toggle_patch("compressExports", true).unwrap();
        assert_eq!(patch.compress_exports, Some(true));
        assert_eq!(patch.include_metadata, None);

        assert!(toggle_patch("previewRowLimit", true).is_none());
    }

    #[test]
    fn test_pick_and_index_of() {
        assert_eq!(pick(&CsvDelimiter::ALL, 3), Some(CsvDelimiter::Pipe));
        assert_eq!(pick(&CsvDelimiter::ALL, -1), None);
        assert_eq!(pick(&CsvDelimiter::ALL, 4), None);
        assert_eq!(index_of(&PreviewRowLimit::ALL, &PreviewRowLimit::Hundred), 1);
    }

    #[test]
    fn test_applied_summary_keeps_selection_order() {
        let mut state = AppState::default();
        state.upload_file(UploadedFile::from_bytes("a.csv", b"x".to_vec()));
        state.toggle_operation("types");
        state.toggle_operation("duplicates");

        assert_eq!(
            applied_summary(&state),
            "Convert data types, Remove duplicates (5 rows)"
        );
    }

    #[test]
    fn test_view_and_step_indices_match_markup() {
        assert_eq!(view_index(AppView::Login), 0);
        assert_eq!(view_index(AppView::Main), 2);
        assert_eq!(step_index(CleaningStep::Selecting), 1);
    }
}
