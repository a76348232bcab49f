// State management module
//
// This module provides the StateManager which wraps AppState with thread-safe access
// using Arc<RwLock<T>> and emits change events for GUI updates.

use crate::models::{AppState, AppView, ApplyOutcome, CleaningStep, FileStats, UploadedFile};
use crate::services::auth::{AuthError, LoginForm, RegistrationForm, SocialProvider};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when state is modified
///
/// These events are emitted to notify interested parties (primarily the GUI)
/// about state changes without requiring them to poll the state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// The shell switched between login, registration and the main view
    ViewChanged { view: AppView },

    /// A new file became the uploaded file
    FileUploaded { upload_id: u64, name: String },

    /// The uploaded file was dropped (cancel or logout)
    FileCleared,

    /// The dashboard flow moved to another step
    StepChanged { step: CleaningStep },

    /// The selected cleaning operations changed
    SelectionChanged { selected: Vec<String> },

    /// A confirmation before applying cleaning was opened or closed
    ConfirmationChanged { pending: bool },

    /// Row/column stats for the current upload arrived (or were reset)
    FileStatsUpdated {
        upload_id: u64,
        stats: Option<FileStats>,
    },

    /// The sidebar was collapsed or expanded
    SidebarToggled { collapsed: bool },
}

/// Thread-safe state manager with event emission
///
/// This is the central state management component that:
/// - Provides thread-safe access to [`AppState`] via `Arc<RwLock<T>>`
/// - Detects state changes and emits [`StateChange`] events
/// - Drives the view and dashboard transitions
/// - Supports subscribing to state changes via tokio broadcast channels
///
/// # Usage
///
/// Always use `StateManager` instead of accessing [`AppState`] directly:
/// - [`read()`](Self::read) for reading state without cloning it
/// - [`update()`](Self::update) for mutations with automatic event emission
/// - [`subscribe()`](Self::subscribe) for listening to state changes
///
/// # Related Types
///
/// - [`crate::models::AppState`]: The underlying state structure
/// - [`StateChange`]: Event types emitted on state mutations
/// - [`crate::ui::controller::GuiController`]: Primary consumer of state events
pub struct StateManager {
    /// The application state protected by RwLock for thread-safe access
    state: Arc<RwLock<AppState>>,

    /// Broadcast channel for emitting state change events
    state_tx: broadcast::Sender<StateChange>,
}

impl StateManager {
    /// Create a new StateManager with default state
    ///
    /// # Returns
    /// A new StateManager with a broadcast channel buffer of 100 events
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(AppState::default())),
            state_tx,
        }
    }

    /// Get a read-only snapshot of the current state
    ///
    /// This clones the entire state, so it's safe to use without holding locks.
    pub fn snapshot(&self) -> AppState {
        self.state.read().unwrap().clone()
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let step = state_manager.read(|state| state.step);
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AppState) -> R,
    {
        let state = self.state.read().unwrap();
        f(&state)
    }

    /// Update the state and emit change events
    ///
    /// This is the primary way to modify state. It:
    /// 1. Captures the old state
    /// 2. Applies the update function
    /// 3. Detects what changed
    /// 4. Emits appropriate events
    ///
    /// # Arguments
    /// * `update_fn` - A function that mutates the state
    ///
    /// # Returns
    /// A vector of StateChange events that were emitted
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut AppState),
    {
        self.update_with(update_fn).1
    }

    /// Like [`update()`](Self::update), also returning the closure's result.
    fn update_with<F, R>(&self, update_fn: F) -> (R, Vec<StateChange>)
    where
        F: FnOnce(&mut AppState) -> R,
    {
        let mut state = self.state.write().unwrap();
        let old_state = state.clone();

        let result = update_fn(&mut state);

        let changes = self.detect_changes(&old_state, &state);

        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.state_tx.send(change.clone());
        }

        (result, changes)
    }

    /// Subscribe to state change events
    ///
    /// Returns a receiver that will get notified of all future state changes.
    /// Multiple subscribers can listen simultaneously.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    /// Detect what changed between two states and generate events
    fn detect_changes(&self, old: &AppState, new: &AppState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if old.view != new.view {
            changes.push(StateChange::ViewChanged { view: new.view });
        }

        if old.sidebar_collapsed != new.sidebar_collapsed {
            changes.push(StateChange::SidebarToggled {
                collapsed: new.sidebar_collapsed,
            });
        }

        // Upload edges are keyed on the generation, so re-selecting the same
        // file still counts as a new upload
        if old.upload_timestamp != new.upload_timestamp {
            match &new.uploaded_file {
                Some(file) => changes.push(StateChange::FileUploaded {
                    upload_id: file.upload_id,
                    name: file.name.clone(),
                }),
                None => changes.push(StateChange::FileCleared),
            }
        }

        if old.step != new.step {
            changes.push(StateChange::StepChanged { step: new.step });
        }

        if old.selected_operations != new.selected_operations {
            changes.push(StateChange::SelectionChanged {
                selected: new.selected_operations.iter().cloned().collect(),
            });
        }

        if old.awaiting_confirmation != new.awaiting_confirmation {
            changes.push(StateChange::ConfirmationChanged {
                pending: new.awaiting_confirmation,
            });
        }

        if old.file_stats != new.file_stats {
            changes.push(StateChange::FileStatsUpdated {
                upload_id: new.upload_timestamp,
                stats: new.file_stats,
            });
        }

        changes
    }

    // Convenience methods for common state updates

    /// Sign in with the login form and enter the main view
    pub fn login(&self, form: &LoginForm) -> Result<Vec<StateChange>, AuthError> {
        form.validate()?;
        tracing::info!("User signed in");
        Ok(self.navigate(AppView::Main))
    }

    /// Mock social sign-in; always succeeds
    pub fn social_login(&self, provider: SocialProvider) -> Vec<StateChange> {
        tracing::info!("Logging in with {}", provider.label());
        self.navigate(AppView::Main)
    }

    /// Submit the registration form and return to the login view
    pub fn register(&self, form: &RegistrationForm) -> Result<Vec<StateChange>, AuthError> {
        form.validate()?;
        tracing::info!("Registered account for {}", form.email);
        Ok(self.navigate(AppView::Login))
    }

    /// Switch the top-level view
    pub fn navigate(&self, view: AppView) -> Vec<StateChange> {
        self.update(|state| state.view = view)
    }

    /// Leave the main view, dropping the uploaded file
    ///
    /// # Arguments
    /// * `clear_data` - Value of the `clearDataOnLogout` setting
    pub fn logout(&self, clear_data: bool) -> Vec<StateChange> {
        if clear_data {
            tracing::info!("Clearing session data on logout...");
        }
        tracing::info!("User logged out");
        self.update(|state| state.logout())
    }

    pub fn toggle_sidebar(&self) -> Vec<StateChange> {
        self.update(|state| state.sidebar_collapsed = !state.sidebar_collapsed)
    }

    /// Install a newly uploaded file
    ///
    /// # Returns
    /// The upload generation assigned to the file (used to tag introspection
    /// results) and the emitted events
    pub fn upload_file(&self, file: UploadedFile) -> (u64, Vec<StateChange>) {
        tracing::info!("File uploaded: {} ({} bytes)", file.name, file.size);
        self.update_with(|state| state.upload_file(file))
    }

    /// Cancel the session: drop the uploaded file and return to the initial step
    pub fn cancel_session(&self) -> Vec<StateChange> {
        tracing::info!("Session cancelled");
        self.update(|state| state.clear_file())
    }

    /// Toggle a cleaning operation in the selection
    pub fn toggle_operation(&self, id: &str) -> Vec<StateChange> {
        let (known, changes) = self.update_with(|state| state.toggle_operation(id));
        if !known {
            tracing::warn!("Ignoring unknown cleaning operation: {}", id);
        }
        changes
    }

    /// Ask to apply the selected operations
    ///
    /// # Arguments
    /// * `confirm_first` - Value of the `confirmBeforeCleaning` setting
    pub fn request_apply(&self, confirm_first: bool) -> (ApplyOutcome, Vec<StateChange>) {
        let (outcome, changes) = self.update_with(|state| state.request_apply(confirm_first));
        tracing::debug!("Apply cleaning requested: {:?}", outcome);
        (outcome, changes)
    }

    /// Accept the pending confirmation and apply cleaning
    pub fn confirm_apply(&self) -> Vec<StateChange> {
        self.update(|state| {
            state.confirm_apply();
        })
    }

    pub fn dismiss_confirmation(&self) -> Vec<StateChange> {
        self.update(|state| state.dismiss_confirmation())
    }

    /// Store stats computed for `upload_id`, discarding stale results
    pub fn apply_file_stats(&self, upload_id: u64, stats: Option<FileStats>) -> Vec<StateChange> {
        let (applied, changes) =
            self.update_with(|state| state.apply_file_stats(upload_id, stats));
        if !applied {
            tracing::debug!("Discarding stale file stats for upload {}", upload_id);
        }
        changes
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

// Make StateManager cloneable for sharing across threads
impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
        }
    }
}
