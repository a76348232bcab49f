use crate::models::catalog::find_operation;
use crate::models::file::{FileStats, UploadedFile};
use indexmap::IndexSet;

/// Top-level view selected by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppView {
    #[default]
    Login,
    Registration,
    Main,
}

/// Local flow of the dashboard, layered on top of the uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleaningStep {
    /// No file uploaded.
    #[default]
    Initial,
    /// File present, operations being picked.
    Selecting,
    /// Cleaning applied; export available.
    Cleaned,
}

/// Result of asking to apply the selected cleaning operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Moved to [`CleaningStep::Cleaned`].
    Applied,
    /// A confirmation step is now pending; nothing changed yet.
    NeedsConfirmation,
    /// Not in [`CleaningStep::Selecting`].
    WrongStep,
    /// No operation selected.
    NothingSelected,
}

/// Single source of truth for the shell and dashboard state.
///
/// # Thread Safety
///
/// `AppState` is wrapped in `Arc<RwLock<AppState>>` by [`crate::state::StateManager`].
/// Never mutate it directly; go through the state manager so change events are
/// emitted.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    // Shell
    pub view: AppView,
    pub sidebar_collapsed: bool,

    // Upload
    pub uploaded_file: Option<UploadedFile>,
    /// Generation of the current upload; 0 when no file is present.
    pub upload_timestamp: u64,
    /// Monotonic source for upload generations. Never reset, so a re-selected
    /// file never shares an identity with an earlier one.
    upload_counter: u64,
    pub file_stats: Option<FileStats>,

    // Dashboard flow
    pub step: CleaningStep,
    pub selected_operations: IndexSet<String>,
    pub awaiting_confirmation: bool,
}

impl AppState {
    /// Install a newly uploaded file and restart the flow at `Selecting`.
    ///
    /// Returns the upload generation assigned to the file.
    pub fn upload_file(&mut self, mut file: UploadedFile) -> u64 {
        self.upload_counter += 1;
        file.upload_id = self.upload_counter;

        self.uploaded_file = Some(file);
        self.upload_timestamp = self.upload_counter;
        self.file_stats = None;
        self.step = CleaningStep::Selecting;
        self.selected_operations.clear();
        self.awaiting_confirmation = false;

        self.upload_counter
    }

    /// Drop the uploaded file; the flow falls back to `Initial`.
    pub fn clear_file(&mut self) {
        self.uploaded_file = None;
        self.upload_timestamp = 0;
        self.file_stats = None;
        self.step = CleaningStep::Initial;
        self.selected_operations.clear();
        self.awaiting_confirmation = false;
    }

    /// Add or remove an operation id from the selection.
    ///
    /// Returns false (and changes nothing) for ids outside the catalog.
    pub fn toggle_operation(&mut self, id: &str) -> bool {
        if find_operation(id).is_none() {
            return false;
        }
        if !self.selected_operations.shift_remove(id) {
            self.selected_operations.insert(id.to_string());
        }
        true
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_operations.contains(id)
    }

    pub fn can_apply(&self) -> bool {
        self.step == CleaningStep::Selecting && !self.selected_operations.is_empty()
    }

    /// Ask to apply cleaning. With `confirm_first`, only a confirmation step is opened.
    pub fn request_apply(&mut self, confirm_first: bool) -> ApplyOutcome {
        if self.step != CleaningStep::Selecting {
            return ApplyOutcome::WrongStep;
        }
        if self.selected_operations.is_empty() {
            return ApplyOutcome::NothingSelected;
        }
        if confirm_first {
            self.awaiting_confirmation = true;
            return ApplyOutcome::NeedsConfirmation;
        }
        self.step = CleaningStep::Cleaned;
        ApplyOutcome::Applied
    }

    /// Accept a pending confirmation. Returns true when the flow moved to `Cleaned`.
    pub fn confirm_apply(&mut self) -> bool {
        if !self.awaiting_confirmation {
            return false;
        }
        self.awaiting_confirmation = false;
        if !self.can_apply() {
            return false;
        }
        self.step = CleaningStep::Cleaned;
        true
    }

    pub fn dismiss_confirmation(&mut self) {
        self.awaiting_confirmation = false;
    }

    /// Store introspection results issued for `upload_id`.
    ///
    /// Results for any other generation are stale and ignored; returns whether
    /// they were applied.
    pub fn apply_file_stats(&mut self, upload_id: u64, stats: Option<FileStats>) -> bool {
        let current = self.uploaded_file.as_ref().map(|f| f.upload_id);
        if current != Some(upload_id) {
            return false;
        }
        self.file_stats = stats;
        true
    }

    /// Leave the main view. The uploaded file is always dropped.
    pub fn logout(&mut self) {
        self.view = AppView::Login;
        self.clear_file();
    }
}
