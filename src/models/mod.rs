//! Data models for the Daner application.
//!
//! This module contains all the core data structures used throughout the application:
//! - [`AppState`]: The shell view, the uploaded file and the dashboard cleaning flow
//! - [`AppSettings`]: User preferences persisted under `datasetCleanerSettings`
//! - [`Theme`]: The fixed catalog of eight color palettes
//! - [`UpdateState`]: Snapshot of the simulated self-update cycle
//! - [`UploadedFile`] / [`FileStats`]: The selected dataset and its row/column estimate
//! - [`catalog`]: Cleaning operations and the fixed sample dataset
//!
//! # Architecture Note
//!
//! The models are plain data. Mutation goes through the owning store
//! ([`StateManager`](crate::state::StateManager),
//! [`SettingsStore`](crate::services::SettingsStore),
//! [`ThemeStore`](crate::services::ThemeStore) or
//! [`UpdateSimulator`](crate::services::UpdateSimulator)).

pub mod app_state;
pub mod catalog;
pub mod file;
pub mod settings;
pub mod theme;
pub mod update;

pub use app_state::{AppState, AppView, ApplyOutcome, CleaningStep};
pub use catalog::{CLEANING_OPERATIONS, CleaningOperation, SAMPLE_DATA, SampleRow};
pub use file::{FileSource, FileStats, UploadedFile};
pub use settings::{AppSettings, BatchSize, CsvDelimiter, PreviewRowLimit, SettingsPatch};
pub use theme::{THEMES, Theme, ThemeColors};
pub use update::UpdateState;
