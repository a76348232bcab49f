//! Services module - the stores and logic behind the Daner shell.
//!
//! Every service here is **framework-agnostic**: no Slint types, only plain data,
//! tokio primitives and the storage boundary from [`crate::config`].
//!
//! # Components
//!
//! - [`SettingsStore`]: user preferences, merged over defaults and written through
//!   to durable storage on every change.
//! - [`ThemeStore`]: the selected palette; applies its colors to a [`StyleSink`]
//!   and persists the id.
//! - [`UpdateSimulator`]: the mocked check → download → install cycle, with
//!   injectable randomness, clock and network presence.
//! - [`FileIntrospector`]: row/column estimates for uploaded CSV/JSON files.
//! - [`validate_upload`]: the single accept/reject decision for picked and dropped files.
//! - [`export`]: encoding of the sample dataset as CSV/JSON/XLSX, optionally zipped.
//! - [`auth`]: form checks for the mock login and registration views.
//!
//! # Usage Example
//!
//! ```ignore
//! use daner::config::MemoryStore;
//! use daner::services::{SettingsStore, ThemeStore, StyleVariables};
//! use std::sync::Arc;
//!
//! let storage = Arc::new(MemoryStore::new());
//! let settings = SettingsStore::load(storage.clone());
//! let themes = ThemeStore::load(storage, Arc::new(StyleVariables::new()));
//!
//! themes.select("dracula")?;
//! ```

pub mod auth;
pub mod export;
pub mod introspection;
pub mod settings_store;
pub mod theme_store;
pub mod update;
pub mod upload;

pub use auth::{AuthError, LoginForm, RegistrationForm, SocialProvider};
pub use export::{ExportArtifact, ExportError, ExportFormat, ExportMetadata, build_artifact};
pub use introspection::{FileIntrospector, FileKind, IntrospectionError};
pub use settings_store::{SettingsError, SettingsStore};
pub use theme_store::{StyleSink, StyleVariables, ThemeStore, apply_theme};
pub use update::{
    CheckOutcome, Clock, FixedRandom, NetworkMonitor, NetworkStatus, RandomSource,
    ThreadRandom, TokioClock, UpdateSimulator,
};
pub use upload::{UploadDecision, UploadRejection, UploadValidator, validate_upload};
