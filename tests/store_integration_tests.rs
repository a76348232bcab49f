//! Integration tests for the settings and theme stores
//!
//! These tests verify:
//! - Patch sequences merge field-wise over the defaults (property-based)
//! - The persisted record always equals the in-memory settings
//! - Theme selection, fallback and style variable application
//! - Subscribers observe every committed change

use daner::config::{KeyValueStore, MemoryStore, SETTINGS_KEY, THEME_KEY};
use daner::models::{
    AppSettings, BatchSize, CsvDelimiter, PreviewRowLimit, SettingsPatch, THEMES,
};
use daner::services::{StyleSink, StyleVariables};
use daner::{SettingsStore, ThemeStore};
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

fn preview_limit() -> impl Strategy<Value = PreviewRowLimit> {
    prop::sample::select(PreviewRowLimit::ALL.to_vec())
}

fn delimiter() -> impl Strategy<Value = CsvDelimiter> {
    prop::sample::select(CsvDelimiter::ALL.to_vec())
}

fn batch_size() -> impl Strategy<Value = BatchSize> {
    prop::sample::select(BatchSize::ALL.to_vec())
}

prop_compose! {
    fn any_patch()(
        preview_row_limit in proptest::option::of(preview_limit()),
        csv_delimiter in proptest::option::of(delimiter()),
        flags in proptest::collection::vec(proptest::option::of(any::<bool>()), 9),
        processing_batch_size in proptest::option::of(batch_size()),
    ) -> SettingsPatch {
        SettingsPatch {
            preview_row_limit,
            csv_delimiter,
            include_metadata: flags[0],
            compress_exports: flags[1],
            confirm_before_cleaning: flags[2],
            show_operation_summary: flags[3],
            auto_detect_data_types: flags[4],
            clear_data_on_logout: flags[5],
            anonymous_usage_stats: flags[6],
            processing_batch_size,
            enable_experimental_features: flags[7],
            developer_mode: flags[8],
        }
    }
}

/// Field-wise "later wins" merge, written out independently of `merge_into`.
fn expected_merge(base: &AppSettings, patches: &[SettingsPatch]) -> AppSettings {
    let mut result = base.clone();
    for patch in patches {
        if let Some(v) = patch.preview_row_limit {
            result.preview_row_limit = v;
        }
        if let Some(v) = patch.csv_delimiter {
            result.csv_delimiter = v;
        }
        if let Some(v) = patch.include_metadata {
            result.include_metadata = v;
        }
        if let Some(v) = patch.compress_exports {
            result.compress_exports = v;
        }
        if let Some(v) = patch.confirm_before_cleaning {
            result.confirm_before_cleaning = v;
        }
        if let Some(v) = patch.show_operation_summary {
            result.show_operation_summary = v;
        }
        if let Some(v) = patch.auto_detect_data_types {
            result.auto_detect_data_types = v;
        }
        if let Some(v) = patch.clear_data_on_logout {
            result.clear_data_on_logout = v;
        }
        if let Some(v) = patch.anonymous_usage_stats {
            result.anonymous_usage_stats = v;
        }
        if let Some(v) = patch.processing_batch_size {
            result.processing_batch_size = v;
        }
        if let Some(v) = patch.enable_experimental_features {
            result.enable_experimental_features = v;
        }
        if let Some(v) = patch.developer_mode {
            result.developer_mode = v;
        }
    }
    result
}

proptest! {
    #[test]
    fn prop_patch_sequence_merges_over_defaults(
        first in any_patch(),
        second in any_patch(),
    ) {
        let storage = Arc::new(MemoryStore::new());
        let store = SettingsStore::load(storage.clone());

        store.update(&first).unwrap();
        let result = store.update(&second).unwrap();

        let expected = expected_merge(&AppSettings::default(), &[first, second]);
        prop_assert_eq!(&result, &expected);
        prop_assert_eq!(&store.settings(), &expected);

        // What was persisted is exactly what a fresh load sees
        let raw = storage.get(SETTINGS_KEY).unwrap();
        let persisted: AppSettings = serde_json::from_str(&raw).unwrap();
        prop_assert_eq!(&persisted, &expected);
        prop_assert_eq!(&SettingsStore::load(storage).settings(), &expected);
    }

    #[test]
    fn prop_unknown_theme_never_changes_selection(id in "[a-z-]{1,20}") {
        prop_assume!(THEMES.iter().all(|theme| theme.id != id));

        let storage = Arc::new(MemoryStore::with_entries([(THEME_KEY, "monokai")]));
        let store = ThemeStore::load(storage.clone(), Arc::new(StyleVariables::new()));

        prop_assert!(!store.select(&id).unwrap());
        prop_assert_eq!(store.current().id, "monokai");
        let persisted_theme = storage.get(THEME_KEY);
        prop_assert_eq!(persisted_theme.as_deref(), Some("monokai"));
    }
}

#[test]
fn test_settings_load_merges_partial_record() {
    let storage = Arc::new(MemoryStore::with_entries([(
        SETTINGS_KEY,
        r#"{"csvDelimiter":"tab","developerMode":true}"#,
    )]));

    let settings = SettingsStore::load(storage).settings();

    assert_eq!(settings.csv_delimiter, CsvDelimiter::Tab);
    assert!(settings.developer_mode);
    assert_eq!(settings.preview_row_limit, PreviewRowLimit::Hundred);
    assert!(settings.include_metadata);
}

#[test]
fn test_settings_invalid_value_keeps_default_for_that_key() {
    let storage = Arc::new(MemoryStore::with_entries([(
        SETTINGS_KEY,
        r#"{"previewRowLimit":7,"compressExports":true}"#,
    )]));

    let settings = SettingsStore::load(storage).settings();

    assert_eq!(settings.preview_row_limit, PreviewRowLimit::Hundred);
    assert!(settings.compress_exports);
}

#[test]
fn test_settings_subscriber_sees_reset() {
    let store = SettingsStore::load(Arc::new(MemoryStore::new()));
    let mut rx = store.subscribe();

    store
        .update(&SettingsPatch {
            anonymous_usage_stats: Some(true),
            ..Default::default()
        })
        .unwrap();
    assert!(rx.borrow_and_update().anonymous_usage_stats);

    store.reset().unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), AppSettings::default());
}

/// Records every variable write in order.
#[derive(Default)]
struct RecordingSink {
    writes: Mutex<Vec<(String, String)>>,
}

impl StyleSink for RecordingSink {
    fn set_variable(&self, name: &str, value: &str) {
        self.writes
            .lock()
            .unwrap()
            .push((name.to_string(), value.to_string()));
    }
}

#[test]
fn test_theme_load_always_applies_colors() {
    let sink = Arc::new(RecordingSink::default());
    let store = ThemeStore::load(Arc::new(MemoryStore::new()), sink.clone());

    let writes = sink.writes.lock().unwrap();
    assert_eq!(store.current().id, THEMES[0].id);
    assert_eq!(writes.len(), 8);
    assert_eq!(writes[0].0, "--color-background");
    assert_eq!(writes[7].0, "--color-accent-hover");
}

#[test]
fn test_theme_select_reapplies_and_notifies() {
    let sink = Arc::new(RecordingSink::default());
    let storage = Arc::new(MemoryStore::new());
    let store = ThemeStore::load(storage.clone(), sink.clone());
    let mut rx = store.subscribe();

    assert!(store.select("one-dark").unwrap());

    assert_eq!(sink.writes.lock().unwrap().len(), 16);
    assert_eq!(rx.borrow_and_update().id, "one-dark");
    assert_eq!(storage.get(THEME_KEY).as_deref(), Some("one-dark"));
}

#[test]
fn test_every_catalog_theme_is_selectable() {
    let vars = Arc::new(StyleVariables::new());
    let store = ThemeStore::load(Arc::new(MemoryStore::new()), vars.clone());

    for theme in store.themes() {
        assert!(store.select(theme.id).unwrap());
        assert_eq!(
            vars.get("--color-accent").as_deref(),
            Some(theme.colors.accent),
            "accent of {}",
            theme.id
        );
    }
    assert_eq!(store.themes().len(), 8);
}
