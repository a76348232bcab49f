use crate::config::{KeyValueStore, StorageError, THEME_KEY};
use crate::models::{THEMES, Theme};
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

/// Global style scope the active theme is written into.
pub trait StyleSink: Send + Sync {
    /// Set one named style variable (e.g. `--color-accent`).
    fn set_variable(&self, name: &str, value: &str);
}

/// [`StyleSink`] holding the variables in memory; the GUI reads them back to
/// build its palette.
#[derive(Debug, Default)]
pub struct StyleVariables {
    vars: RwLock<IndexMap<String, String>>,
}

impl StyleVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.vars.read().unwrap().get(name).cloned()
    }

    pub fn snapshot(&self) -> IndexMap<String, String> {
        self.vars.read().unwrap().clone()
    }
}

impl StyleSink for StyleVariables {
    fn set_variable(&self, name: &str, value: &str) {
        self.vars
            .write()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }
}

/// Holds the selected theme and keeps the style scope in sync with it.
pub struct ThemeStore {
    storage: Arc<dyn KeyValueStore>,
    sink: Arc<dyn StyleSink>,
    theme_tx: watch::Sender<&'static Theme>,
}

impl ThemeStore {
    /// Resolve the persisted theme id and apply the result.
    ///
    /// Unknown or absent ids resolve to the first catalog entry. The resolved
    /// theme is always applied to `sink`, including on first start.
    pub fn load(storage: Arc<dyn KeyValueStore>, sink: Arc<dyn StyleSink>) -> Self {
        let theme = match storage.get(THEME_KEY) {
            Some(id) => Theme::find(&id).unwrap_or_else(|| {
                tracing::warn!("Saved theme '{}' is not in the catalog, using default", id);
                Theme::fallback()
            }),
            None => Theme::fallback(),
        };

        apply_theme(sink.as_ref(), theme);
        tracing::info!("Theme loaded: {}", theme.id);

        let (theme_tx, _) = watch::channel(theme);
        Self {
            storage,
            sink,
            theme_tx,
        }
    }

    pub fn current(&self) -> &'static Theme {
        *self.theme_tx.borrow()
    }

    /// The full catalog, in display order.
    pub fn themes(&self) -> &'static [Theme] {
        &THEMES
    }

    /// Persist `theme_id`, then re-apply the colors and publish it.
    ///
    /// Returns `Ok(false)` without any effect when the id is not in the catalog.
    /// When the write fails the current theme and its colors stay as they were.
    pub fn select(&self, theme_id: &str) -> Result<bool, StorageError> {
        let Some(theme) = Theme::find(theme_id) else {
            tracing::debug!("Ignoring unknown theme id: {}", theme_id);
            return Ok(false);
        };

        self.storage.set(THEME_KEY, theme.id)?;
        apply_theme(self.sink.as_ref(), theme);
        self.theme_tx.send_replace(theme);

        tracing::info!("Theme selected: {}", theme.id);
        Ok(true)
    }

    pub fn subscribe(&self) -> watch::Receiver<&'static Theme> {
        self.theme_tx.subscribe()
    }
}

/// Write the theme's eight colors into their style variables.
pub fn apply_theme(sink: &dyn StyleSink, theme: &Theme) {
    for (name, value) in theme.colors.style_variables() {
        sink.set_variable(name, value);
    }
}
