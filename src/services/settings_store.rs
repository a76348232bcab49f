use crate::config::{KeyValueStore, SETTINGS_KEY, StorageError};
use crate::models::{AppSettings, SettingsPatch};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::watch;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Holds the user preferences and writes every change through to storage.
///
/// The store is the only writer of [`AppSettings`]; consumers read snapshots via
/// [`settings()`](Self::settings) or watch for changes via [`subscribe()`](Self::subscribe).
pub struct SettingsStore {
    storage: Arc<dyn KeyValueStore>,
    settings_tx: watch::Sender<AppSettings>,
    /// Held across read-merge-write so concurrent patches are not lost
    write_lock: Mutex<()>,
}

impl SettingsStore {
    /// Create the store from whatever `storage` currently holds.
    ///
    /// Never fails: a missing or corrupt record yields the defaults, and any
    /// persisted key with an invalid value keeps its default.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let settings = match storage.get(SETTINGS_KEY) {
            Some(raw) => Self::decode(&raw),
            None => {
                tracing::debug!("No persisted settings, using defaults");
                AppSettings::default()
            }
        };

        let (settings_tx, _) = watch::channel(settings);
        Self {
            storage,
            settings_tx,
            write_lock: Mutex::new(()),
        }
    }

    /// Merge a persisted JSON record over the defaults, key by key.
    fn decode(raw: &str) -> AppSettings {
        let persisted = match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(other) => {
                tracing::warn!("Persisted settings are not an object ({}), using defaults", other);
                return AppSettings::default();
            }
            Err(e) => {
                tracing::warn!("Failed to parse saved settings, using defaults: {}", e);
                return AppSettings::default();
            }
        };

        let mut merged = match serde_json::to_value(AppSettings::default()) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => return AppSettings::default(),
        };
        let mut settings = AppSettings::default();

        for (key, value) in persisted {
            if !merged.contains_key(&key) {
                tracing::debug!("Ignoring unknown settings key: {}", key);
                continue;
            }

            let previous = merged.insert(key.clone(), value);
            match serde_json::from_value::<AppSettings>(serde_json::Value::Object(merged.clone())) {
                Ok(candidate) => settings = candidate,
                Err(e) => {
                    tracing::warn!("Dropping invalid persisted setting {}: {}", key, e);
                    if let Some(previous) = previous {
                        merged.insert(key, previous);
                    }
                }
            }
        }

        settings
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> AppSettings {
        self.settings_tx.borrow().clone()
    }

    /// Apply `patch` over the current settings and persist the full result.
    ///
    /// Storage is written before the new value becomes visible, so on error the
    /// in-memory settings are unchanged.
    pub fn update(&self, patch: &SettingsPatch) -> Result<AppSettings, SettingsError> {
        let _write = self.write_lock.lock().unwrap();
        let updated = patch.merge_into(&self.settings());
        let encoded = serde_json::to_string(&updated)?;
        self.storage.set(SETTINGS_KEY, &encoded)?;

        tracing::debug!("Settings updated: {:?}", patch);
        self.settings_tx.send_replace(updated.clone());
        Ok(updated)
    }

    /// Restore the defaults and erase the persisted record.
    pub fn reset(&self) -> Result<AppSettings, SettingsError> {
        let _write = self.write_lock.lock().unwrap();
        self.storage.remove(SETTINGS_KEY)?;

        tracing::info!("Settings reset to defaults");
        let defaults = AppSettings::default();
        self.settings_tx.send_replace(defaults.clone());
        Ok(defaults)
    }

    /// Receive every future settings value.
    pub fn subscribe(&self) -> watch::Receiver<AppSettings> {
        self.settings_tx.subscribe()
    }
}
