//! API endpoint configuration.
//!
//! The two registry base URLs are the only state the client persists. They are
//! loaded from the key-value store on demand, replaced wholesale by an explicit save,
//! and never deleted. Controllers share one [`ConfigStore`] and read it at the start
//! of every action, so a save takes effect on the next action without restarting.

use crate::constants::{CONFIG_INCOMPLETE, CONFIG_SAVED, CONFIG_STORAGE_KEY};
use crate::error::{IntakeError, IntakeResult};
use crate::storage::KeyValueStore;
use crate::view::StatusMessage;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Base URLs of the patient and triage registries.
///
/// Serialized with the field names used in storage: `patientsApi`, `triagesApi`.
/// Missing fields fall back to empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfig {
    pub patients_api: String,
    pub triages_api: String,
}

impl ApiConfig {
    /// Creates a configuration from raw input, trimming both URLs.
    pub fn new(patients_api: impl AsRef<str>, triages_api: impl AsRef<str>) -> Self {
        Self {
            patients_api: patients_api.as_ref().trim().to_owned(),
            triages_api: triages_api.as_ref().trim().to_owned(),
        }
    }

    /// True when both base URLs are set.
    pub fn is_complete(&self) -> bool {
        !self.patients_api.is_empty() && !self.triages_api.is_empty()
    }
}

/// Loads and saves [`ApiConfig`] and owns the config hint region.
pub struct ConfigStore {
    storage: Arc<dyn KeyValueStore>,
    hint: Mutex<Option<StatusMessage>>,
}

impl ConfigStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            hint: Mutex::new(None),
        }
    }

    /// Reads the stored configuration.
    ///
    /// Never fails: a missing key or a value that is not a JSON object of the
    /// expected shape yields the defaults (both URLs empty). Stored fields are
    /// merged over the defaults.
    pub fn load(&self) -> ApiConfig {
        let Some(stored) = self.storage.get_item(CONFIG_STORAGE_KEY) else {
            return ApiConfig::default();
        };

        match serde_json::from_str::<ApiConfig>(&stored) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("stored API config is corrupt, using defaults: {}", e);
                ApiConfig::default()
            }
        }
    }

    /// Persists `config` and signals success through the config hint.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Storage` or `IntakeError::Serialization` when the
    /// backing store cannot be written. The hint is left unchanged in that case.
    pub fn save(&self, config: &ApiConfig) -> IntakeResult<()> {
        let json = serde_json::to_string(config).map_err(IntakeError::Serialization)?;
        self.storage.set_item(CONFIG_STORAGE_KEY, &json)?;

        tracing::info!(
            patients_api = %config.patients_api,
            triages_api = %config.triages_api,
            "API config saved"
        );
        self.set_hint(StatusMessage::success(CONFIG_SAVED));
        Ok(())
    }

    /// Loads the configuration for an action about to run.
    ///
    /// When either URL is empty a warning is placed in the config hint, but the
    /// configuration is still returned; callers decide whether they can proceed.
    pub fn get_active(&self) -> ApiConfig {
        let config = self.load();
        if !config.is_complete() {
            tracing::warn!("API config incomplete");
            self.set_hint(StatusMessage::error(CONFIG_INCOMPLETE));
        }
        config
    }

    /// Current content of the config hint region.
    pub fn hint(&self) -> Option<StatusMessage> {
        self.hint.lock().ok().and_then(|hint| hint.clone())
    }

    fn set_hint(&self, message: StatusMessage) {
        if let Ok(mut hint) = self.hint.lock() {
            *hint = Some(message);
        }
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("hint", &self.hint())
            .finish_non_exhaustive()
    }
}
