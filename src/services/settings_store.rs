//! Settings store for Snipsight.
//!
//! Reads and writes the persisted selector settings through the capability
//! gateway's key-value storage. The analysis pipeline takes one read-only
//! snapshot per run; nothing in the core mutates a snapshot.

use std::sync::Arc;

use log::warn;
use serde_json::{json, Map, Value};

use crate::gateway::CapabilityGateway;
use crate::types::errors::SettingsError;
use crate::types::settings::{
    SelectorSettings, DEFAULT_LANGUAGE, DEFAULT_MODEL, KEY_AI_ENABLED, KEY_API_KEY, KEY_LANGUAGE,
    KEY_MODEL, KEY_MODEL_LEGACY,
};

/// Storage-backed settings store.
pub struct SettingsStore {
    gateway: Arc<dyn CapabilityGateway>,
}

impl SettingsStore {
    pub fn new(gateway: Arc<dyn CapabilityGateway>) -> Self {
        Self { gateway }
    }

    /// Loads a settings snapshot.
    ///
    /// Storage failures degrade to defaults instead of erroring: a capture
    /// whose settings cannot be read still copies to the clipboard.
    pub async fn load(&self) -> SelectorSettings {
        let keys = [
            KEY_API_KEY,
            KEY_MODEL,
            KEY_MODEL_LEGACY,
            KEY_AI_ENABLED,
            KEY_LANGUAGE,
        ];
        let map = match self.gateway.storage_get(&keys).await {
            Ok(map) => map,
            Err(e) => {
                warn!("settings read failed, using defaults: {}", e);
                Map::new()
            }
        };

        let api_key = non_empty_string(&map, KEY_API_KEY);
        let selected_model = non_empty_string(&map, KEY_MODEL)
            .or_else(|| non_empty_string(&map, KEY_MODEL_LEGACY))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let ai_enabled = map
            .get(KEY_AI_ENABLED)
            .and_then(Value::as_bool)
            .unwrap_or(true);
        let language =
            non_empty_string(&map, KEY_LANGUAGE).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        SelectorSettings {
            api_key,
            selected_model,
            ai_enabled,
            language,
        }
    }

    /// Stores the API key.
    pub async fn save_api_key(&self, api_key: &str) -> Result<(), SettingsError> {
        self.set_value(KEY_API_KEY, json!(api_key)).await
    }

    /// Deletes the stored API key.
    pub async fn remove_api_key(&self) -> Result<(), SettingsError> {
        self.gateway
            .storage_remove(&[KEY_API_KEY])
            .await
            .map_err(|e| SettingsError::Storage(e.to_string()))
    }

    /// Stores the model choice under the current key and drops the legacy
    /// one so the fallback cannot shadow the new value.
    pub async fn save_model(&self, model: &str) -> Result<(), SettingsError> {
        self.set_value(KEY_MODEL, json!(model)).await?;
        self.gateway
            .storage_remove(&[KEY_MODEL_LEGACY])
            .await
            .map_err(|e| SettingsError::Storage(e.to_string()))
    }

    /// Stores the UI language.
    pub async fn save_language(&self, language: &str) -> Result<(), SettingsError> {
        self.set_value(KEY_LANGUAGE, json!(language)).await
    }

    /// Toggles the analysis pipeline.
    pub async fn save_ai_enabled(&self, enabled: bool) -> Result<(), SettingsError> {
        self.set_value(KEY_AI_ENABLED, json!(enabled)).await
    }

    async fn set_value(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        let mut items = Map::new();
        items.insert(key.to_string(), value);
        self.gateway
            .storage_set(items)
            .await
            .map_err(|e| SettingsError::Storage(e.to_string()))
    }
}

fn non_empty_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
