//! Property-based tests for settings serialization and the storage
//! round-trip through the gateway-backed store.

use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use tokio::runtime::Runtime;

use snipsight::gateway::adapter::{GatewayAdapter, PromiseCapabilities};
use snipsight::gateway::{CapabilityGateway, RuntimeMessage, RuntimeResponse};
use snipsight::services::settings_store::SettingsStore;
use snipsight::types::errors::GatewayError;
use snipsight::types::settings::SelectorSettings;

fn runtime() -> &'static Runtime {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| Runtime::new().expect("test runtime"))
}

#[derive(Default)]
struct MemoryBackend {
    values: Mutex<Map<String, Value>>,
}

#[async_trait]
impl PromiseCapabilities for MemoryBackend {
    async fn storage_get(&self, keys: Vec<String>) -> Result<Map<String, Value>, GatewayError> {
        let values = self.values.lock().unwrap();
        Ok(keys
            .into_iter()
            .filter_map(|k| values.get(&k).map(|v| (k, v.clone())))
            .collect())
    }
    async fn storage_set(&self, items: Map<String, Value>) -> Result<(), GatewayError> {
        self.values.lock().unwrap().extend(items);
        Ok(())
    }
    async fn storage_remove(&self, keys: Vec<String>) -> Result<(), GatewayError> {
        let mut values = self.values.lock().unwrap();
        for key in keys {
            values.remove(&key);
        }
        Ok(())
    }
    async fn send_runtime_message(
        &self,
        _message: RuntimeMessage,
    ) -> Result<RuntimeResponse, GatewayError> {
        Ok(RuntimeResponse::default())
    }
    async fn capture_visible_viewport(&self) -> Result<String, GatewayError> {
        Err(GatewayError::Capture("not used here".to_string()))
    }
}

fn fresh_store() -> SettingsStore {
    SettingsStore::new(Arc::new(GatewayAdapter::from_promise(Arc::new(
        MemoryBackend::default(),
    ))))
}

fn arb_api_key() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-zA-Z0-9_-]{1,40}")
}

fn arb_model() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.-]{0,19}"
}

fn arb_language() -> impl Strategy<Value = String> {
    "[a-z]{2}"
}

fn arb_settings() -> impl Strategy<Value = SelectorSettings> {
    (arb_api_key(), arb_model(), any::<bool>(), arb_language()).prop_map(
        |(api_key, selected_model, ai_enabled, language)| SelectorSettings {
            api_key,
            selected_model,
            ai_enabled,
            language,
        },
    )
}

proptest! {
    /// JSON serialization round-trips without loss.
    #[test]
    fn prop_serde_round_trip(settings in arb_settings()) {
        let encoded = serde_json::to_string(&settings).unwrap();
        let decoded: SelectorSettings = serde_json::from_str(&encoded).unwrap();
        prop_assert_eq!(decoded, settings);
    }

    /// Writing a snapshot through the store's save operations and loading
    /// it back recovers every field.
    #[test]
    fn prop_storage_round_trip(settings in arb_settings()) {
        let store = fresh_store();
        let loaded = runtime().block_on(async {
            if let Some(key) = &settings.api_key {
                store.save_api_key(key).await.unwrap();
            }
            store.save_model(&settings.selected_model).await.unwrap();
            store.save_language(&settings.language).await.unwrap();
            store.save_ai_enabled(settings.ai_enabled).await.unwrap();
            store.load().await
        });

        prop_assert_eq!(&loaded.api_key, &settings.api_key);
        prop_assert_eq!(&loaded.selected_model, &settings.selected_model);
        prop_assert_eq!(loaded.ai_enabled, settings.ai_enabled);
        prop_assert_eq!(&loaded.language, &settings.language);
    }

    /// Saving a model through the store wins over a pre-existing legacy
    /// key on every later load.
    #[test]
    fn prop_legacy_model_never_shadows_current(
        current in arb_model(),
        legacy in arb_model(),
    ) {
        let gateway = Arc::new(GatewayAdapter::from_promise(Arc::new(
            MemoryBackend::default(),
        )));
        let store = SettingsStore::new(gateway.clone());
        let loaded = runtime().block_on(async {
            let mut items = Map::new();
            items.insert("pollinationsModelName".to_string(), json!(legacy));
            gateway.storage_set(items).await.unwrap();
            store.save_model(&current).await.unwrap();
            store.load().await
        });
        prop_assert_eq!(&loaded.selected_model, &current);
    }
}
