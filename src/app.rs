//! App core for Snipsight.
//!
//! Central struct holding the long-lived collaborators: the capability
//! gateway, settings store, localization engine, activation guard, and
//! inference client. Selection sessions and pipelines are created per
//! invocation from these parts.

use std::sync::Arc;

use crate::gateway::CapabilityGateway;
use crate::managers::activation_guard::ActivationGuard;
use crate::services::inference_api::InferenceApiTrait;
use crate::services::localization_engine::{LocalizationEngine, LocalizationEngineTrait};
use crate::services::settings_store::SettingsStore;

pub struct App {
    pub gateway: Arc<dyn CapabilityGateway>,
    pub settings_store: Arc<SettingsStore>,
    pub localization_engine: LocalizationEngine,
    pub activation_guard: ActivationGuard,
    pub inference_api: Arc<dyn InferenceApiTrait>,
}

impl App {
    /// Creates the app core around a gateway and an inference client.
    pub fn new(
        gateway: Arc<dyn CapabilityGateway>,
        inference_api: Arc<dyn InferenceApiTrait>,
    ) -> Self {
        let settings_store = Arc::new(SettingsStore::new(gateway.clone()));
        Self {
            gateway,
            settings_store,
            localization_engine: LocalizationEngine::new(),
            activation_guard: ActivationGuard::new(),
            inference_api,
        }
    }

    /// Startup sequence: read the persisted language and apply it.
    pub async fn startup(&mut self) {
        let settings = self.settings_store.load().await;
        self.localization_engine.set_language(&settings.language);
    }
}
