use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Storage key holding the API key for the inference endpoint.
pub const KEY_API_KEY: &str = "pollinationsApiKey";
/// Storage key holding the selected model name.
pub const KEY_MODEL: &str = "selectedModel";
/// Legacy storage key for the model name, still honored on load.
pub const KEY_MODEL_LEGACY: &str = "pollinationsModelName";
/// Storage key toggling the analysis pipeline.
pub const KEY_AI_ENABLED: &str = "aiEnabled";
/// Storage key holding the UI language.
pub const KEY_LANGUAGE: &str = "language";

pub const DEFAULT_MODEL: &str = "openai";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Read-only settings snapshot taken once per pipeline run.
///
/// Zeroized on drop because `api_key` is credential material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SelectorSettings {
    pub api_key: Option<String>,
    pub selected_model: String,
    pub ai_enabled: bool,
    pub language: String,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            selected_model: DEFAULT_MODEL.to_string(),
            ai_enabled: true,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl SelectorSettings {
    /// Whether an API key is stored (non-empty).
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}
