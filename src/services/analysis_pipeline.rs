//! Analysis pipeline: settings gate → popup mount → inference call →
//! parse/validate → render.
//!
//! Invoked only after a successful clipboard write. Every failure mode ends
//! up either as a toast (before the popup exists or when it is removed) or
//! rendered inside the popup body; nothing propagates out of `run`.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::{debug, warn};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::services::inference_api::{ChatMessage, ChatRequest, InferenceApiTrait};
use crate::services::localization_engine::Translator;
use crate::services::response_parser::parse_response;
use crate::services::settings_store::SettingsStore;
use crate::types::analysis::AnalysisOutcome;
use crate::types::errors::AnalysisError;
use crate::types::geometry::Point;
use crate::types::popup::PopupView;
use crate::types::settings::SelectorSettings;
use crate::ui::popup::PopupHostTrait;
use crate::ui::toast::{ToastKind, ToastSinkTrait};

/// The analysis pipeline. One instance serves any number of runs; runs are
/// independent and share no state beyond the injected collaborators.
pub struct AnalysisPipeline {
    settings: Arc<SettingsStore>,
    api: Arc<dyn InferenceApiTrait>,
    popups: Arc<dyn PopupHostTrait>,
    toasts: Arc<dyn ToastSinkTrait>,
}

impl AnalysisPipeline {
    pub fn new(
        settings: Arc<SettingsStore>,
        api: Arc<dyn InferenceApiTrait>,
        popups: Arc<dyn PopupHostTrait>,
        toasts: Arc<dyn ToastSinkTrait>,
    ) -> Self {
        Self {
            settings,
            api,
            popups,
            toasts,
        }
    }

    /// Runs one analysis for a cropped PNG, anchoring the popup at the
    /// capture rectangle's top-left corner.
    pub async fn run(&self, png: Vec<u8>, anchor: Point, translator: &Translator) {
        let settings = self.settings.load().await;

        if !settings.ai_enabled {
            self.toasts.show(
                &translator.translate("imageCopiedToClipboard"),
                ToastKind::Success,
            );
            return;
        }

        let view = PopupView {
            id: Uuid::new_v4(),
            position: anchor,
            title: translator.translate("aiAnalysis"),
            loading_text: translator.translate("analyzingImage"),
            close_label: translator.translate("close"),
        };
        // Cancelled when the popup is closed; a late result is then
        // discarded instead of being written into a removed sink.
        let close_token = CancellationToken::new();
        self.popups.mount(&view, close_token.clone());

        match self.analyze(&png, &settings, translator).await {
            Ok(outcome) => {
                if close_token.is_cancelled() {
                    debug!("popup closed before analysis finished; discarding result");
                    return;
                }
                self.popups.render(view.id, &outcome, translator);
            }
            Err(AnalysisError::MissingApiKey(model)) => {
                warn!("model '{}' requires an API key and none is stored", model);
                self.toasts
                    .show(&translator.translate("apiKeyRequired"), ToastKind::Error);
                self.popups.remove(view.id);
            }
            Err(err) => {
                warn!("analysis failed: {}", err);
                if close_token.is_cancelled() {
                    return;
                }
                self.popups
                    .render(view.id, &AnalysisOutcome::Error(err.to_string()), translator);
            }
        }
    }

    /// Encode → optional tier pre-check → single inference call → parse.
    async fn analyze(
        &self,
        png: &[u8],
        settings: &SelectorSettings,
        translator: &Translator,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let data_url = format!("data:image/png;base64,{}", BASE64.encode(png));

        if !settings.has_api_key() {
            // Best-effort: a failing models listing must not block the flow.
            match self.api.list_models().await {
                Ok(models) => {
                    let requires_key = models
                        .iter()
                        .find(|m| m.name == settings.selected_model)
                        .map(|m| m.requires_api_key())
                        .unwrap_or(false);
                    if requires_key {
                        return Err(AnalysisError::MissingApiKey(
                            settings.selected_model.clone(),
                        ));
                    }
                }
                Err(err) => warn!("model tier pre-check failed, continuing: {}", err),
            }
        }

        let request = ChatRequest {
            model: settings.selected_model.clone(),
            messages: vec![
                ChatMessage::system(translator.translate("aiSystemPrompt")),
                ChatMessage::user_with_image(translator.translate("aiUserPrompt"), data_url),
            ],
        };

        let response = self
            .api
            .chat_completion(&request, settings.api_key.as_deref())
            .await?;

        let raw_content = response.first_content();
        debug!("raw model response: {}", raw_content);
        Ok(parse_response(&raw_content))
    }
}
