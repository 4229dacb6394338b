//! Unit tests for the analysis pipeline: the ai-enabled gate, popup
//! lifecycle, tier pre-check, single non-retried request, and the
//! fallback/error rendering paths.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use snipsight::gateway::adapter::{GatewayAdapter, PromiseCapabilities};
use snipsight::gateway::{RuntimeMessage, RuntimeResponse};
use snipsight::services::analysis_pipeline::AnalysisPipeline;
use snipsight::services::inference_api::{
    ChatRequest, ChatResponse, Choice, ContentPart, InferenceApiTrait, MessageContent,
    ResponseMessage,
};
use snipsight::services::localization_engine::Translator;
use snipsight::services::settings_store::SettingsStore;
use snipsight::types::analysis::{AnalysisOutcome, AnswerPayload, ModelInfo};
use snipsight::types::errors::{AnalysisError, GatewayError};
use snipsight::types::geometry::Point;
use snipsight::types::popup::PopupView;
use snipsight::ui::popup::PopupHostTrait;
use snipsight::ui::toast::{ToastKind, ToastSinkTrait};

// ─── Mocks ───

/// In-memory storage backend seeding the settings snapshot.
struct SeededBackend {
    values: Map<String, Value>,
}

#[async_trait]
impl PromiseCapabilities for SeededBackend {
    async fn storage_get(&self, keys: Vec<String>) -> Result<Map<String, Value>, GatewayError> {
        Ok(keys
            .into_iter()
            .filter_map(|k| self.values.get(&k).map(|v| (k, v.clone())))
            .collect())
    }
    async fn storage_set(&self, _items: Map<String, Value>) -> Result<(), GatewayError> {
        Ok(())
    }
    async fn storage_remove(&self, _keys: Vec<String>) -> Result<(), GatewayError> {
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

/// Recorded shape of one chat call.
#[derive(Debug, Clone)]
struct RecordedChatCall {
    model: String,
    api_key: Option<String>,
    image_url: Option<String>,
}

#[derive(Default)]
struct MockApi {
    chat_calls: Mutex<Vec<RecordedChatCall>>,
    chat_content: Mutex<Option<Result<String, AnalysisError>>>,
    models_calls: Mutex<u32>,
    models_response: Mutex<Option<Result<Vec<ModelInfo>, AnalysisError>>>,
    /// When set, the popup host whose newest token is cancelled mid-call,
    /// simulating the user closing the popup while the request is in flight.
    cancel_during_chat: Mutex<Option<Arc<MockPopupHost>>>,
}

impl MockApi {
    fn answering(content: &str) -> Arc<Self> {
        let api = Self::default();
        *api.chat_content.lock().unwrap() = Some(Ok(content.to_string()));
        Arc::new(api)
    }

    fn failing(error: AnalysisError) -> Arc<Self> {
        let api = Self::default();
        *api.chat_content.lock().unwrap() = Some(Err(error));
        Arc::new(api)
    }

    fn with_models(self: Arc<Self>, models: Result<Vec<ModelInfo>, AnalysisError>) -> Arc<Self> {
        *self.models_response.lock().unwrap() = Some(models);
        self
    }
}

#[async_trait]
impl InferenceApiTrait for MockApi {
    async fn chat_completion(
        &self,
        request: &ChatRequest,
        api_key: Option<&str>,
    ) -> Result<ChatResponse, AnalysisError> {
        let image_url = request.messages.iter().find_map(|m| match &m.content {
            MessageContent::Parts(parts) => parts.iter().find_map(|p| match p {
                ContentPart::ImageUrl { image_url } => Some(image_url.url.clone()),
                ContentPart::Text { .. } => None,
            }),
            MessageContent::Text(_) => None,
        });
        self.chat_calls.lock().unwrap().push(RecordedChatCall {
            model: request.model.clone(),
            api_key: api_key.map(str::to_string),
            image_url,
        });

        if let Some(host) = self.cancel_during_chat.lock().unwrap().as_ref() {
            host.cancel_latest();
        }

        let content = self
            .chat_content
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok("{}".to_string()))?;
        Ok(ChatResponse {
            choices: vec![Choice {
                message: ResponseMessage {
                    content: Some(content),
                },
            }],
        })
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, AnalysisError> {
        *self.models_calls.lock().unwrap() += 1;
        self.models_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[derive(Default)]
struct MockPopupHost {
    mounted: Mutex<Vec<PopupView>>,
    tokens: Mutex<Vec<CancellationToken>>,
    rendered: Mutex<Vec<(Uuid, AnalysisOutcome)>>,
    removed: Mutex<Vec<Uuid>>,
}

impl MockPopupHost {
    fn cancel_latest(&self) {
        if let Some(token) = self.tokens.lock().unwrap().last() {
            token.cancel();
        }
    }
}

impl PopupHostTrait for MockPopupHost {
    fn mount(&self, view: &PopupView, close_token: CancellationToken) {
        self.mounted.lock().unwrap().push(view.clone());
        self.tokens.lock().unwrap().push(close_token);
    }

    fn render(&self, id: Uuid, outcome: &AnalysisOutcome, _translator: &Translator) {
        self.rendered.lock().unwrap().push((id, outcome.clone()));
    }

    fn remove(&self, id: Uuid) {
        self.removed.lock().unwrap().push(id);
    }
}

#[derive(Default)]
struct MockToasts {
    shown: Mutex<Vec<(String, ToastKind)>>,
}

impl ToastSinkTrait for MockToasts {
    fn show(&self, text: &str, kind: ToastKind) {
        self.shown.lock().unwrap().push((text.to_string(), kind));
    }
}

struct Harness {
    pipeline: AnalysisPipeline,
    api: Arc<MockApi>,
    popups: Arc<MockPopupHost>,
    toasts: Arc<MockToasts>,
}

/// An empty translator: `translate` falls back to the key, so assertions
/// can match on translation keys directly.
fn translator() -> Translator {
    Translator::new(HashMap::new())
}

fn harness(seed: &[(&str, Value)], api: Arc<MockApi>) -> Harness {
    let mut values = Map::new();
    for (key, value) in seed {
        values.insert(key.to_string(), value.clone());
    }
    let gateway = Arc::new(GatewayAdapter::from_promise(Arc::new(SeededBackend {
        values,
    })));
    let settings = Arc::new(SettingsStore::new(gateway));
    let popups = Arc::new(MockPopupHost::default());
    let toasts = Arc::new(MockToasts::default());
    let pipeline = AnalysisPipeline::new(
        settings,
        api.clone() as Arc<dyn InferenceApiTrait>,
        popups.clone() as Arc<dyn PopupHostTrait>,
        toasts.clone() as Arc<dyn ToastSinkTrait>,
    );
    Harness {
        pipeline,
        api,
        popups,
        toasts,
    }
}

const PNG_STUB: &[u8] = &[0x89, b'P', b'N', b'G', 1, 2, 3, 4];

// ─── Tests ───

/// With analysis disabled there is no popup and no network traffic, only
/// the success toast.
#[tokio::test]
async fn test_ai_disabled_short_circuits() {
    let h = harness(
        &[("aiEnabled", json!(false))],
        MockApi::answering(r#"{"question":"Q","answer_type":"text","answer":"A"}"#),
    );

    h.pipeline
        .run(PNG_STUB.to_vec(), Point::new(5.0, 6.0), &translator())
        .await;

    assert!(h.api.chat_calls.lock().unwrap().is_empty());
    assert_eq!(*h.api.models_calls.lock().unwrap(), 0);
    assert!(h.popups.mounted.lock().unwrap().is_empty());
    assert_eq!(
        *h.toasts.shown.lock().unwrap(),
        vec![("imageCopiedToClipboard".to_string(), ToastKind::Success)]
    );
}

/// The happy path: popup mounts at the capture anchor in loading state,
/// one request goes out with the embedded image, one structured block
/// renders.
#[tokio::test]
async fn test_single_structured_result() {
    let h = harness(
        &[],
        MockApi::answering(r#"{"question":"Q","answer_type":"text","answer":"A"}"#),
    );

    h.pipeline
        .run(PNG_STUB.to_vec(), Point::new(40.0, 25.0), &translator())
        .await;

    let mounted = h.popups.mounted.lock().unwrap();
    assert_eq!(mounted.len(), 1);
    assert_eq!(mounted[0].position, Point::new(40.0, 25.0));
    assert_eq!(mounted[0].loading_text, "analyzingImage");

    let calls = h.api.chat_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, "openai");
    assert_eq!(calls[0].api_key, None);
    assert!(calls[0]
        .image_url
        .as_deref()
        .unwrap()
        .starts_with("data:image/png;base64,"));

    let rendered = h.popups.rendered.lock().unwrap();
    assert_eq!(rendered.len(), 1);
    match &rendered[0].1 {
        AnalysisOutcome::Results(items) => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].question, "Q");
            assert_eq!(items[0].answer, AnswerPayload::Single("A".to_string()));
        }
        other => panic!("expected results, got {:?}", other),
    }
}

/// Code-fenced responses render identically to unfenced ones.
#[tokio::test]
async fn test_fenced_response_renders_structured() {
    let h = harness(
        &[],
        MockApi::answering(
            "```json\n{\"question\":\"Q\",\"answer_type\":\"text\",\"answer\":\"A\"}\n```",
        ),
    );

    h.pipeline
        .run(PNG_STUB.to_vec(), Point::default(), &translator())
        .await;

    let rendered = h.popups.rendered.lock().unwrap();
    assert!(matches!(&rendered[0].1, AnalysisOutcome::Results(items) if items.len() == 1));
}

/// Without a stored key, a model on a key-required tier aborts: error
/// toast, popup removed, no chat request.
#[tokio::test]
async fn test_key_required_tier_aborts() {
    let api = MockApi::answering("{}").with_models(Ok(vec![ModelInfo {
        name: "openai".to_string(),
        vision: true,
        tier: "seed".to_string(),
        description: String::new(),
        input_modalities: vec![],
        output_modalities: vec![],
    }]));
    let h = harness(&[], api);

    h.pipeline
        .run(PNG_STUB.to_vec(), Point::default(), &translator())
        .await;

    assert!(h.api.chat_calls.lock().unwrap().is_empty());
    assert_eq!(
        *h.toasts.shown.lock().unwrap(),
        vec![("apiKeyRequired".to_string(), ToastKind::Error)]
    );
    let mounted = h.popups.mounted.lock().unwrap();
    assert_eq!(h.popups.removed.lock().unwrap().as_slice(), &[mounted[0].id]);
    assert!(h.popups.rendered.lock().unwrap().is_empty());
}

/// A failing models listing is swallowed; the flow proceeds to the chat
/// request anyway.
#[tokio::test]
async fn test_precheck_failure_is_swallowed() {
    let api = MockApi::answering(r#"{"question":"Q","answer_type":"text","answer":"A"}"#)
        .with_models(Err(AnalysisError::Network("timeout".to_string())));
    let h = harness(&[], api);

    h.pipeline
        .run(PNG_STUB.to_vec(), Point::default(), &translator())
        .await;

    assert_eq!(*h.api.models_calls.lock().unwrap(), 1);
    assert_eq!(h.api.chat_calls.lock().unwrap().len(), 1);
    assert!(matches!(
        &h.popups.rendered.lock().unwrap()[0].1,
        AnalysisOutcome::Results(_)
    ));
}

/// With a stored key the tier pre-check is skipped and the request is
/// authorized.
#[tokio::test]
async fn test_stored_key_skips_precheck() {
    let h = harness(
        &[("pollinationsApiKey", json!("sk-stored"))],
        MockApi::answering(r#"{"question":"Q","answer_type":"text","answer":"A"}"#),
    );

    h.pipeline
        .run(PNG_STUB.to_vec(), Point::default(), &translator())
        .await;

    assert_eq!(*h.api.models_calls.lock().unwrap(), 0);
    let calls = h.api.chat_calls.lock().unwrap();
    assert_eq!(calls[0].api_key.as_deref(), Some("sk-stored"));
}

/// A non-2xx answer renders into the popup's error region with the status
/// code embedded; no page-level toast.
#[tokio::test]
async fn test_api_error_renders_in_popup() {
    let h = harness(&[], MockApi::failing(AnalysisError::Api(500)));

    h.pipeline
        .run(PNG_STUB.to_vec(), Point::default(), &translator())
        .await;

    let rendered = h.popups.rendered.lock().unwrap();
    match &rendered[0].1 {
        AnalysisOutcome::Error(message) => assert_eq!(message, "API Error: 500"),
        other => panic!("expected error outcome, got {:?}", other),
    }
    assert!(h.toasts.shown.lock().unwrap().is_empty());
}

/// Prose bodies render the raw-text fallback, not an error.
#[tokio::test]
async fn test_prose_body_renders_text_fallback() {
    let h = harness(&[], MockApi::answering("I think the answer is 4."));

    h.pipeline
        .run(PNG_STUB.to_vec(), Point::default(), &translator())
        .await;

    let rendered = h.popups.rendered.lock().unwrap();
    assert!(matches!(
        &rendered[0].1,
        AnalysisOutcome::TextFallback(raw) if raw == "I think the answer is 4."
    ));
}

/// A response missing a required field renders the incomplete fallback.
#[tokio::test]
async fn test_missing_answer_renders_incomplete() {
    let h = harness(
        &[],
        MockApi::answering(r#"{"question":"Q","answer_type":"text"}"#),
    );

    h.pipeline
        .run(PNG_STUB.to_vec(), Point::default(), &translator())
        .await;

    let rendered = h.popups.rendered.lock().unwrap();
    assert!(matches!(&rendered[0].1, AnalysisOutcome::IncompleteJson(_)));
}

/// Closing the popup while the request is in flight discards the late
/// response silently instead of rendering into a removed sink.
#[tokio::test]
async fn test_late_response_after_close_is_discarded() {
    let api = MockApi::answering(r#"{"question":"Q","answer_type":"text","answer":"A"}"#);
    let h = harness(&[], api);
    *h.api.cancel_during_chat.lock().unwrap() = Some(h.popups.clone());

    h.pipeline
        .run(PNG_STUB.to_vec(), Point::default(), &translator())
        .await;

    assert_eq!(h.api.chat_calls.lock().unwrap().len(), 1);
    assert!(h.popups.rendered.lock().unwrap().is_empty());
}
