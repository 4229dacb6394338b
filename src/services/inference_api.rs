//! Client for the remote inference endpoint.
//!
//! Request/response shapes follow the OpenAI-compatible chat-completions
//! dialect the endpoint speaks: a system message, a user message whose
//! content mixes text and an embedded image, and a choices array back.

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::types::analysis::ModelInfo;
use crate::types::errors::AnalysisError;

/// Base URL of the hosted endpoint.
pub const DEFAULT_BASE_URL: &str = "https://text.pollinations.ai";
const CHAT_COMPLETIONS_PATH: &str = "/openai/v1/chat/completions";
const MODELS_PATH: &str = "/models";

/// Chat-completions request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// One chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    /// User message carrying a prompt plus an embedded image data URI.
    pub fn user_with_image(text: impl Into<String>, image_data_url: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_data_url.into(),
                    },
                },
            ]),
        }
    }
}

/// Message content (plain string or multimodal parts).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// Content part for multimodal messages.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// Image reference for vision input.
#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Chat-completions response body. Only the fields the pipeline reads.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, or the empty-object literal the parser
    /// treats as an incomplete result.
    pub fn first_content(&self) -> String {
        self.choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_else(|| "{}".to_string())
    }
}

/// Trait defining the inference operations the analysis pipeline needs.
#[async_trait]
pub trait InferenceApiTrait: Send + Sync {
    /// Issues one chat-completions request. Never retried.
    async fn chat_completion(
        &self,
        request: &ChatRequest,
        api_key: Option<&str>,
    ) -> Result<ChatResponse, AnalysisError>;

    /// Lists the models the endpoint offers, for the tier pre-check.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, AnalysisError>;
}

/// HTTP client for the hosted endpoint.
pub struct PollinationsClient {
    http: reqwest::Client,
    base_url: String,
}

impl PollinationsClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Points the client at a different base URL (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for PollinationsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceApiTrait for PollinationsClient {
    async fn chat_completion(
        &self,
        request: &ChatRequest,
        api_key: Option<&str>,
    ) -> Result<ChatResponse, AnalysisError> {
        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH);
        debug!("chat completion via model '{}'", request.model);

        let mut builder = self.http.post(&url).json(request);
        if let Some(key) = api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Api(status.as_u16()));
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, AnalysisError> {
        let url = format!("{}{}", self.base_url, MODELS_PATH);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Api(status.as_u16()));
        }

        response
            .json::<Vec<ModelInfo>>()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))
    }
}
