use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How an answer should be laid out. Parsed from the model's `answer_type`
/// string; anything unrecognized renders with the "unknown" badge but is
/// still considered a complete item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerType {
    Text,
    SelectOne,
    MultiSelect,
    Unknown,
}

impl AnswerType {
    pub fn parse(label: &str) -> Self {
        match label {
            "text" => AnswerType::Text,
            "select_one" => AnswerType::SelectOne,
            "multi_select" => AnswerType::MultiSelect,
            _ => AnswerType::Unknown,
        }
    }

    /// Translation key for the badge naming this answer type.
    pub fn badge_key(&self) -> &'static str {
        match self {
            AnswerType::Text => "aiAnswerTypeText",
            AnswerType::SelectOne => "aiAnswerTypeSelectOne",
            AnswerType::MultiSelect => "aiAnswerTypeMultiSelect",
            AnswerType::Unknown => "aiAnswerTypeUnknown",
        }
    }
}

/// Answer content after normalization: multi-select answers become a list of
/// strings, everything else a single display string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnswerPayload {
    Single(String),
    Many(Vec<String>),
}

/// One validated question/answer pair extracted from the model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    pub question: String,
    pub answer_type: AnswerType,
    pub answer: AnswerPayload,
}

/// View model for everything the result popup can display. Rendering is a
/// pure function over this enum, so pipeline state and presentation stay
/// independently testable.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Structured rendering: one block per item.
    Results(Vec<ResultItem>),
    /// The response body was not JSON; show it verbatim.
    TextFallback(String),
    /// The response parsed but at least one item was missing a required
    /// field; show the parsed structure pretty-printed.
    IncompleteJson(Value),
    /// The request itself failed; shown in the popup's error region.
    Error(String),
}

/// One entry of the remote models listing, used for the tier pre-check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub vision: bool,
    #[serde(default)]
    pub tier: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub input_modalities: Vec<String>,
    #[serde(default)]
    pub output_modalities: Vec<String>,
}

/// Models on this tier can be called without an API key.
pub const ANONYMOUS_TIER: &str = "anonymous";

impl ModelInfo {
    pub fn requires_api_key(&self) -> bool {
        !self.tier.is_empty() && self.tier != ANONYMOUS_TIER
    }
}
