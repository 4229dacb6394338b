//! Parsing and validation of model responses.
//!
//! Models are asked for JSON but occasionally wrap it in Markdown code
//! fences, return prose, or omit fields. Parsing therefore degrades instead
//! of failing: non-JSON becomes a raw-text fallback, structurally incomplete
//! JSON becomes a pretty-printed fallback, and only fully valid items reach
//! structured rendering.

use serde_json::Value;

use crate::types::analysis::{AnalysisOutcome, AnswerPayload, AnswerType, ResultItem};

/// Removes Markdown code-fence wrapping from a response body. A body that
/// does not start with a fence is returned trimmed but otherwise untouched.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    trimmed
        .replace("```json\n", "")
        .replace("```json", "")
        .replace("```\n", "")
        .replace("```", "")
}

/// Turns a raw response body into the popup view model.
pub fn parse_response(raw: &str) -> AnalysisOutcome {
    let cleaned = strip_code_fences(raw);
    let parsed: Value = match serde_json::from_str(&cleaned) {
        Ok(value) => value,
        Err(_) => return AnalysisOutcome::TextFallback(raw.to_string()),
    };

    // A single object and an array of objects are both accepted.
    let candidates: Vec<&Value> = match &parsed {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    let mut items = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match item_from_value(candidate) {
            Some(item) => items.push(item),
            // One bad item taints the whole payload: showing half a result
            // set next to silently dropped entries would be misleading.
            None => return AnalysisOutcome::IncompleteJson(parsed.clone()),
        }
    }
    AnalysisOutcome::Results(items)
}

/// Validates one candidate item. `None` means the item is incomplete.
fn item_from_value(value: &Value) -> Option<ResultItem> {
    let question = value
        .get("question")
        .and_then(Value::as_str)
        .filter(|q| !q.is_empty())?;
    let type_label = value
        .get("answer_type")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())?;
    let answer = value.get("answer")?;
    if answer.is_null() {
        return None;
    }
    if answer.as_str().is_some_and(str::is_empty) {
        return None;
    }

    let answer_type = AnswerType::parse(type_label);
    let payload = if answer_type == AnswerType::MultiSelect {
        AnswerPayload::Many(normalize_multi_select(answer))
    } else {
        AnswerPayload::Single(value_to_display(answer))
    };

    Some(ResultItem {
        question: question.to_string(),
        answer_type,
        answer: payload,
    })
}

/// Normalizes the answer encodings seen in multi-select responses into a
/// list of strings: a real array, a JSON-encoded array inside a string, or
/// a `;`/`,`/newline-delimited string.
pub fn normalize_multi_select(answer: &Value) -> Vec<String> {
    match answer {
        Value::Array(values) => values.iter().map(value_to_display).collect(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(values)) => values.iter().map(value_to_display).collect(),
            // Parses as JSON but is not an array: keep the string whole.
            Ok(_) => vec![s.clone()],
            Err(_) => s
                .split([';', ',', '\n'])
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
        },
        other => vec![value_to_display(other)],
    }
}

/// Display form of an answer value: strings verbatim, everything else as
/// compact JSON.
pub fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
