//! Unit tests for response parsing and validation: fence stripping, the
//! single-object/array normalization, field validation, and multi-select
//! answer normalization.

use rstest::rstest;
use serde_json::json;

use snipsight::services::response_parser::{
    normalize_multi_select, parse_response, strip_code_fences,
};
use snipsight::types::analysis::{AnalysisOutcome, AnswerPayload, AnswerType};

const WELL_FORMED: &str = r#"{"question":"Q","answer_type":"text","answer":"A"}"#;

#[test]
fn test_well_formed_single_object() {
    match parse_response(WELL_FORMED) {
        AnalysisOutcome::Results(items) => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].question, "Q");
            assert_eq!(items[0].answer_type, AnswerType::Text);
            assert_eq!(items[0].answer, AnswerPayload::Single("A".to_string()));
        }
        other => panic!("expected results, got {:?}", other),
    }
}

/// A fenced response parses identically to an unfenced one.
#[rstest]
#[case(format!("```json\n{}\n```", WELL_FORMED))]
#[case(format!("```\n{}\n```", WELL_FORMED))]
#[case(format!("  ```json\n{}```", WELL_FORMED))]
fn test_fenced_response_parses_like_unfenced(#[case] fenced: String) {
    assert_eq!(parse_response(&fenced), parse_response(WELL_FORMED));
}

#[test]
fn test_array_response_yields_multiple_items() {
    let body = r#"[
        {"question":"Q1","answer_type":"text","answer":"A1"},
        {"question":"Q2","answer_type":"select_one","answer":"B"}
    ]"#;
    match parse_response(body) {
        AnalysisOutcome::Results(items) => {
            assert_eq!(items.len(), 2);
            assert_eq!(items[1].answer_type, AnswerType::SelectOne);
        }
        other => panic!("expected results, got {:?}", other),
    }
}

#[test]
fn test_empty_array_yields_zero_results() {
    assert_eq!(parse_response("[]"), AnalysisOutcome::Results(Vec::new()));
}

/// Non-JSON bodies fall back to raw text, preserving the original body
/// (not the fence-stripped version).
#[test]
fn test_non_json_body_is_text_fallback() {
    let body = "The answer is probably 4.";
    match parse_response(body) {
        AnalysisOutcome::TextFallback(raw) => assert_eq!(raw, body),
        other => panic!("expected text fallback, got {:?}", other),
    }
}

/// Items missing any required field make the whole payload incomplete.
#[rstest]
#[case(json!({"answer_type":"text","answer":"A"}))]
#[case(json!({"question":"Q","answer":"A"}))]
#[case(json!({"question":"Q","answer_type":"text"}))]
#[case(json!({"question":"Q","answer_type":"text","answer":null}))]
#[case(json!({"question":"","answer_type":"text","answer":"A"}))]
#[case(json!({"question":"Q","answer_type":"","answer":"A"}))]
#[case(json!({"question":"Q","answer_type":"text","answer":""}))]
fn test_incomplete_items_fall_back(#[case] item: serde_json::Value) {
    match parse_response(&item.to_string()) {
        AnalysisOutcome::IncompleteJson(value) => assert_eq!(value, item),
        other => panic!("expected incomplete fallback, got {:?}", other),
    }
}

/// One bad item in an array taints the entire response.
#[test]
fn test_one_incomplete_item_taints_the_array() {
    let body = r#"[
        {"question":"Q1","answer_type":"text","answer":"A1"},
        {"question":"Q2","answer_type":"text"}
    ]"#;
    assert!(matches!(
        parse_response(body),
        AnalysisOutcome::IncompleteJson(_)
    ));
}

/// The two fallbacks stay distinguishable: prose → text, bad JSON →
/// incomplete.
#[test]
fn test_fallbacks_are_distinct() {
    let text = parse_response("plain prose");
    let incomplete = parse_response(r#"{"question":"Q"}"#);
    assert!(matches!(text, AnalysisOutcome::TextFallback(_)));
    assert!(matches!(incomplete, AnalysisOutcome::IncompleteJson(_)));
}

/// An unrecognized answer_type is still a complete item; it renders with
/// the unknown badge.
#[test]
fn test_unrecognized_answer_type_is_complete() {
    let body = r#"{"question":"Q","answer_type":"essay","answer":"A"}"#;
    match parse_response(body) {
        AnalysisOutcome::Results(items) => {
            assert_eq!(items[0].answer_type, AnswerType::Unknown)
        }
        other => panic!("expected results, got {:?}", other),
    }
}

// ─── Multi-select normalization ───

/// The delimited-string encoding splits on `;`, `,`, and newlines.
#[test]
fn test_multi_select_delimited_string() {
    assert_eq!(
        normalize_multi_select(&json!("a; b, c")),
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    );
}

#[test]
fn test_multi_select_real_array() {
    assert_eq!(
        normalize_multi_select(&json!(["x", "y"])),
        vec!["x".to_string(), "y".to_string()]
    );
}

/// A JSON array hiding inside a string is unwrapped.
#[test]
fn test_multi_select_json_string_array() {
    assert_eq!(
        normalize_multi_select(&json!("[\"x\", \"y\"]")),
        vec!["x".to_string(), "y".to_string()]
    );
}

/// A string that parses as non-array JSON is kept whole.
#[test]
fn test_multi_select_json_scalar_string_kept_whole() {
    assert_eq!(normalize_multi_select(&json!("42")), vec!["42".to_string()]);
}

#[test]
fn test_multi_select_newline_delimited() {
    assert_eq!(
        normalize_multi_select(&json!("first\nsecond\nthird")),
        vec!["first", "second", "third"]
    );
}

/// Non-array, non-string answers are stringified into a single entry.
#[test]
fn test_multi_select_other_value() {
    assert_eq!(normalize_multi_select(&json!(7)), vec!["7".to_string()]);
}

/// Multi-select items carry the normalized list in their payload.
#[test]
fn test_multi_select_item_payload() {
    let body = r#"{"question":"Q","answer_type":"multi_select","answer":"a; b, c"}"#;
    match parse_response(body) {
        AnalysisOutcome::Results(items) => {
            assert_eq!(
                items[0].answer,
                AnswerPayload::Many(vec!["a".into(), "b".into(), "c".into()])
            );
        }
        other => panic!("expected results, got {:?}", other),
    }
}

// ─── Fence stripping ───

#[test]
fn test_strip_fences_with_language_tag() {
    assert_eq!(
        strip_code_fences("```json\n{\"a\":1}\n```"),
        "{\"a\":1}\n"
    );
}

#[test]
fn test_strip_fences_leaves_unfenced_untouched() {
    assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
}
