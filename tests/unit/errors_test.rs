//! Unit tests for the error type Display implementations.
//!
//! Error messages end up in logs, toasts, and the popup error region, so
//! their wording is part of the observable surface.

use snipsight::types::errors::{AnalysisError, CaptureError, GatewayError, SettingsError};

#[test]
fn test_capture_error_display() {
    assert_eq!(
        CaptureError::EmptyCapture.to_string(),
        "Viewport capture returned empty data"
    );
    assert_eq!(
        CaptureError::DecodeFailed("bad magic".to_string()).to_string(),
        "Failed to decode captured image: bad magic"
    );
    assert_eq!(
        CaptureError::EncodeFailed("no data".to_string()).to_string(),
        "Failed to encode cropped region: no data"
    );
    assert_eq!(
        CaptureError::ClipboardWrite("denied".to_string()).to_string(),
        "Failed to write image to clipboard: denied"
    );
}

#[test]
fn test_analysis_error_display_includes_status_code() {
    assert_eq!(AnalysisError::Api(503).to_string(), "API Error: 503");
}

#[test]
fn test_analysis_error_display_names_model() {
    let err = AnalysisError::MissingApiKey("openai-large".to_string());
    assert_eq!(err.to_string(), "Model 'openai-large' requires an API key");
}

#[test]
fn test_gateway_and_settings_error_display() {
    assert_eq!(
        GatewayError::Storage("disk full".to_string()).to_string(),
        "Gateway storage error: disk full"
    );
    assert_eq!(
        SettingsError::Serialization("bad json".to_string()).to_string(),
        "Settings serialization error: bad json"
    );
}

#[test]
fn test_errors_implement_std_error() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&CaptureError::EmptyCapture);
    assert_error(&AnalysisError::Api(500));
    assert_error(&GatewayError::Messaging("x".to_string()));
    assert_error(&SettingsError::Storage("x".to_string()));
}
