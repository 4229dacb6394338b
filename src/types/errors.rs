use std::fmt;

// === GatewayError ===

/// Errors surfaced by the capability gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// A storage read or write failed.
    Storage(String),
    /// A runtime message could not be delivered or answered.
    Messaging(String),
    /// The viewport capture operation failed.
    Capture(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Storage(msg) => write!(f, "Gateway storage error: {}", msg),
            GatewayError::Messaging(msg) => write!(f, "Gateway messaging error: {}", msg),
            GatewayError::Capture(msg) => write!(f, "Gateway capture error: {}", msg),
        }
    }
}

impl std::error::Error for GatewayError {}

// === CaptureError ===

/// Errors in the capture pipeline. All variants are fatal to the current
/// run and are followed by session teardown.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// The viewport capture returned no image data.
    EmptyCapture,
    /// The captured image data could not be decoded.
    DecodeFailed(String),
    /// Encoding the cropped region to PNG produced no data.
    EncodeFailed(String),
    /// Writing the image to the system clipboard failed.
    ClipboardWrite(String),
    /// The gateway failed before any image data was produced.
    Gateway(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::EmptyCapture => {
                write!(f, "Viewport capture returned empty data")
            }
            CaptureError::DecodeFailed(msg) => {
                write!(f, "Failed to decode captured image: {}", msg)
            }
            CaptureError::EncodeFailed(msg) => {
                write!(f, "Failed to encode cropped region: {}", msg)
            }
            CaptureError::ClipboardWrite(msg) => {
                write!(f, "Failed to write image to clipboard: {}", msg)
            }
            CaptureError::Gateway(msg) => write!(f, "Capture gateway error: {}", msg),
        }
    }
}

impl std::error::Error for CaptureError {}

// === AnalysisError ===

/// Errors in the analysis pipeline. These surface inside the popup body,
/// never as a page-level toast, and never crash the host.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The selected model's tier requires an API key and none is stored.
    MissingApiKey(String),
    /// The request never reached the endpoint or the response body could
    /// not be read.
    Network(String),
    /// The endpoint answered with a non-2xx status.
    Api(u16),
    /// A gateway operation failed mid-pipeline.
    Gateway(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::MissingApiKey(model) => {
                write!(f, "Model '{}' requires an API key", model)
            }
            AnalysisError::Network(msg) => write!(f, "AI network error: {}", msg),
            AnalysisError::Api(status) => write!(f, "API Error: {}", status),
            AnalysisError::Gateway(msg) => write!(f, "AI gateway error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

// === SettingsError ===

/// Errors related to the settings store.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// The underlying storage operation failed.
    Storage(String),
    /// A stored value could not be serialized or deserialized.
    Serialization(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Storage(msg) => write!(f, "Settings storage error: {}", msg),
            SettingsError::Serialization(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
