//! Capability gateway: the boundary behind which storage, runtime
//! messaging, and viewport capture live.
//!
//! The core only ever talks to [`CapabilityGateway`], whose operations are
//! all promise-style (async). Backends come in two incompatible dialects,
//! callback-style and future-style, unified by [`adapter::GatewayAdapter`]
//! so dialect differences never leak past this module.

pub mod adapter;

#[cfg(feature = "desktop")]
pub mod desktop;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::errors::GatewayError;

/// A message routed to the background side of the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RuntimeMessage {
    CaptureScreenshot,
}

/// Answer to a [`RuntimeMessage`]. A capture response carries the screenshot
/// as a PNG data URL; an empty response means the capture produced nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuntimeResponse {
    #[serde(rename = "dataUrl", skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
}

/// Async capability surface consumed by the core.
#[async_trait]
pub trait CapabilityGateway: Send + Sync {
    /// Reads the given keys from key-value storage. Missing keys are simply
    /// absent from the returned map.
    async fn storage_get(&self, keys: &[&str]) -> Result<Map<String, Value>, GatewayError>;

    /// Writes the given entries to key-value storage.
    async fn storage_set(&self, items: Map<String, Value>) -> Result<(), GatewayError>;

    /// Removes the given keys from key-value storage.
    async fn storage_remove(&self, keys: &[&str]) -> Result<(), GatewayError>;

    /// Sends a runtime message and waits for its response.
    async fn send_runtime_message(
        &self,
        message: RuntimeMessage,
    ) -> Result<RuntimeResponse, GatewayError>;

    /// Captures the full visible viewport as a PNG data URL.
    async fn capture_visible_viewport(&self) -> Result<String, GatewayError>;
}
