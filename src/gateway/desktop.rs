//! Desktop capability backend.
//!
//! Key-value storage is a JSON file in the platform config directory;
//! viewport capture grabs the primary screen with the `screenshots` crate
//! and returns it as a PNG data URL. `captureScreenshot` runtime messages
//! are answered with the same capture, mirroring how the background side of
//! the gateway services the selector.

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::debug;
use screenshots::image::ImageOutputFormat;
use screenshots::Screen;
use serde_json::{Map, Value};

use crate::gateway::adapter::PromiseCapabilities;
use crate::gateway::{RuntimeMessage, RuntimeResponse};
use crate::platform;
use crate::types::errors::GatewayError;

const STORAGE_FILE: &str = "storage.json";

/// Promise-dialect backend for the desktop build.
pub struct DesktopGateway {
    storage_path: PathBuf,
}

impl DesktopGateway {
    pub fn new() -> Self {
        Self {
            storage_path: platform::get_config_dir().join(STORAGE_FILE),
        }
    }

    /// Uses an explicit storage file instead of the platform config path.
    pub fn with_storage_path(path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: path.into(),
        }
    }

    /// Loads the storage map. A missing file is an empty store.
    fn read_store(&self) -> Result<Map<String, Value>, GatewayError> {
        if !self.storage_path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.storage_path)
            .map_err(|e| GatewayError::Storage(format!("failed to read store: {}", e)))?;
        serde_json::from_str(&content)
            .map_err(|e| GatewayError::Storage(format!("failed to parse store: {}", e)))
    }

    fn write_store(&self, store: &Map<String, Value>) -> Result<(), GatewayError> {
        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                GatewayError::Storage(format!("failed to create config directory: {}", e))
            })?;
        }
        let json = serde_json::to_string_pretty(store)
            .map_err(|e| GatewayError::Storage(format!("failed to serialize store: {}", e)))?;
        fs::write(&self.storage_path, json)
            .map_err(|e| GatewayError::Storage(format!("failed to write store: {}", e)))
    }

    /// Captures the primary screen and encodes it as a PNG data URL.
    fn capture_primary_screen() -> Result<String, GatewayError> {
        let screens = Screen::all()
            .map_err(|e| GatewayError::Capture(format!("failed to enumerate screens: {}", e)))?;
        let screen = screens
            .first()
            .ok_or_else(|| GatewayError::Capture("no screens found".to_string()))?;
        let image = screen
            .capture()
            .map_err(|e| GatewayError::Capture(format!("failed to capture screen: {}", e)))?;

        let mut png_bytes = Cursor::new(Vec::new());
        image
            .write_to(&mut png_bytes, ImageOutputFormat::Png)
            .map_err(|e| GatewayError::Capture(format!("failed to encode PNG: {}", e)))?;

        debug!(
            "captured {}x{} viewport ({} bytes)",
            image.width(),
            image.height(),
            png_bytes.get_ref().len()
        );
        Ok(format!(
            "data:image/png;base64,{}",
            BASE64.encode(png_bytes.into_inner())
        ))
    }
}

impl Default for DesktopGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PromiseCapabilities for DesktopGateway {
    async fn storage_get(&self, keys: Vec<String>) -> Result<Map<String, Value>, GatewayError> {
        let store = self.read_store()?;
        let mut result = Map::new();
        for key in keys {
            if let Some(value) = store.get(&key) {
                result.insert(key, value.clone());
            }
        }
        Ok(result)
    }

    async fn storage_set(&self, items: Map<String, Value>) -> Result<(), GatewayError> {
        let mut store = self.read_store()?;
        for (key, value) in items {
            store.insert(key, value);
        }
        self.write_store(&store)
    }

    async fn storage_remove(&self, keys: Vec<String>) -> Result<(), GatewayError> {
        let mut store = self.read_store()?;
        for key in &keys {
            store.remove(key);
        }
        self.write_store(&store)
    }

    async fn send_runtime_message(
        &self,
        message: RuntimeMessage,
    ) -> Result<RuntimeResponse, GatewayError> {
        match message {
            RuntimeMessage::CaptureScreenshot => {
                let data_url = self.capture_visible_viewport().await?;
                Ok(RuntimeResponse {
                    data_url: Some(data_url),
                })
            }
        }
    }

    async fn capture_visible_viewport(&self) -> Result<String, GatewayError> {
        // Screen grabbing is blocking; keep it off the async executor.
        tokio::task::spawn_blocking(Self::capture_primary_screen)
            .await
            .map_err(|e| GatewayError::Capture(format!("capture task failed: {}", e)))?
    }
}
