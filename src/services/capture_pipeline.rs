//! Capture pipeline: viewport capture → decode → crop → encode → clipboard.
//!
//! The stages run strictly sequentially and none is retried. The session
//! hides the overlay before invoking the pipeline so the overlay chrome is
//! absent from the screenshot; the pipeline itself starts with the settling
//! delay that hide requires.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::DynamicImage;
use log::debug;

use crate::gateway::{CapabilityGateway, RuntimeMessage};
use crate::platform::clipboard::ClipboardWriterTrait;
use crate::types::errors::CaptureError;
use crate::types::geometry::Rect;

/// Hidden overlay elements do not repaint synchronously before a capture
/// call; this fixed delay lets the compositor catch up. It is a deliberate
/// wait, not a retry, and is not configurable.
pub const SETTLE_DELAY_MS: u64 = 100;

/// A finished capture: the cropped PNG and the rectangle it came from.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub png: Vec<u8>,
    pub rect: Rect,
}

/// The capture pipeline. Owns the clipboard writer for the session.
pub struct CapturePipeline {
    gateway: Arc<dyn CapabilityGateway>,
    clipboard: Box<dyn ClipboardWriterTrait>,
}

impl CapturePipeline {
    pub fn new(gateway: Arc<dyn CapabilityGateway>, clipboard: Box<dyn ClipboardWriterTrait>) -> Self {
        Self { gateway, clipboard }
    }

    /// Runs the pipeline for a finalized capture rectangle.
    ///
    /// On success the cropped PNG has been written to the clipboard. Every
    /// error is fatal to this run; the caller tears the session down either
    /// way.
    pub async fn run(
        &mut self,
        rect: Rect,
        device_pixel_ratio: f64,
    ) -> Result<CaptureOutcome, CaptureError> {
        tokio::time::sleep(Duration::from_millis(SETTLE_DELAY_MS)).await;

        let response = self
            .gateway
            .send_runtime_message(RuntimeMessage::CaptureScreenshot)
            .await
            .map_err(|e| CaptureError::Gateway(e.to_string()))?;
        let data_url = match response.data_url {
            Some(url) if !url.is_empty() => url,
            _ => return Err(CaptureError::EmptyCapture),
        };

        let screenshot = decode_data_url(&data_url)?;
        let png = crop_to_png(&screenshot, rect, device_pixel_ratio)?;
        debug!(
            "cropped {}x{} CSS px at ratio {} into {} PNG bytes",
            rect.width,
            rect.height,
            device_pixel_ratio,
            png.len()
        );

        self.clipboard.write_png(&png)?;

        Ok(CaptureOutcome { png, rect })
    }
}

/// Decodes a PNG data URL (or bare base64 payload) into a bitmap.
pub fn decode_data_url(data_url: &str) -> Result<DynamicImage, CaptureError> {
    let payload = data_url
        .rsplit_once(',')
        .map(|(_, rest)| rest)
        .unwrap_or(data_url);
    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|e| CaptureError::DecodeFailed(e.to_string()))?;
    image::load_from_memory(&bytes).map_err(|e| CaptureError::DecodeFailed(e.to_string()))
}

/// Crops the capture rectangle out of the screenshot at native device
/// resolution and encodes it as PNG. The region is clamped to the image
/// bounds so a selection touching the viewport edge still crops cleanly.
pub fn crop_to_png(
    screenshot: &DynamicImage,
    rect: Rect,
    device_pixel_ratio: f64,
) -> Result<Vec<u8>, CaptureError> {
    let device = rect.to_device_pixels(device_pixel_ratio);
    let (img_w, img_h) = (screenshot.width(), screenshot.height());

    let x = device.x.min(img_w.saturating_sub(1));
    let y = device.y.min(img_h.saturating_sub(1));
    let width = device.width.min(img_w.saturating_sub(x)).max(1);
    let height = device.height.min(img_h.saturating_sub(y)).max(1);

    let cropped = screenshot.crop_imm(x, y, width, height);

    let mut out = Cursor::new(Vec::new());
    cropped
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| CaptureError::EncodeFailed(e.to_string()))?;
    let bytes = out.into_inner();
    if bytes.is_empty() {
        return Err(CaptureError::EncodeFailed(
            "encoder produced no data".to_string(),
        ));
    }
    Ok(bytes)
}
