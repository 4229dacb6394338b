//! System clipboard seam.
//!
//! The capture pipeline only depends on [`ClipboardWriterTrait`]; the
//! desktop build writes through `arboard`.

use crate::types::errors::CaptureError;

/// Trait defining the clipboard write operation the capture pipeline needs.
pub trait ClipboardWriterTrait: Send {
    /// Writes PNG bytes to the system clipboard as an image.
    fn write_png(&mut self, png: &[u8]) -> Result<(), CaptureError>;
}

/// Clipboard writer backed by `arboard`.
#[cfg(feature = "desktop")]
pub struct ArboardClipboard {
    clipboard: arboard::Clipboard,
}

#[cfg(feature = "desktop")]
impl ArboardClipboard {
    pub fn new() -> Result<Self, CaptureError> {
        let clipboard = arboard::Clipboard::new()
            .map_err(|e| CaptureError::ClipboardWrite(e.to_string()))?;
        Ok(Self { clipboard })
    }
}

#[cfg(feature = "desktop")]
impl ClipboardWriterTrait for ArboardClipboard {
    fn write_png(&mut self, png: &[u8]) -> Result<(), CaptureError> {
        let img = image::load_from_memory(png)
            .map_err(|e| CaptureError::ClipboardWrite(e.to_string()))?
            .to_rgba8();

        let image_data = arboard::ImageData {
            width: img.width() as usize,
            height: img.height() as usize,
            bytes: std::borrow::Cow::Owned(img.into_raw()),
        };

        self.clipboard
            .set_image(image_data)
            .map_err(|e| CaptureError::ClipboardWrite(e.to_string()))
    }
}
