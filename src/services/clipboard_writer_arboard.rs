use arboard::Clipboard;

use crate::domain::AppError;
use crate::ports::ClipboardWriter;

/// System clipboard backed by arboard.
pub struct ArboardClipboardWriter {
    clipboard: Clipboard,
}

impl ArboardClipboardWriter {
    pub fn new() -> Result<Self, AppError> {
        let clipboard = Clipboard::new()
            .map_err(|e| AppError::ClipboardError(format!("Clipboard unavailable: {}", e)))?;
        Ok(Self { clipboard })
    }
}

impl ClipboardWriter for ArboardClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), AppError> {
        self.clipboard
            .set_text(text.to_string())
            .map_err(|e| AppError::ClipboardError(format!("Failed to copy article: {}", e)))
    }
}
