use crate::domain::AppError;

/// Destination for a finished article when `--copy` is given.
///
/// A failed write is reported next to the article, never instead of it.
pub trait ClipboardWriter {
    /// Replace the clipboard contents with `text`.
    fn write_text(&mut self, text: &str) -> Result<(), AppError>;
}
