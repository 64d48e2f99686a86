mod clipboard_writer_arboard;
mod completion_client_http;
mod image_client_http;
mod prompt_templates;

pub use clipboard_writer_arboard::ArboardClipboardWriter;
pub use completion_client_http::HttpCompletionGateway;
pub use image_client_http::HttpImageGateway;
pub use prompt_templates::EmbeddedPromptRenderer;
