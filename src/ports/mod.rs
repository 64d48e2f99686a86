mod clipboard_writer;
mod completion_gateway;
mod image_gateway;
mod progress_reporter;

pub use clipboard_writer::ClipboardWriter;
pub use completion_gateway::CompletionGateway;
pub use image_gateway::{ImageGateway, ImageRequest};
pub use progress_reporter::{NoopProgress, ProgressReporter};
