mod clipboard;
mod gateways;
mod progress;
mod renderer;

pub use clipboard::MockClipboard;
pub use gateways::{FakeImageGateway, ScriptedGateway, encoded_png};
pub use progress::RecordingProgress;
pub use renderer::EchoRenderer;
