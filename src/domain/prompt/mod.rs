mod builder;
mod context;
mod template;
mod types;

pub use builder::PromptBuilder;
pub use context::PromptContext;
pub use template::TemplateRenderer;
pub use types::{ChatMessage, CompletionRequest, MessageRole, Stage};
