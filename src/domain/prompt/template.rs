use super::PromptContext;
use crate::domain::AppError;

/// Trait for rendering named prompt templates.
///
/// Keeps the template engine (minijinja) and the embedded template assets out
/// of the domain layer.
pub trait TemplateRenderer {
    /// Render the template registered under `template_name`.
    fn render(&self, template_name: &str, context: &PromptContext) -> Result<String, AppError>;
}
