use crate::domain::AppError;
use crate::domain::prompt::{PromptContext, TemplateRenderer};

/// Renders `name|key=value|...` so tests can assert on the variables a prompt received.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoRenderer;

impl TemplateRenderer for EchoRenderer {
    fn render(&self, template_name: &str, context: &PromptContext) -> Result<String, AppError> {
        let mut out = format!("{}|", template_name);
        for (key, value) in &context.variables {
            out.push_str(&format!("{}={}|", key, value));
        }
        Ok(out)
    }
}
