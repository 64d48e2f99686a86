//! Embedded prompt templates rendered with minijinja.

use std::sync::OnceLock;

use include_dir::{Dir, include_dir};
use minijinja::{Environment, UndefinedBehavior};

use crate::domain::AppError;
use crate::domain::prompt::{PromptContext, TemplateRenderer};

static PROMPTS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/prompts");

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

const TEMPLATE_EXTENSION: &str = "j2";

/// Renders the prompt templates compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedPromptRenderer;

impl EmbeddedPromptRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Names of every embedded template, sorted.
    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = PROMPTS_DIR
            .files()
            .filter(|file| {
                file.path().extension().and_then(|ext| ext.to_str()) == Some(TEMPLATE_EXTENSION)
            })
            .filter_map(|file| file.path().file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        names.sort();
        names
    }

    fn source(&self, template_name: &str) -> Result<&'static str, AppError> {
        let path = format!("{}.{}", template_name, TEMPLATE_EXTENSION);
        let file = PROMPTS_DIR.get_file(&path).ok_or_else(|| AppError::PromptTemplate {
            template: template_name.to_string(),
            reason: "template not found".to_string(),
        })?;
        file.contents_utf8().ok_or_else(|| AppError::PromptTemplate {
            template: template_name.to_string(),
            reason: "template is not valid UTF-8".to_string(),
        })
    }
}

impl TemplateRenderer for EmbeddedPromptRenderer {
    fn render(&self, template_name: &str, context: &PromptContext) -> Result<String, AppError> {
        render_template(self.source(template_name)?, context, template_name)
    }
}

/// Render a template string using strict Jinja-compatible semantics.
///
/// Only `{{ ... }}` interpolation is allowed. Control structures are rejected.
fn render_template(
    template: &str,
    context: &PromptContext,
    template_name: &str,
) -> Result<String, AppError> {
    if let Some(token) = disallowed_template_token(template) {
        return Err(AppError::PromptTemplate {
            template: template_name.to_string(),
            reason: format!("template syntax '{}' is not allowed", token),
        });
    }

    let env = ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env
    });

    env.render_str(template, &context.variables).map_err(|err| AppError::PromptTemplate {
        template: template_name.to_string(),
        reason: err.to_string(),
    })
}

fn disallowed_template_token(template: &str) -> Option<&'static str> {
    if template.contains("{%") {
        return Some("{%");
    }
    if template.contains("{#") {
        return Some("{#");
    }
    None
}
