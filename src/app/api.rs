//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together configuration
//! loading, context creation and command execution.

use std::path::Path;

use crate::app::commands::{article, config, preview, titles};
use crate::app::{AppContext, config::load_config};
use crate::domain::{AppConfig, PromptBuilder, Tone};
use crate::ports::{ClipboardWriter, ProgressReporter};
use crate::services::{EmbeddedPromptRenderer, HttpCompletionGateway, HttpImageGateway};

pub use crate::app::commands::article::{Adjunct, ArticleOptions, ArticleResult};
pub use crate::app::commands::preview::{PreviewKind, PreviewOptions, PromptPreview};
pub use crate::domain::AppError;

type HttpContext = AppContext<HttpCompletionGateway, HttpImageGateway, EmbeddedPromptRenderer>;

/// Create an `AppContext` talking to the configured HTTP endpoints.
fn create_context(config: AppConfig) -> Result<HttpContext, AppError> {
    let gateway = HttpCompletionGateway::from_env_with_config(&config.gateway)?;
    let images = HttpImageGateway::from_env_with_config(&config.gateway, &config.image)?;
    Ok(AppContext::new(config, gateway, images, EmbeddedPromptRenderer::new()))
}

/// Effective configuration for an optional explicit config path.
pub fn effective_config(config_path: Option<&Path>) -> Result<AppConfig, AppError> {
    load_config(config_path)
}

/// Generate up to three title candidates.
pub fn generate_titles(keywords: &str, tone: Tone, config: AppConfig) -> Result<Vec<String>, AppError> {
    let ctx = create_context(config)?;
    titles::execute(&ctx, keywords, tone)
}

/// Generate a full article.
pub fn generate_article(
    options: &ArticleOptions,
    config: AppConfig,
    reporter: &dyn ProgressReporter,
    clipboard: Option<&mut dyn ClipboardWriter>,
) -> Result<ArticleResult, AppError> {
    let ctx = create_context(config)?;
    article::execute(&ctx, options, reporter, clipboard)
}

/// Render a prompt without sending it.
pub fn preview_prompt(
    options: &PreviewOptions,
    config_path: Option<&Path>,
) -> Result<PromptPreview, AppError> {
    let config = load_config(config_path)?;
    let prompts = PromptBuilder::new(
        EmbeddedPromptRenderer::new(),
        config.gateway.model.clone(),
        config.assembly.markers(),
    );
    preview::execute(&prompts, config.assembly.thresholds(), options)
}

/// Effective configuration rendered as TOML.
pub fn show_config(config_path: Option<&Path>) -> Result<String, AppError> {
    config::execute(&load_config(config_path)?)
}
