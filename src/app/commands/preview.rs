//! Render prompts without calling the service.

use std::fmt;
use std::str::FromStr;

use crate::domain::prompt::{CompletionRequest, PromptBuilder, Stage, TemplateRenderer};
use crate::domain::{AppError, GenerationRequest, OutputFormat, Thresholds, Tone};

/// Prompt to preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Stage(Stage),
    Image,
}

impl FromStr for PreviewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("image") {
            return Ok(PreviewKind::Image);
        }
        Stage::from_name(s).map(PreviewKind::Stage).ok_or_else(|| {
            format!(
                "unknown prompt kind '{}': expected titles, heading-plan, article, continuation, summary or image",
                s
            )
        })
    }
}

impl fmt::Display for PreviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewKind::Stage(stage) => f.write_str(stage.template_name()),
            PreviewKind::Image => f.write_str("image"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreviewOptions {
    pub kind: PreviewKind,
    pub keywords: String,
    /// Falls back to the keywords when absent.
    pub title: Option<String>,
    pub tone: Tone,
    pub format: OutputFormat,
    /// Draft text for continuation and summary prompts.
    pub draft: String,
    /// Heading plan for the article prompt.
    pub plan: Vec<String>,
}

/// A rendered prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPreview {
    /// Full payload; absent for the image prompt, which is sent as plain text.
    pub payload: Option<CompletionRequest>,
    pub text: String,
}

pub fn execute<R: TemplateRenderer>(
    prompts: &PromptBuilder<R>,
    thresholds: Thresholds,
    options: &PreviewOptions,
) -> Result<PromptPreview, AppError> {
    let title = options.title.clone().unwrap_or_else(|| options.keywords.clone());

    let payload = match options.kind {
        PreviewKind::Image => {
            let text = prompts.image_prompt(&title, &options.keywords)?;
            return Ok(PromptPreview { payload: None, text });
        }
        PreviewKind::Stage(Stage::Titles) => {
            prompts.title_request(&options.keywords, options.tone)?
        }
        PreviewKind::Stage(stage) => {
            let request = GenerationRequest::new(
                options.keywords.as_str(),
                title,
                options.tone,
                options.format,
                thresholds,
            )?;
            match stage {
                Stage::HeadingPlan => prompts.heading_plan_request(&request)?,
                Stage::Article => prompts.article_request(&request, &options.plan)?,
                Stage::Continuation => prompts.continuation_request(&request, &options.draft)?,
                Stage::Summary => prompts.summary_request(&request, &options.draft)?,
                Stage::Titles => prompts.title_request(&options.keywords, options.tone)?,
            }
        }
    };

    let text = payload.user_prompt().to_string();
    Ok(PromptPreview { payload: Some(payload), text })
}
