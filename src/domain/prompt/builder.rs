//! Deterministic construction of completion payloads.

use super::{ChatMessage, CompletionRequest, PromptContext, Stage, TemplateRenderer};
use crate::domain::markup::SummaryMarkers;
use crate::domain::titles::MAX_PLAN_HEADINGS;
use crate::domain::{AppError, GenerationRequest, Thresholds, Tone};

const IMAGE_TEMPLATE: &str = "image";

/// Builds every payload a generation run sends.
///
/// Pure apart from template rendering: the same inputs always produce the
/// same payload.
#[derive(Debug, Clone)]
pub struct PromptBuilder<R: TemplateRenderer> {
    renderer: R,
    model: String,
    markers: SummaryMarkers,
}

impl<R: TemplateRenderer> PromptBuilder<R> {
    pub fn new(renderer: R, model: impl Into<String>, markers: SummaryMarkers) -> Self {
        Self { renderer, model: model.into(), markers }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn markers(&self) -> &SummaryMarkers {
        &self.markers
    }

    /// Three numbered title candidates for the keywords.
    pub fn title_request(&self, keywords: &str, tone: Tone) -> Result<CompletionRequest, AppError> {
        let context = PromptContext::new()
            .with_var("keywords", keywords.trim())
            .with_var("tone", tone.describe());
        self.request(Stage::Titles, &context)
    }

    /// Section topics to seed the article prompt with.
    pub fn heading_plan_request(
        &self,
        request: &GenerationRequest,
    ) -> Result<CompletionRequest, AppError> {
        let context = PromptContext::new()
            .with_var("title", request.title())
            .with_var("keywords", request.keywords());
        self.request(Stage::HeadingPlan, &context)
    }

    /// The complete first draft.
    pub fn article_request(
        &self,
        request: &GenerationRequest,
        plan: &[String],
    ) -> Result<CompletionRequest, AppError> {
        let context = self
            .base_context(request)
            .with_var("format", request.output_format().describe())
            .with_var("plan_block", plan_block(plan));
        self.request(Stage::Article, &context)
    }

    /// Extension of the current draft; the whole draft is sent as context.
    pub fn continuation_request(
        &self,
        request: &GenerationRequest,
        draft: &str,
    ) -> Result<CompletionRequest, AppError> {
        let context = self.base_context(request).with_var("draft", draft);
        self.request(Stage::Continuation, &context)
    }

    /// A summary section for a draft that lacks one.
    pub fn summary_request(
        &self,
        request: &GenerationRequest,
        draft: &str,
    ) -> Result<CompletionRequest, AppError> {
        let context = self.base_context(request).with_var("draft", draft);
        self.request(Stage::Summary, &context)
    }

    /// Prompt text for the header image.
    pub fn image_prompt(&self, title: &str, keywords: &str) -> Result<String, AppError> {
        let context =
            PromptContext::new().with_var("title", title.trim()).with_var("keywords", keywords.trim());
        self.renderer.render(IMAGE_TEMPLATE, &context)
    }

    /// Rendered user prompt for a stage, without wrapping it in a payload.
    pub fn render_stage(&self, stage: Stage, context: &PromptContext) -> Result<String, AppError> {
        self.renderer.render(stage.template_name(), context)
    }

    fn base_context(&self, request: &GenerationRequest) -> PromptContext {
        let thresholds: &Thresholds = request.thresholds();
        PromptContext::new()
            .with_var("title", request.title())
            .with_var("keywords", request.keywords())
            .with_var("tone", request.tone().describe())
            .with_var("summary_heading", self.markers.primary())
            .with_var("min_total_length", thresholds.min_total_length)
            .with_var("min_section_count", thresholds.min_section_count)
            .with_var("min_subsections_per_section", thresholds.min_subsections_per_section)
            .with_var("min_subsection_total", thresholds.min_subsection_total())
            .with_var("min_subsection_length", thresholds.min_subsection_length)
            .with_var("min_intro_length", thresholds.min_intro_length)
            .with_var("min_summary_length", thresholds.min_summary_length)
    }

    fn request(&self, stage: Stage, context: &PromptContext) -> Result<CompletionRequest, AppError> {
        let prompt = self.render_stage(stage, context)?;
        Ok(CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(stage.system_message()), ChatMessage::user(prompt)],
            max_tokens: stage.max_tokens(),
            temperature: stage.temperature(),
        })
    }
}

fn plan_block(plan: &[String]) -> String {
    if plan.is_empty() {
        return String::new();
    }
    let lines: Vec<String> =
        plan.iter().take(MAX_PLAN_HEADINGS).map(|heading| format!("- {}", heading)).collect();
    format!(
        "Candidate section headings (adapt as needed, keep the keywords in each heading):\n{}\n",
        lines.join("\n")
    )
}
