//! draftsmith: generate long-form articles from keywords through an LLM
//! completion endpoint, growing each draft until it meets structural and
//! length thresholds.

pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{
    Adjunct, ArticleOptions, ArticleResult, PreviewKind, PreviewOptions, PromptPreview,
    effective_config, generate_article, generate_titles, preview_prompt, show_config,
};
pub use domain::{
    AppConfig, AppError, ArticleOutcome, Assembler, AssemblyPolicy, AssemblyStatus,
    CancellationToken, DraftMetrics, GenerationRequest, OutputFormat, Phase, ProgressEvent,
    Thresholds, Tone,
};
pub use ports::{CompletionGateway, ImageGateway, ImageRequest, NoopProgress, ProgressReporter};
