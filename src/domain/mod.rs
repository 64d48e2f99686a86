pub mod assembly;
pub mod configuration;
pub mod draft;
pub mod error;
pub mod header_image;
pub mod markup;
pub mod prompt;
pub mod request;
pub mod titles;

pub use assembly::{
    ArticleOutcome, Assembler, AssemblyPolicy, AssemblyStatus, CancellationToken, Phase,
    ProgressEvent,
};
pub use configuration::{
    API_BASE_ENV, AppConfig, AssemblyConfig, GatewayConfig, ImageConfig, parse_config_content,
    render_config,
};
pub use draft::{Draft, DraftMetrics};
pub use error::AppError;
pub use markup::SummaryMarkers;
pub use prompt::{CompletionRequest, PromptBuilder, PromptContext, Stage, TemplateRenderer};
pub use request::{GenerationRequest, OutputFormat, Thresholds, Tone};
pub use titles::{parse_heading_plan, parse_titles};
