//! Full article generation with its adjuncts: file output, clipboard and header image.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::AppContext;
use crate::domain::prompt::TemplateRenderer;
use crate::domain::header_image;
use crate::domain::{
    AppError, ArticleOutcome, Assembler, AssemblyStatus, CancellationToken, GenerationRequest,
};
use crate::ports::{ClipboardWriter, CompletionGateway, ImageGateway, ImageRequest, ProgressReporter};

/// Default file name used when `--output` points at a directory.
pub const DEFAULT_ARTICLE_FILE: &str = "article";

#[derive(Debug, Clone)]
pub struct ArticleOptions {
    pub request: GenerationRequest,
    /// File or directory to write the article to.
    pub output: Option<PathBuf>,
    pub copy: bool,
    /// Where to save a generated header image.
    pub image: Option<PathBuf>,
    /// Wall-clock limit after which the run stops between calls.
    pub time_limit: Option<Duration>,
}

/// Outcome of an optional step that must not fail the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adjunct {
    Skipped,
    Done(String),
    Failed(String),
}

impl Adjunct {
    pub fn is_failed(&self) -> bool {
        matches!(self, Adjunct::Failed(_))
    }
}

#[derive(Debug, Clone)]
pub struct ArticleResult {
    pub outcome: ArticleOutcome,
    pub written_to: Option<PathBuf>,
    pub clipboard: Adjunct,
    pub image: Adjunct,
}

pub fn execute<G, I, R>(
    ctx: &AppContext<G, I, R>,
    options: &ArticleOptions,
    reporter: &dyn ProgressReporter,
    clipboard: Option<&mut dyn ClipboardWriter>,
) -> Result<ArticleResult, AppError>
where
    G: CompletionGateway,
    I: ImageGateway,
    R: TemplateRenderer,
{
    let cancellation = CancellationToken::new();
    if let Some(limit) = options.time_limit {
        cancellation.cancel_after(limit);
    }

    let outcome = Assembler::new(ctx.gateway(), ctx.prompts(), ctx.policy())
        .with_reporter(reporter)
        .with_cancellation(cancellation.clone())
        .run(&options.request)?;

    let written_to = match &options.output {
        Some(path) => Some(write_article(path, &outcome.text, &options.request)?),
        None => None,
    };

    let clipboard = match (options.copy, clipboard) {
        (false, _) => Adjunct::Skipped,
        (true, None) => Adjunct::Failed("clipboard unavailable".to_string()),
        (true, Some(writer)) => match writer.write_text(&outcome.text) {
            Ok(()) => Adjunct::Done(format!("{} chars", outcome.char_count())),
            Err(err) => {
                tracing::warn!(error = %err, "copy to clipboard failed");
                Adjunct::Failed(err.to_string())
            }
        },
    };

    let image = match &options.image {
        None => Adjunct::Skipped,
        Some(_) if outcome.status == AssemblyStatus::Cancelled || cancellation.is_cancelled() => {
            Adjunct::Failed("skipped after cancellation".to_string())
        }
        Some(path) => match generate_image(ctx, &options.request, path) {
            Ok((width, height)) => Adjunct::Done(format!("{} ({}x{})", path.display(), width, height)),
            Err(err) => {
                tracing::warn!(error = %err, "header image generation failed");
                Adjunct::Failed(err.to_string())
            }
        },
    };

    Ok(ArticleResult { outcome, written_to, clipboard, image })
}

/// Write the article, resolving directories to `article.<ext>` inside them.
fn write_article(path: &Path, text: &str, request: &GenerationRequest) -> Result<PathBuf, AppError> {
    let target = if path.is_dir() {
        path.join(format!("{}.{}", DEFAULT_ARTICLE_FILE, request.output_format().extension()))
    } else {
        path.to_path_buf()
    };
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, text)?;
    Ok(target)
}

fn generate_image<G, I, R>(
    ctx: &AppContext<G, I, R>,
    request: &GenerationRequest,
    path: &Path,
) -> Result<(u32, u32), AppError>
where
    G: CompletionGateway,
    I: ImageGateway,
    R: TemplateRenderer,
{
    let prompt = ctx.prompts().image_prompt(request.title(), request.keywords())?;
    let image_request = ImageRequest { prompt, size: ctx.config().image.size.clone() };
    let bytes = ctx.images().generate(&image_request)?;
    let image = header_image::downsample(&bytes, ctx.config().image.max_width)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &image.bytes)?;
    Ok((image.width, image.height))
}
