use crate::app::AppContext;
use crate::domain::prompt::TemplateRenderer;
use crate::domain::{AppError, Tone, parse_titles};
use crate::ports::{CompletionGateway, ImageGateway};

/// Ask for title candidates and parse up to three of them.
///
/// An unparseable answer yields an empty list rather than an error.
pub fn execute<G, I, R>(
    ctx: &AppContext<G, I, R>,
    keywords: &str,
    tone: Tone,
) -> Result<Vec<String>, AppError>
where
    G: CompletionGateway,
    I: ImageGateway,
    R: TemplateRenderer,
{
    if keywords.trim().is_empty() {
        return Err(AppError::invalid_request("keywords must not be empty"));
    }
    let request = ctx.prompts().title_request(keywords, tone)?;
    let raw = ctx.gateway().complete(&request)?;
    let titles = parse_titles(&raw);
    if titles.is_empty() {
        tracing::warn!(response_chars = raw.chars().count(), "no title candidates in response");
    }
    Ok(titles)
}
