use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use dialoguer::{Input, Select};

use super::progress::ConsoleProgress;
use crate::app::api::{self, Adjunct, ArticleOptions};
use crate::domain::{AppConfig, AppError, AssemblyStatus, GenerationRequest, OutputFormat, Tone};
use crate::ports::ClipboardWriter;
use crate::services::ArboardClipboardWriter;

const MANUAL_TITLE_OPTION: &str = "[enter a title manually]";

#[derive(Args)]
pub struct ArticleArgs {
    /// Keywords the article is built around
    #[arg(short, long)]
    keywords: String,
    /// Writing tone
    #[arg(short, long, default_value_t = Tone::Friendly)]
    tone: Tone,
    /// Article title; prompts with generated candidates when omitted
    #[arg(long)]
    title: Option<String>,
    /// Output format: structured (HTML headings) or plain
    #[arg(short, long, default_value_t = OutputFormat::Structured)]
    format: OutputFormat,
    /// Write the article to this file (or directory) instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Copy the finished article to the clipboard
    #[arg(long)]
    copy: bool,
    /// Generate a header image and save it here
    #[arg(long, value_name = "FILE")]
    image: Option<PathBuf>,
    /// Stop expanding after this many seconds and keep the partial article
    #[arg(long, value_name = "SECS")]
    time_limit: Option<u64>,
    /// Skip the heading plan request
    #[arg(long)]
    no_plan: bool,
}

pub fn run_article(args: ArticleArgs, config_path: Option<&Path>) -> Result<(), AppError> {
    let mut config = api::effective_config(config_path)?;
    if args.no_plan {
        config.assembly.use_heading_plan = false;
    }

    let Some(title) = resolve_title(&args, &config)? else {
        return Ok(());
    };

    let thresholds = config.assembly.thresholds();
    let target = thresholds.min_total_length;

    let request =
        GenerationRequest::new(args.keywords.as_str(), title, args.tone, args.format, thresholds)?;
    let options = ArticleOptions {
        request,
        output: args.output.clone(),
        copy: args.copy,
        image: args.image.clone(),
        time_limit: args.time_limit.map(Duration::from_secs),
    };

    let mut clipboard = if args.copy {
        match ArboardClipboardWriter::new() {
            Ok(writer) => Some(writer),
            Err(err) => {
                eprintln!("⚠️  {}", err);
                None
            }
        }
    } else {
        None
    };
    let clipboard = clipboard.as_mut().map(|writer| writer as &mut dyn ClipboardWriter);

    let reporter = ConsoleProgress::new(target);
    let result = api::generate_article(&options, config, &reporter, clipboard)?;

    let outcome = &result.outcome;
    match &result.written_to {
        Some(path) => {
            eprintln!("✅ Wrote article to {} ({} chars)", path.display(), outcome.char_count())
        }
        None => println!("{}", outcome.text),
    }

    match outcome.status {
        AssemblyStatus::Complete => eprintln!(
            "✅ Article complete after {} continuation call(s)",
            outcome.continuation_calls
        ),
        AssemblyStatus::Shortfall => eprintln!(
            "⚠️  Article is below the configured thresholds after {} continuation call(s): {}/{} chars, {} section(s), {} subsection(s)",
            outcome.continuation_calls,
            outcome.metrics.normalized_length,
            target,
            outcome.metrics.section_count,
            outcome.metrics.subsection_count
        ),
        AssemblyStatus::Cancelled => {
            eprintln!("⚠️  Time limit reached; the article is partial")
        }
    }

    report_adjunct("Copied article to clipboard", "Clipboard", &result.clipboard);
    report_adjunct("Saved header image to", "Header image", &result.image);
    Ok(())
}

fn report_adjunct(done: &str, label: &str, adjunct: &Adjunct) {
    match adjunct {
        Adjunct::Skipped => {}
        Adjunct::Done(detail) => eprintln!("✅ {} {}", done, detail),
        Adjunct::Failed(reason) => eprintln!("⚠️  {} failed: {}", label, reason),
    }
}

fn resolve_title(args: &ArticleArgs, config: &AppConfig) -> Result<Option<String>, AppError> {
    if let Some(title) = &args.title {
        return Ok(Some(title.clone()));
    }

    eprintln!("⏳ Generating title candidates...");
    let candidates = api::generate_titles(&args.keywords, args.tone, config.clone())?;
    if candidates.is_empty() {
        eprintln!("⚠️  No title candidates could be parsed; enter one manually");
        return prompt_manual_title().map(Some);
    }

    let mut items = candidates.clone();
    items.push(MANUAL_TITLE_OPTION.to_string());
    let selection = Select::new()
        .with_prompt("Select a title")
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(|err| AppError::Interaction(format!("Failed to select title: {}", err)))?;

    match selection {
        None => Ok(None),
        Some(index) if index < candidates.len() => Ok(Some(candidates[index].clone())),
        Some(_) => prompt_manual_title().map(Some),
    }
}

fn prompt_manual_title() -> Result<String, AppError> {
    Input::<String>::new()
        .with_prompt("Title")
        .interact_text()
        .map_err(|err| AppError::Interaction(format!("Failed to read title: {}", err)))
}
