//! CLI Adapter.

mod article;
mod progress;

use std::path::{Path, PathBuf};

use crate::app::api;
use crate::domain::{AppError, OutputFormat, Tone};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "draftsmith")]
#[command(version)]
#[command(
    about = "Generate long-form articles from keywords through an LLM completion endpoint",
    long_about = None
)]
struct Cli {
    /// Configuration file (defaults to ./draftsmith.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest three titles for the keywords
    #[clap(visible_alias = "t")]
    Titles {
        /// Keywords the titles must contain
        #[arg(short, long)]
        keywords: String,
        /// Writing tone
        #[arg(short, long, default_value_t = Tone::Friendly)]
        tone: Tone,
    },
    /// Generate a full article
    #[clap(visible_alias = "a")]
    Article(article::ArticleArgs),
    /// Print a rendered prompt without calling the service
    #[clap(visible_alias = "p")]
    Prompt {
        /// titles, heading-plan, article, continuation, summary or image
        kind: api::PreviewKind,
        #[arg(short, long)]
        keywords: String,
        #[arg(short, long, default_value_t = Tone::Friendly)]
        tone: Tone,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long, default_value_t = OutputFormat::Structured)]
        format: OutputFormat,
        /// Draft file used by continuation and summary prompts
        #[arg(long, value_name = "FILE")]
        draft: Option<PathBuf>,
        /// Heading for the article prompt's plan (repeatable)
        #[arg(long = "plan", value_name = "HEADING")]
        plan: Vec<String>,
        /// Print the full request payload as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Config,
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result: Result<(), AppError> = match cli.command {
        Commands::Titles { keywords, tone } => run_titles(&keywords, tone, config),
        Commands::Article(args) => article::run_article(args, config),
        Commands::Prompt { kind, keywords, tone, title, format, draft, plan, json } => {
            let draft = match draft {
                Some(path) => std::fs::read_to_string(path),
                None => Ok(String::new()),
            };
            draft.map_err(AppError::from).and_then(|draft| {
                let options =
                    api::PreviewOptions { kind, keywords, title, tone, format, draft, plan };
                run_prompt(&options, json, config)
            })
        }
        Commands::Config => api::show_config(config).map(|rendered| print!("{}", rendered)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_titles(keywords: &str, tone: Tone, config_path: Option<&Path>) -> Result<(), AppError> {
    let titles = api::generate_titles(keywords, tone, api::effective_config(config_path)?)?;
    if titles.is_empty() {
        println!("⚠️  No title candidates could be parsed from the response");
        return Ok(());
    }
    for (index, title) in titles.iter().enumerate() {
        println!("{}) {}", index + 1, title);
    }
    Ok(())
}

fn run_prompt(
    options: &api::PreviewOptions,
    json: bool,
    config: Option<&Path>,
) -> Result<(), AppError> {
    let preview = api::preview_prompt(options, config)?;
    match (&preview.payload, json) {
        (Some(payload), true) => {
            let rendered = serde_json::to_string_pretty(payload)
                .map_err(|e| AppError::Configuration(format!("Failed to render payload: {}", e)))?;
            println!("{}", rendered);
        }
        _ => println!("{}", preview.text),
    }
    Ok(())
}
