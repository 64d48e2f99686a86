//! Generation request value objects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::AppError;

/// Writing tone requested for the article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Friendly,
    Professional,
    Casual,
    Persuasive,
    Formal,
}

impl Tone {
    pub const ALL: [Tone; 5] =
        [Tone::Friendly, Tone::Professional, Tone::Casual, Tone::Persuasive, Tone::Formal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Friendly => "friendly",
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Persuasive => "persuasive",
            Tone::Formal => "formal",
        }
    }

    /// Phrase rendered into prompts.
    pub fn describe(&self) -> &'static str {
        match self {
            Tone::Friendly => "friendly and approachable, speaking directly to the reader",
            Tone::Professional => "professional and precise, backed by concrete detail",
            Tone::Casual => "casual and conversational",
            Tone::Persuasive => "persuasive, benefit-driven and motivating",
            Tone::Formal => "formal and polite",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Tone::ALL.into_iter().find(|tone| tone.as_str() == wanted).ok_or_else(|| {
            let names: Vec<&str> = Tone::ALL.iter().map(Tone::as_str).collect();
            format!("unknown tone '{}': expected one of {}", s, names.join(", "))
        })
    }
}

/// Representation of the finished article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Heading and paragraph markup retained.
    #[default]
    Structured,
    /// Markup rewritten into `#`-style headings and bare paragraphs.
    Plain,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Structured => "structured",
            OutputFormat::Plain => "plain",
        }
    }

    /// Final delivery format named in the article prompt. The model is
    /// always asked for markup; plain delivery is produced by `to_plain`.
    pub fn describe(&self) -> &'static str {
        match self {
            OutputFormat::Structured => "the HTML markup as written",
            OutputFormat::Plain => "plain text with # headings, converted from the markup",
        }
    }

    /// Conventional file extension for exported output.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Structured => "html",
            OutputFormat::Plain => "txt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structured" | "html" => Ok(OutputFormat::Structured),
            "plain" | "text" => Ok(OutputFormat::Plain),
            other => Err(format!("unknown output format '{}': expected structured or plain", other)),
        }
    }
}

/// Structural and length minimums a finished draft should meet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thresholds {
    /// Normalized body length (markup and whitespace removed).
    pub min_total_length: usize,
    pub min_section_count: usize,
    pub min_subsections_per_section: usize,
    pub min_subsection_length: usize,
    pub min_intro_length: usize,
    pub min_summary_length: usize,
}

impl Thresholds {
    /// Subsections required across the whole draft.
    pub fn min_subsection_total(&self) -> usize {
        self.min_section_count.saturating_mul(self.min_subsections_per_section)
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_total_length: 3200,
            min_section_count: 4,
            min_subsections_per_section: 4,
            min_subsection_length: 300,
            min_intro_length: 400,
            min_summary_length: 500,
        }
    }
}

/// Everything one generation run needs from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    keywords: String,
    title: String,
    tone: Tone,
    output_format: OutputFormat,
    thresholds: Thresholds,
}

impl GenerationRequest {
    pub fn new(
        keywords: impl Into<String>,
        title: impl Into<String>,
        tone: Tone,
        output_format: OutputFormat,
        thresholds: Thresholds,
    ) -> Result<Self, AppError> {
        let keywords = keywords.into().trim().to_string();
        let title = title.into().trim().to_string();
        if keywords.is_empty() {
            return Err(AppError::invalid_request("keywords must not be empty"));
        }
        if title.is_empty() {
            return Err(AppError::invalid_request("title must not be empty"));
        }
        Ok(Self { keywords, title, tone, output_format, thresholds })
    }

    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_parses_case_insensitively() {
        assert_eq!("Professional".parse::<Tone>(), Ok(Tone::Professional));
        assert_eq!(" casual ".parse::<Tone>(), Ok(Tone::Casual));
        let err = "grumpy".parse::<Tone>().unwrap_err();
        assert!(err.contains("friendly, professional, casual, persuasive, formal"));
    }

    #[test]
    fn output_format_accepts_legacy_names() {
        assert_eq!("html".parse::<OutputFormat>(), Ok(OutputFormat::Structured));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Plain));
        assert!("pdf".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn request_rejects_blank_inputs() {
        let blank_keywords = GenerationRequest::new(
            "  ",
            "Title",
            Tone::default(),
            OutputFormat::default(),
            Thresholds::default(),
        );
        assert!(matches!(blank_keywords, Err(AppError::InvalidRequest(_))));

        let blank_title = GenerationRequest::new(
            "rust",
            "",
            Tone::default(),
            OutputFormat::default(),
            Thresholds::default(),
        );
        assert!(matches!(blank_title, Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn request_trims_inputs() {
        let request = GenerationRequest::new(
            " rust cli ",
            " Ship It ",
            Tone::Casual,
            OutputFormat::Plain,
            Thresholds::default(),
        )
        .unwrap();
        assert_eq!(request.keywords(), "rust cli");
        assert_eq!(request.title(), "Ship It");
    }

    #[test]
    fn subsection_total_is_product_of_minimums() {
        let thresholds =
            Thresholds { min_section_count: 3, min_subsections_per_section: 2, ..Default::default() };
        assert_eq!(thresholds.min_subsection_total(), 6);
    }
}
