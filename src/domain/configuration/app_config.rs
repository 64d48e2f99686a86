//! Application configuration domain models.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::AppError;
use crate::domain::Thresholds;
use crate::domain::assembly::AssemblyPolicy;
use crate::domain::markup::SummaryMarkers;

/// Configuration loaded from `draftsmith.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Completion and image service connection.
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Header image generation.
    #[serde(default)]
    pub image: ImageConfig,
    /// Thresholds and loop bounds.
    #[serde(default)]
    pub assembly: AssemblyConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.gateway.validate()?;
        self.image.validate()?;
        self.assembly.validate()?;
        Ok(())
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(API_BASE_ENV).filter(|value| !value.trim().is_empty()) {
            self.gateway.base_url = Url::parse(base.trim()).map_err(|e| {
                AppError::InvalidConfig(format!("{} is not a valid URL: {}", API_BASE_ENV, e))
            })?;
        }
        Ok(())
    }
}

/// Environment variable overriding `gateway.base_url`.
pub const API_BASE_ENV: &str = "DRAFTSMITH_API_BASE";

/// Completion service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Base URL; `/chat/completions` and `/images/generations` are appended.
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Model identifier sent with every completion request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.timeout_secs == 0 {
            return Err(AppError::InvalidConfig("timeout_secs must be greater than 0".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(AppError::InvalidConfig("model must not be empty".to_string()));
        }
        if self.api_key_env.trim().is_empty() {
            return Err(AppError::InvalidConfig("api_key_env must not be empty".to_string()));
        }
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(AppError::InvalidConfig(format!(
                "base_url must use http or https, got '{}'",
                self.base_url.scheme()
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolve the API key from the configured environment variable.
    pub fn api_key<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(&self.api_key_env).map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
    }
}

fn default_base_url() -> Url {
    Url::parse("https://api.openai.com/v1").expect("Default base URL must be valid")
}

fn default_model() -> String {
    "gpt-4-turbo".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_api_key_env() -> String {
    "DRAFTSMITH_API_KEY".to_string()
}

/// Image generation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageConfig {
    /// Requested dimensions as `WIDTHxHEIGHT`.
    #[serde(default = "default_image_size")]
    pub size: String,
    /// Image model; omitted from the request when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Saved images wider than this are scaled down, keeping the aspect ratio.
    #[serde(default = "default_max_width")]
    pub max_width: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self { size: default_image_size(), model: None, max_width: default_max_width() }
    }
}

impl ImageConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        let valid = self
            .size
            .split_once('x')
            .map(|(w, h)| {
                matches!(w.parse::<u32>(), Ok(w) if w > 0) && matches!(h.parse::<u32>(), Ok(h) if h > 0)
            })
            .unwrap_or(false);
        if !valid {
            return Err(AppError::InvalidConfig(format!(
                "image size must look like 1024x1024, got '{}'",
                self.size
            )));
        }
        if self.max_width == 0 {
            return Err(AppError::InvalidConfig("image max_width must be greater than zero".into()));
        }
        Ok(())
    }
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

fn default_max_width() -> u32 {
    800
}

/// Assembly thresholds and loop bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssemblyConfig {
    #[serde(default = "default_min_total_length")]
    pub min_total_length: usize,
    #[serde(default = "default_min_section_count")]
    pub min_section_count: usize,
    #[serde(default = "default_min_subsections_per_section")]
    pub min_subsections_per_section: usize,
    #[serde(default = "default_min_subsection_length")]
    pub min_subsection_length: usize,
    #[serde(default = "default_min_intro_length")]
    pub min_intro_length: usize,
    #[serde(default = "default_min_summary_length")]
    pub min_summary_length: usize,
    /// Continuation calls allowed before finalizing a short draft.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Pause between continuation calls in milliseconds.
    #[serde(default)]
    pub pacing_ms: u64,
    /// Request a heading plan before the first draft.
    #[serde(default = "default_true")]
    pub use_heading_plan: bool,
    /// Heading texts that mark a summary section.
    #[serde(default = "default_summary_markers")]
    pub summary_markers: Vec<String>,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        let thresholds = Thresholds::default();
        Self {
            min_total_length: thresholds.min_total_length,
            min_section_count: thresholds.min_section_count,
            min_subsections_per_section: thresholds.min_subsections_per_section,
            min_subsection_length: thresholds.min_subsection_length,
            min_intro_length: thresholds.min_intro_length,
            min_summary_length: thresholds.min_summary_length,
            max_retries: default_max_retries(),
            pacing_ms: 0,
            use_heading_plan: default_true(),
            summary_markers: default_summary_markers(),
        }
    }
}

impl AssemblyConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.min_total_length == 0 {
            return Err(AppError::InvalidConfig(
                "min_total_length must be greater than 0".to_string(),
            ));
        }
        if self.min_section_count == 0 {
            return Err(AppError::InvalidConfig(
                "min_section_count must be greater than 0".to_string(),
            ));
        }
        if self.max_retries == 0 {
            return Err(AppError::InvalidConfig("max_retries must be greater than 0".to_string()));
        }
        if self.summary_markers.iter().all(|m| m.trim().is_empty()) {
            return Err(AppError::InvalidConfig(
                "summary_markers must contain at least one non-empty marker".to_string(),
            ));
        }
        Ok(())
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            min_total_length: self.min_total_length,
            min_section_count: self.min_section_count,
            min_subsections_per_section: self.min_subsections_per_section,
            min_subsection_length: self.min_subsection_length,
            min_intro_length: self.min_intro_length,
            min_summary_length: self.min_summary_length,
        }
    }

    pub fn policy(&self) -> AssemblyPolicy {
        AssemblyPolicy {
            max_retries: self.max_retries,
            pacing: Duration::from_millis(self.pacing_ms),
            use_heading_plan: self.use_heading_plan,
        }
    }

    pub fn markers(&self) -> SummaryMarkers {
        SummaryMarkers::new(&self.summary_markers)
    }
}

fn default_min_total_length() -> usize {
    Thresholds::default().min_total_length
}

fn default_min_section_count() -> usize {
    Thresholds::default().min_section_count
}

fn default_min_subsections_per_section() -> usize {
    Thresholds::default().min_subsections_per_section
}

fn default_min_subsection_length() -> usize {
    Thresholds::default().min_subsection_length
}

fn default_min_intro_length() -> usize {
    Thresholds::default().min_intro_length
}

fn default_min_summary_length() -> usize {
    Thresholds::default().min_summary_length
}

fn default_max_retries() -> u32 {
    8
}

fn default_true() -> bool {
    true
}

fn default_summary_markers() -> Vec<String> {
    SummaryMarkers::default().as_slice().to_vec()
}
