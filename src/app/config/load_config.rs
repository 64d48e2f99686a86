//! Application configuration loading.

use std::fs;
use std::path::Path;

use crate::domain::{AppConfig, AppError, parse_config_content};

/// Configuration file picked up from the working directory.
pub const CONFIG_FILE_NAME: &str = "draftsmith.toml";

/// Load configuration for the current process.
///
/// An explicit path must exist. Otherwise `./draftsmith.toml` is used when
/// present, and built-in defaults when not. Environment overrides apply last.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, AppError> {
    let cwd = std::env::current_dir()?;
    load_config_from(explicit, &cwd, |name| std::env::var(name).ok())
}

/// Load configuration relative to `cwd` with environment lookups through `env`.
pub fn load_config_from<F>(explicit: Option<&Path>, cwd: &Path, env: F) -> Result<AppConfig, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(AppError::Configuration(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            read_config(path)?
        }
        None => {
            let candidate = cwd.join(CONFIG_FILE_NAME);
            if candidate.is_file() { read_config(&candidate)? } else { AppConfig::default() }
        }
    };

    config.apply_env_overrides(env)?;
    config.validate()?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<AppConfig, AppError> {
    tracing::debug!(path = %path.display(), "loading configuration");
    let content = fs::read_to_string(path)?;
    parse_config_content(&content)
}
