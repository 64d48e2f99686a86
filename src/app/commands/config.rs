use crate::domain::{AppConfig, AppError, render_config};

/// Effective configuration rendered as TOML.
pub fn execute(config: &AppConfig) -> Result<String, AppError> {
    render_config(config)
}
