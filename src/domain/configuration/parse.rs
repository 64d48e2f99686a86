//! Configuration parsing.

use crate::domain::{AppConfig, AppError};

/// Parse and validate configuration from TOML content.
pub fn parse_config_content(content: &str) -> Result<AppConfig, AppError> {
    let config: AppConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Render the configuration back to TOML.
pub fn render_config(config: &AppConfig) -> Result<String, AppError> {
    toml::to_string_pretty(config)
        .map_err(|e| AppError::Configuration(format!("Failed to render configuration: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_yields_defaults() {
        let config = parse_config_content("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_config_content(
            r#"
[gateway]
model = "gpt-4o"

[assembly]
min_total_length = 1200
summary_markers = ["Wrap-up"]
"#,
        )
        .unwrap();
        assert_eq!(config.gateway.model, "gpt-4o");
        assert_eq!(config.gateway.timeout_secs, 120);
        assert_eq!(config.assembly.min_total_length, 1200);
        assert_eq!(config.assembly.min_section_count, 4);
        assert_eq!(config.assembly.summary_markers, vec!["Wrap-up".to_string()]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = parse_config_content("[gateway]\nretries = 3\n").unwrap_err();
        assert!(matches!(err, AppError::TomlParseError(_)));

        let err = parse_config_content("[cache]\nenabled = true\n").unwrap_err();
        assert!(matches!(err, AppError::TomlParseError(_)));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let err = parse_config_content("[assembly]\nmax_retries = 0\n").unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn rendered_config_parses_back() {
        let mut config = AppConfig::default();
        config.image.model = Some("dall-e-3".to_string());
        let rendered = render_config(&config).unwrap();
        assert!(rendered.contains("[gateway]"));
        assert_eq!(parse_config_content(&rendered).unwrap(), config);
    }
}
