use std::io;

use thiserror::Error;

/// Library-wide error type for draftsmith operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Configuration values failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// Generation inputs are unusable (empty keywords, empty title, ...).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The generation service answered with a non-success status.
    #[error("Gateway error ({status}): {body}")]
    Gateway { status: u16, body: String },

    /// The generation service could not be reached or its response decoded.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A prompt template is missing or failed to render.
    #[error("Prompt template '{template}' failed: {reason}")]
    PromptTemplate { template: String, reason: String },

    /// Clipboard access failed.
    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    /// Generated image bytes could not be decoded or re-encoded.
    #[error("Image error: {0}")]
    Image(String),

    /// Interactive prompt failed.
    #[error("Interactive input failed: {0}")]
    Interaction(String),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        AppError::InvalidRequest(message.into())
    }

    /// True for failures reported by (or on the way to) the remote service.
    pub fn is_gateway_failure(&self) -> bool {
        matches!(self, AppError::Gateway { .. } | AppError::Http(_))
    }

    /// Provide an `io::ErrorKind`-like view for callers mapping errors to exit codes.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Configuration(_)
            | AppError::InvalidConfig(_)
            | AppError::TomlParseError(_)
            | AppError::InvalidRequest(_)
            | AppError::PromptTemplate { .. } => io::ErrorKind::InvalidInput,
            AppError::Gateway { .. } | AppError::Http(_) => io::ErrorKind::ConnectionAborted,
            AppError::Image(_) => io::ErrorKind::InvalidData,
            AppError::ClipboardError(_) | AppError::Interaction(_) => io::ErrorKind::Other,
        }
    }
}
