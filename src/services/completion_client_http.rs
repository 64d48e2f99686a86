//! Chat-completion gateway implementation using reqwest.

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use url::Url;

use crate::domain::prompt::CompletionRequest;
use crate::domain::{AppError, GatewayConfig};
use crate::ports::CompletionGateway;

const COMPLETIONS_PATH: &str = "chat/completions";

/// HTTP client for an OpenAI-compatible chat-completion endpoint.
#[derive(Clone)]
pub struct HttpCompletionGateway {
    api_key: Option<String>,
    endpoint: Url,
    client: Client,
}

impl std::fmt::Debug for HttpCompletionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCompletionGateway")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpCompletionGateway {
    /// Create a gateway for the configured base URL. The key is optional.
    pub fn new(api_key: Option<String>, config: &GatewayConfig) -> Result<Self, AppError> {
        let client = build_client(config)?;
        Ok(Self { api_key, endpoint: endpoint_url(&config.base_url, COMPLETIONS_PATH)?, client })
    }

    /// Create with the key read from the configured environment variable.
    pub fn from_env_with_config(config: &GatewayConfig) -> Result<Self, AppError> {
        Self::new(config.api_key(|name| std::env::var(name).ok()), config)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    #[serde(default)]
    message: Option<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionGateway for HttpCompletionGateway {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AppError> {
        let mut builder = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", key));
        }

        let response =
            builder.send().map_err(|e| AppError::Http(format!("Request failed: {}", e)))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "completion request rejected");
            return Err(AppError::Gateway { status: status.as_u16(), body });
        }

        let api_response: ApiResponse = response
            .json()
            .map_err(|e| AppError::Http(format!("Failed to parse response: {}", e)))?;

        Ok(api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default())
    }
}

pub(crate) fn build_client(config: &GatewayConfig) -> Result<Client, AppError> {
    Client::builder()
        .timeout(config.timeout())
        .build()
        .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

/// Join `path` onto `base`, keeping any path prefix the base already has.
pub(crate) fn endpoint_url(base: &Url, path: &str) -> Result<Url, AppError> {
    let joined = format!("{}/{}", base.as_str().trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse(&joined)
        .map_err(|e| AppError::InvalidConfig(format!("Invalid endpoint '{}': {}", joined, e)))
}
