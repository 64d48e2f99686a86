//! Image generation gateway implementation using reqwest.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use url::Url;

use super::completion_client_http::{build_client, endpoint_url};
use crate::domain::{AppError, GatewayConfig, ImageConfig};
use crate::ports::{ImageGateway, ImageRequest};

const IMAGES_PATH: &str = "images/generations";

/// HTTP client for an OpenAI-compatible image generation endpoint.
#[derive(Clone)]
pub struct HttpImageGateway {
    api_key: Option<String>,
    endpoint: Url,
    model: Option<String>,
    client: Client,
}

impl std::fmt::Debug for HttpImageGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpImageGateway")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpImageGateway {
    pub fn new(
        api_key: Option<String>,
        gateway: &GatewayConfig,
        image: &ImageConfig,
    ) -> Result<Self, AppError> {
        Ok(Self {
            api_key,
            endpoint: endpoint_url(&gateway.base_url, IMAGES_PATH)?,
            model: image.model.clone(),
            client: build_client(gateway)?,
        })
    }

    pub fn from_env_with_config(
        gateway: &GatewayConfig,
        image: &ImageConfig,
    ) -> Result<Self, AppError> {
        Self::new(gateway.api_key(|name| std::env::var(name).ok()), gateway, image)
    }
}

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    prompt: &'a str,
    size: &'a str,
    response_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    data: Vec<ApiImage>,
}

#[derive(Debug, Deserialize)]
struct ApiImage {
    #[serde(default)]
    b64_json: Option<String>,
}

impl ImageGateway for HttpImageGateway {
    fn generate(&self, request: &ImageRequest) -> Result<Vec<u8>, AppError> {
        let body = ApiRequest {
            model: self.model.as_deref(),
            prompt: &request.prompt,
            size: &request.size,
            response_format: "b64_json",
        };
        let mut builder = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", key));
        }

        let response =
            builder.send().map_err(|e| AppError::Http(format!("Request failed: {}", e)))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AppError::Gateway { status: status.as_u16(), body });
        }

        let api_response: ApiResponse = response
            .json()
            .map_err(|e| AppError::Http(format!("Failed to parse response: {}", e)))?;
        let encoded = api_response
            .data
            .into_iter()
            .next()
            .and_then(|image| image.b64_json)
            .ok_or_else(|| AppError::Http("No image data in response".into()))?;

        STANDARD
            .decode(encoded.trim())
            .map_err(|e| AppError::Http(format!("Invalid image payload: {}", e)))
    }
}
