//! Azure OpenAI chat-completions client.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tether_types::{ApiError, ChatRequest, ChatResponse};

/// The Azure OpenAI REST API version sent with every request.
const API_VERSION: &str = "2023-05-15";

/// Timeout for one completion request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for one Azure OpenAI chat-completions deployment.
///
/// Azure addresses the deployment in the URL and authenticates with an
/// `api-key` header, so the request body carries neither a model name
/// nor a bearer token.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    deployment: String,
}

impl ApiClient {
    /// Create a new API client for a deployment.
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let endpoint = endpoint.into();
        Ok(Self {
            http,
            api_key: api_key.into(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            deployment: deployment.into(),
        })
    }

    /// The chat-completions URL for this deployment.
    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, API_VERSION
        )
    }

    /// Send one chat-completion request and return the parsed response.
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let url = self.completions_url();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "api-key",
            HeaderValue::from_str(&self.api_key).map_err(|_| ApiError::Auth {
                message: "Invalid API key format".into(),
            })?,
        );

        tracing::debug!("POST {url}");

        let response = self
            .http
            .post(&url)
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout
                } else {
                    ApiError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(status.as_u16(), &body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;

        if let Some(usage) = &parsed.usage {
            tracing::debug!(
                "Completion used {} prompt + {} completion tokens",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        Ok(parsed)
    }
}

/// Classify an HTTP error response into a typed ApiError.
fn classify_error(status: u16, body: &str) -> ApiError {
    // Try to parse as JSON error response
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: Option<ErrorDetail>,
    }
    #[derive(serde::Deserialize)]
    struct ErrorDetail {
        message: Option<String>,
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.to_string());

    match status {
        400 => ApiError::BadRequest { message },
        401 | 403 => ApiError::Auth { message },
        404 => ApiError::NotFound { message },
        429 => ApiError::RateLimited { message },
        _ => ApiError::Server { status, message },
    }
}
