/// Recommendation client
///
/// Sends a composed prompt to the hosted text-generation service and hands
/// back the text of the first content block. One outbound call per `send`,
/// no retries; concurrent calls are independent of each other.
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::Credential,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationClient: Send + Sync {
    /// Returns the raw model text for `prompt`
    async fn send(&self, prompt: &str, credential: &Credential) -> AppResult<String>;

    /// Client name for logging
    fn name(&self) -> &'static str;
}

/// Messages API client
#[derive(Clone)]
pub struct AnthropicClient {
    http_client: HttpClient,
    api_url: String,
    api_version: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    /// Builds the client with the configured request timeout
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http_client,
            api_url: config.anthropic_api_url.clone(),
            api_version: config.anthropic_version.clone(),
            model: config.anthropic_model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        }
    }
}

#[async_trait::async_trait]
impl RecommendationClient for AnthropicClient {
    async fn send(&self, prompt: &str, credential: &Credential) -> AppResult<String> {
        if credential.is_blank() {
            return Err(AppError::Auth("No API key configured".to_string()));
        }

        let response = self
            .http_client
            .post(&self.api_url)
            .header("x-api-key", credential.expose())
            .header("anthropic-version", &self.api_version)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Recommendation request rejected");
            return Err(map_status_error(status, &body));
        }

        let body = response.text().await?;
        let parsed: MessagesResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::MalformedResponse(format!("Unexpected response envelope: {}", e))
        })?;

        let text = first_block_text(parsed)?;

        tracing::debug!(chars = text.len(), model = %self.model, "Received model output");

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn first_block_text(response: MessagesResponse) -> AppResult<String> {
    response
        .content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .ok_or_else(|| {
            AppError::MalformedResponse("Response has no text in its first content block".into())
        })
}

/// A request that cannot be built here means the key is not a valid header value
fn map_send_error(err: reqwest::Error) -> AppError {
    if err.is_builder() {
        AppError::Auth("API key is not a valid header value".to_string())
    } else {
        AppError::from(err)
    }
}

/// 401/403 mean the key is bad; anything else is the service's problem
fn map_status_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| format!("status {}", status));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Auth(message),
        _ => AppError::ExternalApi(format!("Service returned {}: {}", status, message)),
    }
}
