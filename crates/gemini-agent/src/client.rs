use std::time::Duration;

use wyd_core::config::GeminiConfig;

use crate::generator::Generator;
use crate::types::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use crate::{GeminiAgentError, Result};

// ─── GeminiClient ─────────────────────────────────────────────────────────

/// HTTP client for the `generateContent` endpoint.
///
/// ```rust,ignore
/// let client = GeminiClient::new(api_key, "https://generativelanguage.googleapis.com", None)?;
/// let reply = generate_text(&client, "gemini-2.5-flash", contents, None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl GeminiClient {
    /// Build a client. `timeout` of `None` keeps reqwest's default.
    pub fn new(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeminiAgentError::MissingApiKey);
        }
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            http: builder.build()?,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &GeminiConfig, api_key: impl Into<String>) -> Result<Self> {
        Self::new(
            api_key,
            config.api_base.clone(),
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.api_base)
    }
}

impl Generator for GeminiClient {
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.endpoint(model);
        tracing::debug!(model, turns = request.contents.len(), "generateContent");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| match e.error.status {
                    Some(s) => format!("{s}: {}", e.error.message),
                    None => e.error.message,
                })
                .unwrap_or(body);
            tracing::warn!(status = status.as_u16(), %message, "generateContent failed");
            return Err(GeminiAgentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|source| GeminiAgentError::Parse { body, source })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
