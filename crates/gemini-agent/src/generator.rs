use std::future::Future;

use serde::de::DeserializeOwned;

use crate::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::{GeminiAgentError, Result};

// ─── Generator ────────────────────────────────────────────────────────────

/// The generative-language capability, independent of transport.
///
/// [`crate::GeminiClient`] talks to the real API; tests provide in-process
/// implementations.
pub trait Generator {
    fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> impl Future<Output = Result<GenerateContentResponse>> + Send;
}

/// Free-text generation: returns the first candidate's text.
pub async fn generate_text<G: Generator>(
    generator: &G,
    model: &str,
    contents: Vec<Content>,
    system_instruction: Option<Content>,
) -> Result<String> {
    let request = GenerateContentRequest {
        contents,
        system_instruction,
        generation_config: None,
    };
    let response = generator.generate(model, &request).await?;
    response
        .text()
        .ok_or_else(|| GeminiAgentError::EmptyResponse(response.empty_reason()))
}

/// Schema-constrained generation: asks for JSON matching `schema` and
/// deserializes it into `T`.
pub async fn generate_structured<G: Generator, T: DeserializeOwned>(
    generator: &G,
    model: &str,
    contents: Vec<Content>,
    schema: serde_json::Value,
) -> Result<T> {
    let request = GenerateContentRequest {
        contents,
        system_instruction: None,
        generation_config: Some(GenerationConfig::json(schema)),
    };
    let response = generator.generate(model, &request).await?;
    let body = response
        .text()
        .ok_or_else(|| GeminiAgentError::EmptyResponse(response.empty_reason()))?;
    serde_json::from_str(&body).map_err(|source| GeminiAgentError::Parse { body, source })
}

// ─── Test double ──────────────────────────────────────────────────────────


// ─── Tests ────────────────────────────────────────────────────────────────
