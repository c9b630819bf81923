use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiAgentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {source}\n  body: {body}")]
    Parse {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response carried no text (reason: {0})")]
    EmptyResponse(String),

    #[error("Generated plan rejected: {0}")]
    InvalidPlan(String),

    #[error("No API key: set GEMINI_API_KEY or pass --api-key")]
    MissingApiKey,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
