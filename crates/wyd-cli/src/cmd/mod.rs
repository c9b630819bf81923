pub mod config;
pub mod play;
pub mod plan;
pub mod schema;
pub mod simulate;

use anyhow::Context as _;
use gemini_agent::{
    GeminiAgentError, GeminiClient, GenerateContentRequest, GenerateContentResponse, Generator,
    Synthesizer,
};
use std::future::Future;
use std::path::PathBuf;
use wyd_core::config::Config;

/// Global options shared by every subcommand.
pub struct Context {
    pub config_path: Option<PathBuf>,
    pub api_key: Option<String>,
    pub json: bool,
}

impl Context {
    pub fn load_config(&self) -> anyhow::Result<Config> {
        Config::resolve(self.config_path.as_deref()).context("failed to load config")
    }
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// The real client, or a stand-in that fails every call when no API key is
/// configured so the session degrades to apologies and the rescue plan.
pub enum Backend {
    Gemini(GeminiClient),
    Offline,
}

impl Generator for Backend {
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> gemini_agent::Result<GenerateContentResponse> {
        match self {
            Backend::Gemini(client) => client.generate(model, request).await,
            Backend::Offline => Err(GeminiAgentError::MissingApiKey),
        }
    }
}

pub fn synthesizer(ctx: &Context, config: &Config) -> anyhow::Result<Synthesizer<Backend>> {
    let backend = match ctx.api_key.as_deref() {
        Some(key) => Backend::Gemini(
            GeminiClient::from_config(&config.gemini, key)
                .context("failed to build generative-language client")?,
        ),
        None => {
            tracing::warn!("no API key configured; running offline");
            Backend::Offline
        }
    };
    Ok(Synthesizer::new(backend, &config.gemini))
}

/// Run a future to completion on a fresh runtime.
pub fn block_on<F: Future>(fut: F) -> anyhow::Result<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    Ok(rt.block_on(fut))
}
