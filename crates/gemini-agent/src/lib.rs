//! Generative-language client and mission-plan synthesis for WYD.
//!
//! # Architecture
//!
//! ```text
//! Vec<wyd_core::onboarding::Message>
//!     │
//!     ▼
//! synth::to_contents   ← strict user/model alternation, inline attachments
//!     │
//!     ▼
//! Generator trait      ← GeminiClient (reqwest) or an in-process double
//!     │
//!     ▼
//! Synthesizer          ← text replies with apology fallback,
//!                        schema-constrained MissionPlan with fallback plan
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use gemini_agent::{GeminiClient, Synthesizer};
//! use wyd_core::config::Config;
//!
//! let config = Config::default();
//! let client = GeminiClient::from_config(&config.gemini, api_key)?;
//! let synth = Synthesizer::new(client, &config.gemini);
//!
//! let reply = synth.onboarding_reply(onboarding.messages()).await;
//! let result = synth.synthesize_plan(onboarding.messages()).await;
//! assert_eq!(result.plan.missions.len(), 5);
//! ```

pub mod attachment;
pub mod client;
pub mod error;
pub mod generator;
pub mod prompts;
pub mod synth;
pub mod types;

#[cfg(test)]
mod tests;

pub use client::GeminiClient;
pub use error::GeminiAgentError;
pub use generator::{generate_structured, generate_text, Generator};
pub use synth::{AssistantChat, PlanSource, PlanSynthesis, Synthesizer};
pub use types::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, Part, Role,
};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, GeminiAgentError>;
