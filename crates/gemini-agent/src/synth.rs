use serde::Serialize;
use wyd_core::config::GeminiConfig;
use wyd_core::engine::GameState;
use wyd_core::mission::{fallback_plan, MissionPlan};
use wyd_core::onboarding::{alternate_turns, Message};
use wyd_core::types::Sender;

use crate::attachment::to_part;
use crate::generator::{generate_structured, generate_text, Generator};
use crate::prompts;
use crate::types::{Content, Part, Role};
use crate::{GeminiAgentError, Result};

// ─── History mapping ──────────────────────────────────────────────────────

/// Map chat messages to API turns. Consecutive turns from the same sender
/// collapse to the first one; attachments become inline parts.
pub fn to_contents(messages: &[Message]) -> Vec<Content> {
    alternate_turns(messages)
        .into_iter()
        .map(|msg| {
            let mut parts = vec![Part::text(msg.text.clone())];
            if let Some(file) = &msg.file {
                parts.push(to_part(file));
            }
            let role = match msg.sender {
                Sender::User => Role::User,
                Sender::Ai => Role::Model,
            };
            Content::new(role, parts)
        })
        .collect()
}

/// `to_contents` plus a final user instruction. When the history already
/// ends on a user turn the instruction joins that turn so roles still
/// alternate.
fn with_instruction(messages: &[Message], instruction: &str) -> Vec<Content> {
    let mut contents = to_contents(messages);
    match contents.last_mut() {
        Some(last) if last.role == Some(Role::User) => last.parts.push(Part::text(instruction)),
        _ => contents.push(Content::new(Role::User, vec![Part::text(instruction)])),
    }
    contents
}

// ─── PlanSynthesis ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanSource {
    Generated,
    /// The fixed rescue plan; `reason` says what went wrong.
    Fallback { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanSynthesis {
    pub plan: MissionPlan,
    pub source: PlanSource,
}

impl PlanSynthesis {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, PlanSource::Fallback { .. })
    }
}

// ─── AssistantChat ────────────────────────────────────────────────────────

/// Post-onboarding assistant conversation. Starts empty: the greeting is a
/// screen element, not a model turn.
#[derive(Debug, Clone, Default)]
pub struct AssistantChat {
    history: Vec<Message>,
}

impl AssistantChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

// ─── Synthesizer ──────────────────────────────────────────────────────────

/// Conversation-facing operations over a [`Generator`]. None of them
/// fail: remote errors become the fixed apology texts or the fallback
/// plan.
pub struct Synthesizer<G> {
    generator: G,
    conversational_model: String,
    json_model: String,
}

impl<G: Generator> Synthesizer<G> {
    pub fn new(generator: G, config: &GeminiConfig) -> Self {
        Self {
            generator,
            conversational_model: config.conversational_model.clone(),
            json_model: config.json_model.clone(),
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Next line from the onboarding guide.
    pub async fn onboarding_reply(&self, history: &[Message]) -> String {
        let result = generate_text(
            &self.generator,
            &self.conversational_model,
            to_contents(history),
            Some(Content::system(prompts::ONBOARDING_SYSTEM)),
        )
        .await;
        result.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "onboarding reply failed");
            prompts::ONBOARDING_APOLOGY.to_string()
        })
    }

    /// Reply from the in-app assistant, aware of the user's plan.
    pub async fn assistant_reply(&self, state: &GameState, history: &[Message]) -> String {
        self.try_assistant_reply(state, history)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "assistant reply failed");
                prompts::ASSISTANT_APOLOGY.to_string()
            })
    }

    /// Send `text` as the next user turn of `chat`. The exchange is kept
    /// only when the model answers; on failure the user turn is dropped and
    /// the apology is returned without entering the history.
    pub async fn assistant_turn(
        &self,
        chat: &mut AssistantChat,
        state: &GameState,
        text: &str,
    ) -> String {
        chat.history.push(Message::user(text));
        match self.try_assistant_reply(state, &chat.history).await {
            Ok(reply) => {
                chat.history.push(Message::ai(reply.clone()));
                reply
            }
            Err(e) => {
                tracing::warn!(error = %e, "assistant reply failed");
                chat.history.pop();
                prompts::ASSISTANT_APOLOGY.to_string()
            }
        }
    }

    async fn try_assistant_reply(&self, state: &GameState, history: &[Message]) -> Result<String> {
        generate_text(
            &self.generator,
            &self.conversational_model,
            to_contents(history),
            Some(Content::system(prompts::assistant_system(state))),
        )
        .await
    }

    /// Turn the onboarding conversation into a mission plan. Always returns
    /// a valid five-mission plan.
    pub async fn synthesize_plan(&self, history: &[Message]) -> PlanSynthesis {
        match self.try_synthesize(history).await {
            Ok(plan) => {
                tracing::info!(title = %plan.title, "mission plan generated");
                PlanSynthesis {
                    plan,
                    source: PlanSource::Generated,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "mission plan generation failed; using fallback");
                PlanSynthesis {
                    plan: fallback_plan(),
                    source: PlanSource::Fallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    async fn try_synthesize(&self, history: &[Message]) -> Result<MissionPlan> {
        let contents = with_instruction(history, prompts::PLAN_INSTRUCTION);
        let mut plan: MissionPlan = generate_structured(
            &self.generator,
            &self.json_model,
            contents,
            prompts::mission_plan_schema(),
        )
        .await?;
        plan.validate()
            .map_err(|e| GeminiAgentError::InvalidPlan(e.to_string()))?;
        let changed = plan.normalize();
        if changed > 0 {
            tracing::warn!(changed, "generated plan needed normalizing");
        }
        Ok(plan)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
