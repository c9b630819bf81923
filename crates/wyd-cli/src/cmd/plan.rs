use anyhow::Context as _;
use gemini_agent::PlanSource;
use std::path::Path;
use wyd_core::onboarding::Message;

use super::{block_on, synthesizer, Context};
use crate::output::print_json;
use crate::render;

/// Synthesize a plan from a saved conversation. Generation failures are not
/// errors: the rescue plan is printed instead and a warning goes to stderr.
pub fn run(ctx: &Context, transcript: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(transcript)
        .with_context(|| format!("failed to read {}", transcript.display()))?;
    let history: Vec<Message> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON message list", transcript.display()))?;

    let config = ctx.load_config()?;
    let synth = synthesizer(ctx, &config)?;
    let result = block_on(synth.synthesize_plan(&history))?;

    if let PlanSource::Fallback { reason } = &result.source {
        eprintln!("warning: plan generation failed ({reason}); using the rescue plan");
    }

    if ctx.json {
        print_json(&result)?;
    } else {
        render::plan(&result.plan);
    }
    Ok(())
}
