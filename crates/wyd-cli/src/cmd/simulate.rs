use anyhow::Context as _;
use serde::Serialize;
use std::path::Path;
use wyd_core::engine::{Completion, Uncompletion};
use wyd_core::feed::Post;
use wyd_core::mission::{fallback_plan, MissionPlan};
use wyd_core::session::{Confirmation, FocusTick, Session};
use wyd_core::types::VerificationType;
use wyd_core::views::{self, DashboardView};

use super::Context;
use crate::output::print_json;
use crate::render;

/// What to replay against a fresh session.
pub struct Steps<'a> {
    pub plan: Option<&'a Path>,
    pub name: &'a str,
    pub complete: &'a [u32],
    pub undo: &'a [u32],
    pub focus: u32,
}

#[derive(Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
enum Outcome {
    Complete { level: u32, result: Completion },
    /// The mission cannot be marked done by hand.
    NeedsVerification {
        level: u32,
        verification: VerificationType,
    },
    Undo { level: u32, result: Uncompletion },
    Focus { result: Option<Completion> },
}

#[derive(Serialize)]
struct Report<'a> {
    outcomes: &'a [Outcome],
    dashboard: DashboardView,
    feed: Vec<&'a Post>,
}

pub fn run(ctx: &Context, steps: Steps<'_>) -> anyhow::Result<()> {
    let config = ctx.load_config()?;
    let plan = load_plan(steps.plan)?;

    let mut session = Session::new(&config);
    session.login()?;
    session
        .complete_onboarding(steps.name, plan)
        .context("plan rejected")?;

    let mut outcomes = Vec::new();
    for &level in steps.complete {
        outcomes.push(match session.confirm_mission(level)? {
            Confirmation::Done(result) => Outcome::Complete { level, result },
            Confirmation::NeedsVerification {
                level,
                verification,
            } => Outcome::NeedsVerification {
                level,
                verification,
            },
        });
    }
    for &level in steps.undo {
        let result = session.uncomplete_mission(level)?;
        outcomes.push(Outcome::Undo { level, result });
    }
    for _ in 0..steps.focus {
        session.start_focus()?;
        let full = session
            .focus_timer()
            .map(|t| t.duration())
            .unwrap_or_default();
        if let FocusTick::Expired(result) = session.tick_focus(full) {
            outcomes.push(Outcome::Focus { result });
        }
    }

    let state = session.state();
    if ctx.json {
        print_json(&Report {
            outcomes: &outcomes,
            dashboard: views::dashboard(state),
            feed: state.feed.posts().collect(),
        })?;
        return Ok(());
    }

    for outcome in &outcomes {
        match outcome {
            Outcome::Complete { result, .. } => render::completion(result),
            Outcome::NeedsVerification {
                level,
                verification,
            } => println!(
                "Misión {level}: {}",
                render::verification_hint(*verification)
            ),
            Outcome::Undo { result, .. } => render::uncompletion(result),
            Outcome::Focus { result: Some(result) } => render::completion(result),
            Outcome::Focus { result: None } => {
                println!("Sesión de enfoque sin misiones de enfoque pendientes.")
            }
        }
    }
    println!();
    render::dashboard(&views::dashboard(state));
    Ok(())
}

fn load_plan(path: Option<&Path>) -> anyhow::Result<MissionPlan> {
    let Some(path) = path else {
        return Ok(fallback_plan());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut plan = MissionPlan::from_json(&raw)
        .with_context(|| format!("{} is not a valid mission plan", path.display()))?;
    plan.normalize();
    Ok(plan)
}
