//! Read-only projections of [`GameState`] for each screen.

use crate::engine::GameState;
use crate::feed::{welcome_action, Post, PostIcon};
use crate::types::VerificationType;
use serde::Serialize;

const DEFAULT_PLAN_TITLE: &str = "Reto de Bienestar";
const DEFAULT_FIRST_MISSION: &str = "Completar el primer paso";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Completed,
    Current,
    Locked,
}

impl MissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MissionStatus::Completed => "completed",
            MissionStatus::Current => "current",
            MissionStatus::Locked => "locked",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MissionRow {
    pub level: u32,
    pub title: String,
    pub description: String,
    pub status: MissionStatus,
    pub verification: VerificationType,
    pub reward_xp: u32,
    pub reward_coins: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub user: String,
    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,
    pub percent_to_next: u32,
    pub coins: u64,
    pub plan_title: Option<String>,
    pub plan_description: Option<String>,
    pub missions: Vec<MissionRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub user: String,
    pub level: u32,
    pub coins: u64,
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommunityEntry {
    pub user: String,
    pub text: String,
    pub icon: PostIcon,
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// The plan's missions in level order, with the first incomplete one
/// marked current.
pub fn missions(state: &GameState) -> Vec<MissionRow> {
    let Some(plan) = state.plan.as_ref() else {
        return Vec::new();
    };
    let current = plan.current_mission().map(|m| m.level);
    let mut rows: Vec<MissionRow> = plan
        .missions
        .iter()
        .map(|m| MissionRow {
            level: m.level,
            title: m.title.clone(),
            description: m.description.clone(),
            status: if m.completed {
                MissionStatus::Completed
            } else if Some(m.level) == current {
                MissionStatus::Current
            } else {
                MissionStatus::Locked
            },
            verification: m.verification_type,
            reward_xp: m.reward_xp,
            reward_coins: m.reward_coins,
        })
        .collect();
    rows.sort_by_key(|r| r.level);
    rows
}

pub fn dashboard(state: &GameState) -> DashboardView {
    let p = &state.progression;
    DashboardView {
        user: state.display_name().to_string(),
        level: p.level,
        xp: p.xp,
        xp_to_next_level: p.xp_to_next_level,
        percent_to_next: p.percent_to_next(),
        coins: p.coins,
        plan_title: state.plan.as_ref().map(|pl| pl.title.clone()),
        plan_description: state.plan.as_ref().map(|pl| pl.description.clone()),
        missions: missions(state),
    }
}

pub fn profile(state: &GameState) -> ProfileView {
    ProfileView {
        user: state.display_name().to_string(),
        level: state.progression.level,
        coins: state.progression.coins,
        completed: state.plan.as_ref().map_or(0, |p| p.completed_count()),
        total: state.plan.as_ref().map_or(0, |p| p.missions.len()),
    }
}

/// Live feed, newest first, followed by the user's welcome card.
pub fn community(state: &GameState) -> Vec<CommunityEntry> {
    let user = state.display_name();
    let plan_title = state
        .plan
        .as_ref()
        .map(|p| p.title.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_PLAN_TITLE);
    let first = state
        .plan
        .as_ref()
        .and_then(|p| p.missions.first())
        .map(|m| m.title.as_str())
        .unwrap_or(DEFAULT_FIRST_MISSION);

    let welcome = welcome_action(user, plan_title, first);
    let mut entries: Vec<CommunityEntry> = state
        .feed
        .posts()
        .filter(|p| p.action != welcome)
        .map(entry)
        .collect();
    entries.push(CommunityEntry {
        user: user.to_string(),
        text: welcome,
        icon: PostIcon::Profile,
    });
    entries
}

fn entry(post: &Post) -> CommunityEntry {
    CommunityEntry {
        user: post.user.clone(),
        text: post.action.clone(),
        icon: post.icon,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
