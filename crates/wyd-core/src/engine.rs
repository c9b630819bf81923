//! Mission completion rules.
//!
//! All progression changes go through [`apply_completion`] (or its
//! value-returning twin [`complete_mission`]) and [`apply_uncompletion`].
//! Every call reports what happened through an explicit outcome; lookups
//! that match nothing leave the state untouched.

use crate::feed::{completion_action, Feed, PostIcon};
use crate::mission::MissionPlan;
use crate::progression::Progression;
use crate::types::LevelUpPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Name shown for a user who never gave one.
pub const DEFAULT_USER_NAME: &str = "Aventurero";

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rules {
    pub level_up: LevelUpPolicy,
    /// Allow a completed mission to be marked incomplete again. Rewards are
    /// never revoked and never granted twice.
    pub allow_uncomplete: bool,
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// Everything the screens read: who is playing, their plan, their stats
/// and the activity feed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameState {
    pub user_name: Option<String>,
    pub plan: Option<MissionPlan>,
    pub progression: Progression,
    pub feed: Feed,
    /// Levels whose reward has already been paid out.
    #[serde(default)]
    pub rewarded: BTreeSet<u32>,
}

impl GameState {
    pub fn new(progression: Progression) -> Self {
        Self {
            progression,
            ..Default::default()
        }
    }

    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or(DEFAULT_USER_NAME)
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub level: u32,
    pub title: String,
    pub xp: u32,
    pub coins: u32,
    pub levels_gained: u32,
    /// The mission that is now current, if any remain.
    pub next_mission: Option<u32>,
    pub post_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Completion {
    Completed(Reward),
    /// Completed again after being reopened; its reward was already paid.
    Restored { level: u32 },
    AlreadyCompleted { level: u32 },
    NotFound { level: u32 },
    NoPlan,
}

impl Completion {
    pub fn is_noop(&self) -> bool {
        matches!(
            self,
            Completion::AlreadyCompleted { .. } | Completion::NotFound { .. } | Completion::NoPlan
        )
    }

    pub fn reward(&self) -> Option<&Reward> {
        match self {
            Completion::Completed(r) => Some(r),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Uncompletion {
    Reopened { level: u32 },
    NotCompleted { level: u32 },
    NotAllowed { level: u32 },
    NotFound { level: u32 },
    NoPlan,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Complete the mission at `level`, returning the new state and the outcome.
/// `state` is left as it was.
pub fn complete_mission(state: &GameState, level: u32, rules: &Rules) -> (GameState, Completion) {
    let mut next = state.clone();
    let outcome = apply_completion(&mut next, level, rules);
    (next, outcome)
}

/// Complete the mission at `level` in place.
///
/// The completed flag is checked before anything changes, so a reward is
/// paid at most once per mission.
pub fn apply_completion(state: &mut GameState, level: u32, rules: &Rules) -> Completion {
    let user = state.display_name().to_string();
    let Some(plan) = state.plan.as_mut() else {
        tracing::warn!(level, "completion ignored: no mission plan");
        return Completion::NoPlan;
    };
    let Some(mission) = plan.find_mut(level) else {
        tracing::warn!(level, "completion ignored: no mission at this level");
        return Completion::NotFound { level };
    };
    if mission.completed {
        tracing::debug!(level, "completion ignored: already completed");
        return Completion::AlreadyCompleted { level };
    }

    mission.completed = true;
    if !state.rewarded.insert(level) {
        tracing::debug!(level, "mission completed again; reward already paid");
        return Completion::Restored { level };
    }

    let (title, xp, coins) = (
        mission.title.clone(),
        mission.reward_xp,
        mission.reward_coins,
    );
    let next_mission = plan.current_mission().map(|m| m.level);

    let levels_gained = state.progression.grant(xp, coins, rules.level_up);
    let post_id = state
        .feed
        .publish(&user, completion_action(&user, &title), PostIcon::Mission);

    tracing::info!(
        level,
        xp,
        coins,
        levels_gained,
        player_level = state.progression.level,
        "mission completed"
    );

    Completion::Completed(Reward {
        level,
        title,
        xp,
        coins,
        levels_gained,
        next_mission,
        post_id,
    })
}

/// Mark the mission at `level` incomplete, if the rules allow it.
pub fn apply_uncompletion(state: &mut GameState, level: u32, rules: &Rules) -> Uncompletion {
    let Some(plan) = state.plan.as_mut() else {
        tracing::warn!(level, "uncomplete ignored: no mission plan");
        return Uncompletion::NoPlan;
    };
    let Some(mission) = plan.find_mut(level) else {
        tracing::warn!(level, "uncomplete ignored: no mission at this level");
        return Uncompletion::NotFound { level };
    };
    if !rules.allow_uncomplete {
        tracing::warn!(level, "uncomplete refused: disabled by configuration");
        return Uncompletion::NotAllowed { level };
    }
    if !mission.completed {
        return Uncompletion::NotCompleted { level };
    }
    mission.completed = false;
    tracing::info!(level, "mission reopened");
    Uncompletion::Reopened { level }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::{Mission, MissionPlan};
    use crate::types::VerificationType;

    fn plan() -> MissionPlan {
        MissionPlan {
            title: "La Senda del Atleta".into(),
            description: "Correr 5k".into(),
            missions: vec![
                Mission::new(1, "Caminar 20 minutos").with_rewards(20, 0),
                Mission::new(2, "Trotar 1 km")
                    .with_verification(VerificationType::FocusMode)
                    .with_rewards(30, 5),
                Mission::new(3, "Trotar 3 km")
                    .with_verification(VerificationType::FocusMode)
                    .with_rewards(50, 10),
                Mission::new(4, "Compartir progreso")
                    .with_verification(VerificationType::Social)
                    .with_rewards(40, 5),
                Mission::new(5, "Correr 5k").with_rewards(100, 0),
            ],
        }
    }

    fn state() -> GameState {
        let mut s = GameState::new(Progression::default());
        s.user_name = Some("Ana".into());
        s.plan = Some(plan());
        s
    }

    #[test]
    fn end_to_end_level_three_mission() {
        let mut s = state();
        s.progression = Progression {
            level: 2,
            xp: 90,
            xp_to_next_level: 100,
            coins: 7,
        };
        let (next, outcome) = complete_mission(&s, 3, &Rules::default());

        let reward = outcome.reward().unwrap();
        assert_eq!(reward.xp, 50);
        assert_eq!(reward.coins, 10);
        assert_eq!(reward.levels_gained, 1);
        assert_eq!(next.progression.level, 3);
        assert_eq!(next.progression.xp, 40);
        assert_eq!(next.progression.xp_to_next_level, 150);
        assert_eq!(next.progression.coins, 17);
        assert_eq!(next.feed.len(), 1);
        assert_eq!(
            next.feed.latest().unwrap().action,
            "Ana ha completado la misión: Trotar 3 km!"
        );
        assert!(next.plan.as_ref().unwrap().find(3).unwrap().completed);

        // The input state is untouched.
        assert_eq!(s.progression.xp, 90);
        assert!(s.feed.is_empty());
    }

    #[test]
    fn second_completion_does_not_double_grant() {
        let mut s = state();
        let rules = Rules::default();
        assert!(matches!(
            apply_completion(&mut s, 1, &rules),
            Completion::Completed(_)
        ));
        let snapshot = s.progression.clone();
        let outcome = apply_completion(&mut s, 1, &rules);
        assert_eq!(outcome, Completion::AlreadyCompleted { level: 1 });
        assert_eq!(s.progression, snapshot);
        assert_eq!(s.feed.len(), 1);
    }

    #[test]
    fn unknown_level_is_noop() {
        let mut s = state();
        let before = s.progression.clone();
        let outcome = apply_completion(&mut s, 42, &Rules::default());
        assert_eq!(outcome, Completion::NotFound { level: 42 });
        assert!(outcome.is_noop());
        assert_eq!(s.progression, before);
        assert!(s.feed.is_empty());
    }

    #[test]
    fn absent_plan_is_noop() {
        let mut s = GameState::default();
        assert_eq!(apply_completion(&mut s, 1, &Rules::default()), Completion::NoPlan);
        assert_eq!(s.progression, Progression::default());
    }

    #[test]
    fn xp_and_coins_never_decrease() {
        let mut s = state();
        let rules = Rules::default();
        let mut last = (0u64, s.progression.coins);
        for level in [2, 1, 5, 3, 1, 4, 9, 2] {
            apply_completion(&mut s, level, &rules);
            // total XP ever earned = sum of thresholds passed + current xp
            let p = &s.progression;
            let mut total = p.xp;
            let mut threshold = 100u64;
            for _ in 1..p.level {
                total += threshold;
                threshold = crate::progression::next_threshold(threshold);
            }
            assert!(total >= last.0);
            assert!(p.coins >= last.1);
            last = (total, p.coins);
        }
        assert_eq!(s.rewarded.len(), 5);
    }

    #[test]
    fn next_mission_is_reported() {
        let mut s = state();
        let outcome = apply_completion(&mut s, 1, &Rules::default());
        assert_eq!(outcome.reward().unwrap().next_mission, Some(2));
    }

    #[test]
    fn uncomplete_refused_by_default() {
        let mut s = state();
        let rules = Rules::default();
        apply_completion(&mut s, 1, &rules);
        assert_eq!(
            apply_uncompletion(&mut s, 1, &rules),
            Uncompletion::NotAllowed { level: 1 }
        );
        assert!(s.plan.as_ref().unwrap().find(1).unwrap().completed);
    }

    #[test]
    fn reopened_mission_is_not_paid_twice() {
        let mut s = state();
        let rules = Rules {
            allow_uncomplete: true,
            ..Default::default()
        };
        apply_completion(&mut s, 5, &rules);
        let after_first = s.progression.clone();

        assert_eq!(
            apply_uncompletion(&mut s, 5, &rules),
            Uncompletion::Reopened { level: 5 }
        );
        // Reopening keeps the reward.
        assert_eq!(s.progression, after_first);

        assert_eq!(
            apply_completion(&mut s, 5, &rules),
            Completion::Restored { level: 5 }
        );
        assert_eq!(s.progression, after_first);
        assert_eq!(s.feed.len(), 1);
    }

    #[test]
    fn uncomplete_of_open_mission_reports_it() {
        let mut s = state();
        let rules = Rules {
            allow_uncomplete: true,
            ..Default::default()
        };
        assert_eq!(
            apply_uncompletion(&mut s, 2, &rules),
            Uncompletion::NotCompleted { level: 2 }
        );
    }

    #[test]
    fn cascade_rules_apply_through_engine() {
        let mut s = state();
        s.plan.as_mut().unwrap().find_mut(5).unwrap().reward_xp = 400;
        let rules = Rules {
            level_up: LevelUpPolicy::Cascade,
            ..Default::default()
        };
        let outcome = apply_completion(&mut s, 5, &rules);
        assert_eq!(outcome.reward().unwrap().levels_gained, 2);
        assert_eq!(s.progression.level, 3);
    }
}
