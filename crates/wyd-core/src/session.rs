use crate::config::Config;
use crate::engine::{
    apply_completion, apply_uncompletion, Completion, GameState, Rules, Uncompletion,
};
use crate::error::{Result, WydError};
use crate::feed::{welcome_action, PostIcon};
use crate::focus::{complete_focus_mission, FocusTimer};
use crate::mission::MissionPlan;
use crate::onboarding::Onboarding;
use crate::progression::Progression;
use crate::types::VerificationType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    LoggedOut,
    Onboarding,
    Playing,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::LoggedOut => "logged out",
            Stage::Onboarding => "onboarding",
            Stage::Playing => "playing",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the user confirming a mission by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Done(Completion),
    /// Only `manual` missions can be confirmed directly; this one needs its
    /// own verification (a focus session, an integration, ...).
    NeedsVerification {
        level: u32,
        verification: VerificationType,
    },
}

/// What a focus-timer tick produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusTick {
    /// No focus session is running.
    Inactive,
    Running { remaining: Duration },
    /// The session ran out; carries the completion it triggered, if any.
    Expired(Option<Completion>),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The single owner of session state. Screens read through [`Session::state`];
/// every change goes through a method here.
#[derive(Debug)]
pub struct Session {
    stage: Stage,
    rules: Rules,
    starting: Progression,
    focus_minutes: u32,
    state: GameState,
    onboarding: Option<Onboarding>,
    focus: Option<FocusTimer>,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let starting = config.starting_progression();
        Self {
            stage: Stage::LoggedOut,
            rules: config.rules(),
            state: GameState::new(starting.clone()),
            starting,
            focus_minutes: config.focus.duration_minutes,
            onboarding: None,
            focus: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn focus_timer(&self) -> Option<&FocusTimer> {
        self.focus.as_ref()
    }

    fn require(&self, stage: Stage, action: &str) -> Result<()> {
        if self.stage != stage {
            return Err(WydError::InvalidStage {
                action: action.to_string(),
                stage: self.stage.to_string(),
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Start a fresh session with default progression and begin onboarding.
    pub fn login(&mut self) -> Result<&mut Onboarding> {
        self.require(Stage::LoggedOut, "login")?;
        self.state = GameState::new(self.starting.clone());
        self.stage = Stage::Onboarding;
        tracing::info!("session started");
        Ok(self.onboarding.insert(Onboarding::new()))
    }

    pub fn onboarding(&self) -> Option<&Onboarding> {
        self.onboarding.as_ref()
    }

    pub fn onboarding_mut(&mut self) -> Result<&mut Onboarding> {
        self.require(Stage::Onboarding, "chat")?;
        self.onboarding.as_mut().ok_or(WydError::InvalidStage {
            action: "chat".into(),
            stage: Stage::Onboarding.to_string(),
        })
    }

    /// Store the user's name and their plan and enter the main loop.
    pub fn complete_onboarding(&mut self, name: impl Into<String>, plan: MissionPlan) -> Result<()> {
        self.require(Stage::Onboarding, "complete onboarding")?;
        plan.validate()?;

        let name: String = name.into();
        let name = name.trim();
        self.state.user_name = (!name.is_empty()).then(|| name.to_string());

        let user = self.state.display_name().to_string();
        let first = plan
            .missions
            .first()
            .map(|m| m.title.clone())
            .unwrap_or_default();
        self.state.feed.publish(
            &user,
            welcome_action(&user, &plan.title, &first),
            PostIcon::Profile,
        );
        tracing::info!(user = %user, plan = %plan.title, "onboarding complete");

        self.state.plan = Some(plan);
        self.onboarding = None;
        self.stage = Stage::Playing;
        Ok(())
    }

    /// Drop everything: name, plan, progression, feed and any focus session.
    pub fn logout(&mut self) {
        self.state = GameState::new(self.starting.clone());
        self.onboarding = None;
        self.focus = None;
        self.stage = Stage::LoggedOut;
        tracing::info!("session cleared");
    }

    // -----------------------------------------------------------------------
    // Missions
    // -----------------------------------------------------------------------

    pub fn complete_mission(&mut self, level: u32) -> Result<Completion> {
        self.require(Stage::Playing, "complete mission")?;
        Ok(apply_completion(&mut self.state, level, &self.rules))
    }

    /// Complete a mission on the user's word. Non-manual missions are
    /// refused and left for their own verification path.
    pub fn confirm_mission(&mut self, level: u32) -> Result<Confirmation> {
        self.require(Stage::Playing, "confirm mission")?;
        let verification = self
            .state
            .plan
            .as_ref()
            .and_then(|p| p.find(level))
            .map(|m| m.verification_type);
        match verification {
            Some(v) if v != VerificationType::Manual => Ok(Confirmation::NeedsVerification {
                level,
                verification: v,
            }),
            _ => Ok(Confirmation::Done(apply_completion(
                &mut self.state,
                level,
                &self.rules,
            ))),
        }
    }

    pub fn uncomplete_mission(&mut self, level: u32) -> Result<Uncompletion> {
        self.require(Stage::Playing, "reopen mission")?;
        Ok(apply_uncompletion(&mut self.state, level, &self.rules))
    }

    // -----------------------------------------------------------------------
    // Focus mode
    // -----------------------------------------------------------------------

    /// Start a focus session. Returns `false` if one is already running.
    pub fn start_focus(&mut self) -> Result<bool> {
        self.require(Stage::Playing, "start focus")?;
        let minutes = self.focus_minutes;
        let timer = self
            .focus
            .get_or_insert_with(|| FocusTimer::from_minutes(minutes));
        let started = timer.start();
        if started {
            tracing::info!(minutes, "focus session started");
        }
        Ok(started)
    }

    /// Stop the running focus session, if any.
    pub fn cancel_focus(&mut self) {
        if self.focus.take().is_some() {
            tracing::info!("focus session cancelled");
        }
    }

    /// Advance the focus session. On expiry the session closes and the
    /// first pending `focus_mode` mission is completed.
    pub fn tick_focus(&mut self, elapsed: Duration) -> FocusTick {
        let Some(timer) = self.focus.as_mut() else {
            return FocusTick::Inactive;
        };
        if !timer.tick(elapsed) {
            return if timer.is_running() {
                FocusTick::Running {
                    remaining: timer.remaining(),
                }
            } else {
                FocusTick::Inactive
            };
        }

        self.focus = None;
        let outcome = complete_focus_mission(&mut self.state, &self.rules);
        if outcome.is_none() {
            tracing::info!("focus session finished with no focus mission pending");
        }
        FocusTick::Expired(outcome)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::{fallback_plan, Mission};
    use crate::types::VerificationType;

    fn focus_plan() -> MissionPlan {
        let mut plan = fallback_plan();
        plan.missions[2] = Mission::new(3, "Estudiar 1 hora")
            .with_verification(VerificationType::FocusMode)
            .with_rewards(50, 10);
        plan
    }

    fn playing(config: &Config) -> Session {
        let mut s = Session::new(config);
        s.login().unwrap();
        s.complete_onboarding("Ana", focus_plan()).unwrap();
        s
    }

    #[test]
    fn lifecycle_walks_stages() {
        let mut s = Session::new(&Config::default());
        assert_eq!(s.stage(), Stage::LoggedOut);
        assert!(s.complete_mission(1).is_err());

        s.login().unwrap();
        assert_eq!(s.stage(), Stage::Onboarding);
        assert!(s.login().is_err());

        s.complete_onboarding("Ana", fallback_plan()).unwrap();
        assert_eq!(s.stage(), Stage::Playing);
        assert_eq!(s.state().display_name(), "Ana");
        assert_eq!(s.state().feed.len(), 1);
        assert!(s.onboarding().is_none());
    }

    #[test]
    fn complete_onboarding_rejects_invalid_plan() {
        let mut s = Session::new(&Config::default());
        s.login().unwrap();
        let mut plan = fallback_plan();
        plan.missions.pop();
        assert!(matches!(
            s.complete_onboarding("Ana", plan),
            Err(WydError::InvalidPlan(_))
        ));
        assert_eq!(s.stage(), Stage::Onboarding);
    }

    #[test]
    fn blank_name_falls_back_to_default() {
        let mut s = Session::new(&Config::default());
        s.login().unwrap();
        s.complete_onboarding("  ", fallback_plan()).unwrap();
        assert_eq!(s.state().display_name(), "Aventurero");
    }

    #[test]
    fn logout_resets_everything() {
        let mut s = playing(&Config::default());
        s.complete_mission(1).unwrap();
        s.start_focus().unwrap();
        s.logout();
        assert_eq!(s.stage(), Stage::LoggedOut);
        assert!(s.state().plan.is_none());
        assert!(s.state().user_name.is_none());
        assert_eq!(s.state().progression, Progression::default());
        assert!(s.state().feed.is_empty());
        assert!(s.focus_timer().is_none());
        assert_eq!(s.tick_focus(Duration::from_secs(3600)), FocusTick::Inactive);
    }

    #[test]
    fn focus_expiry_completes_focus_mission() {
        let mut config = Config::default();
        config.focus.duration_minutes = 1;
        let mut s = playing(&config);

        assert!(s.start_focus().unwrap());
        assert!(!s.start_focus().unwrap());
        assert_eq!(
            s.tick_focus(Duration::from_secs(30)),
            FocusTick::Running {
                remaining: Duration::from_secs(30)
            }
        );
        let FocusTick::Expired(Some(outcome)) = s.tick_focus(Duration::from_secs(30)) else {
            panic!("expected expiry with a completion")
        };
        assert_eq!(outcome.reward().unwrap().level, 3);
        assert_eq!(s.state().progression.coins, 10);
        assert!(s.focus_timer().is_none());
    }

    #[test]
    fn cancelled_focus_never_fires() {
        let mut config = Config::default();
        config.focus.duration_minutes = 1;
        let mut s = playing(&config);
        s.start_focus().unwrap();
        s.cancel_focus();
        assert_eq!(s.tick_focus(Duration::from_secs(120)), FocusTick::Inactive);
        assert_eq!(s.state().progression.coins, 0);
    }

    #[test]
    fn focus_expiry_without_focus_mission() {
        let mut config = Config::default();
        config.focus.duration_minutes = 1;
        let mut s = Session::new(&config);
        s.login().unwrap();
        s.complete_onboarding("Ana", fallback_plan()).unwrap();
        s.start_focus().unwrap();
        let before = s.state().progression.clone();
        assert_eq!(s.tick_focus(Duration::from_secs(60)), FocusTick::Expired(None));
        assert_eq!(s.state().progression, before);
    }

    #[test]
    fn confirm_only_completes_manual_missions() {
        let mut s = playing(&Config::default());
        assert_eq!(
            s.confirm_mission(3).unwrap(),
            Confirmation::NeedsVerification {
                level: 3,
                verification: VerificationType::FocusMode
            }
        );
        assert_eq!(s.state().progression.xp, 0);

        let Confirmation::Done(outcome) = s.confirm_mission(1).unwrap() else {
            panic!("manual mission should complete")
        };
        assert_eq!(outcome.reward().unwrap().xp, 20);
        assert_eq!(
            s.confirm_mission(9).unwrap(),
            Confirmation::Done(Completion::NotFound { level: 9 })
        );
    }

    #[test]
    fn login_uses_configured_progression() {
        let mut config = Config::default();
        config.progression.starting_xp_to_next_level = 250;
        let mut s = Session::new(&config);
        s.login().unwrap();
        assert_eq!(s.state().progression.xp_to_next_level, 250);
    }
}
