use crate::engine::{apply_completion, Completion, GameState, Rules};
use crate::types::VerificationType;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ---------------------------------------------------------------------------
// FocusTimer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    Idle,
    Running,
    Expired,
}

/// Single-shot countdown for a focus session.
///
/// The caller drives it with [`FocusTimer::tick`]; reaching zero fires
/// exactly once. [`FocusTimer::cancel`] stops and rewinds it.
#[derive(Debug, Clone)]
pub struct FocusTimer {
    duration: Duration,
    remaining: Duration,
    state: TimerState,
}

impl FocusTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            remaining: duration,
            state: TimerState::Idle,
        }
    }

    pub fn from_minutes(minutes: u32) -> Self {
        Self::new(Duration::from_secs(u64::from(minutes) * 60))
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Start counting down. Returns `false` if already running or expired.
    pub fn start(&mut self) -> bool {
        if self.state != TimerState::Idle {
            return false;
        }
        self.state = TimerState::Running;
        true
    }

    /// Stop and rewind to the full duration.
    pub fn cancel(&mut self) {
        self.state = TimerState::Idle;
        self.remaining = self.duration;
    }

    /// Advance the countdown. Returns `true` on the tick that reaches zero.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(elapsed);
        if self.remaining.is_zero() {
            self.state = TimerState::Expired;
            return true;
        }
        false
    }

    /// `MM:SS` of the remaining time.
    pub fn display(&self) -> String {
        let secs = self.remaining.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

// ---------------------------------------------------------------------------
// Expiry
// ---------------------------------------------------------------------------

/// Complete the first pending `focus_mode` mission, if there is one.
///
/// Returns `None` and leaves `state` untouched when nothing is waiting on a
/// focus session.
pub fn complete_focus_mission(state: &mut GameState, rules: &Rules) -> Option<Completion> {
    let level = state
        .plan
        .as_ref()?
        .first_pending(VerificationType::FocusMode)?
        .level;
    Some(apply_completion(state, level, rules))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
