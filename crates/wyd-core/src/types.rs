use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// VerificationType
// ---------------------------------------------------------------------------

/// How a mission gets verified as done.
///
/// Only `manual` missions can be confirmed directly by the user; they pay
/// XP only. `focus_mode` missions complete when a focus session expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationType {
    #[default]
    Manual,
    FocusMode,
    Api,
    Social,
}

impl VerificationType {
    pub fn all() -> &'static [VerificationType] {
        &[
            VerificationType::Manual,
            VerificationType::FocusMode,
            VerificationType::Api,
            VerificationType::Social,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VerificationType::Manual => "manual",
            VerificationType::FocusMode => "focus_mode",
            VerificationType::Api => "api",
            VerificationType::Social => "social",
        }
    }

    /// Whether a mission of this kind may carry a coin reward.
    pub fn pays_coins(self) -> bool {
        !matches!(self, VerificationType::Manual)
    }
}

impl fmt::Display for VerificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VerificationType {
    type Err = crate::error::WydError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(VerificationType::Manual),
            "focus_mode" => Ok(VerificationType::FocusMode),
            "api" => Ok(VerificationType::Api),
            "social" => Ok(VerificationType::Social),
            other => Err(crate::error::WydError::UnknownVerification(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Sender
// ---------------------------------------------------------------------------

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "ai",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LevelUpPolicy
// ---------------------------------------------------------------------------

/// How many level thresholds a single reward may cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelUpPolicy {
    /// At most one level-up per completion; leftover XP may exceed the new
    /// threshold until the next completion.
    #[default]
    Single,
    /// Keep levelling up while XP covers the threshold.
    Cascade,
}

impl LevelUpPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            LevelUpPolicy::Single => "single",
            LevelUpPolicy::Cascade => "cascade",
        }
    }
}

impl fmt::Display for LevelUpPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LevelUpPolicy {
    type Err = crate::error::WydError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(LevelUpPolicy::Single),
            "cascade" => Ok(LevelUpPolicy::Cascade),
            other => Err(crate::error::WydError::UnknownLevelUpPolicy(
                other.to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
