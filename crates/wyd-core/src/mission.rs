use crate::error::{Result, WydError};
use crate::types::VerificationType;
use serde::{Deserialize, Serialize};

/// Number of missions every plan must carry.
pub const PLAN_LENGTH: usize = 5;

// ---------------------------------------------------------------------------
// Mission
// ---------------------------------------------------------------------------

/// A single step of a [`MissionPlan`].
///
/// Field names on the wire match the structured-response schema
/// (`verificationType`, `rewardXP`, `rewardCoins`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub level: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(rename = "verificationType", default)]
    pub verification_type: VerificationType,
    #[serde(rename = "rewardXP", default)]
    pub reward_xp: u32,
    #[serde(rename = "rewardCoins", default)]
    pub reward_coins: u32,
}

impl Mission {
    pub fn new(level: u32, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: String::new(),
            completed: false,
            verification_type: VerificationType::Manual,
            reward_xp: 0,
            reward_coins: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_verification(mut self, verification: VerificationType) -> Self {
        self.verification_type = verification;
        self
    }

    pub fn with_rewards(mut self, xp: u32, coins: u32) -> Self {
        self.reward_xp = xp;
        self.reward_coins = coins;
        self
    }
}

// ---------------------------------------------------------------------------
// MissionPlan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionPlan {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub missions: Vec<Mission>,
}

impl MissionPlan {
    /// Reject plans that do not have a title or do not carry exactly
    /// [`PLAN_LENGTH`] missions.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(WydError::InvalidPlan("missing title".into()));
        }
        if self.missions.len() != PLAN_LENGTH {
            return Err(WydError::InvalidPlan(format!(
                "expected {PLAN_LENGTH} missions, got {}",
                self.missions.len()
            )));
        }
        Ok(())
    }

    /// Parse and validate a plan from its JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let plan: MissionPlan = serde_json::from_str(text)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Bring a freshly generated plan into its starting shape: nothing is
    /// completed yet and `manual` missions pay no coins.
    ///
    /// Returns the number of missions that had to be changed.
    pub fn normalize(&mut self) -> usize {
        let mut changed = 0;
        for mission in &mut self.missions {
            let mut touched = false;
            if mission.completed {
                mission.completed = false;
                touched = true;
            }
            if !mission.verification_type.pays_coins() && mission.reward_coins != 0 {
                mission.reward_coins = 0;
                touched = true;
            }
            if touched {
                tracing::debug!(level = mission.level, "normalized generated mission");
                changed += 1;
            }
        }
        self.missions.sort_by_key(|m| m.level);
        changed
    }

    pub fn find(&self, level: u32) -> Option<&Mission> {
        self.missions.iter().find(|m| m.level == level)
    }

    pub fn find_mut(&mut self, level: u32) -> Option<&mut Mission> {
        self.missions.iter_mut().find(|m| m.level == level)
    }

    /// The lowest-level mission that is not yet completed.
    pub fn current_mission(&self) -> Option<&Mission> {
        self.missions
            .iter()
            .filter(|m| !m.completed)
            .min_by_key(|m| m.level)
    }

    /// A mission is unlocked once every lower-level mission is completed.
    pub fn is_unlocked(&self, level: u32) -> bool {
        self.missions
            .iter()
            .filter(|m| m.level < level)
            .all(|m| m.completed)
    }

    /// First incomplete mission of the given verification type, in plan order.
    pub fn first_pending(&self, verification: VerificationType) -> Option<&Mission> {
        self.missions
            .iter()
            .find(|m| m.verification_type == verification && !m.completed)
    }

    pub fn completed_count(&self) -> usize {
        self.missions.iter().filter(|m| m.completed).count()
    }

    pub fn is_finished(&self) -> bool {
        !self.missions.is_empty() && self.missions.iter().all(|m| m.completed)
    }

    /// Human-readable summary: "2/5 missions completed"
    pub fn summarize(&self) -> String {
        format!(
            "{}/{} missions completed",
            self.completed_count(),
            self.missions.len()
        )
    }
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

/// The plan handed out when synthesis fails for any reason.
///
/// Five honour-system missions, XP only.
pub fn fallback_plan() -> MissionPlan {
    let steps: [(&str, &str, u32); PLAN_LENGTH] = [
        (
            "Revisar la conexión con la IA",
            "Comprueba tu conexión a internet y vuelve a abrir la aplicación.",
            20,
        ),
        (
            "Reintentar la creación del plan",
            "Vuelve a la introducción y pide de nuevo tu plan de misiones.",
            30,
        ),
        (
            "Contactar al soporte si el problema persiste",
            "Cuéntanos qué ocurrió para que podamos ayudarte.",
            40,
        ),
        (
            "Definir una meta simple manualmente",
            "Escribe una meta pequeña que puedas cumplir hoy.",
            50,
        ),
        (
            "Completar la primera meta manual",
            "Cumple la meta que definiste y márcala como hecha.",
            60,
        ),
    ];

    MissionPlan {
        title: "Misión de Rescate".into(),
        description: "Recupera tu plan de aventura.".into(),
        missions: steps
            .iter()
            .enumerate()
            .map(|(i, (title, description, xp))| {
                Mission::new(i as u32 + 1, *title)
                    .with_description(*description)
                    .with_verification(VerificationType::Manual)
                    .with_rewards(*xp, 0)
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
