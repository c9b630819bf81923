use crate::engine::Rules;
use crate::error::{Result, WydError};
use crate::progression::{Progression, MAX_LEVEL};
use crate::types::LevelUpPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// GeminiConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_model")]
    pub conversational_model: String,
    #[serde(default = "default_model")]
    pub json_model: String,
    /// Request timeout; unset leaves the transport default in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            conversational_model: default_model(),
            json_model: default_model(),
            timeout_secs: None,
        }
    }
}

// ---------------------------------------------------------------------------
// ProgressionConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionConfig {
    #[serde(default = "default_starting_level")]
    pub starting_level: u32,
    #[serde(default = "default_starting_threshold")]
    pub starting_xp_to_next_level: u32,
    #[serde(default)]
    pub level_up: LevelUpPolicy,
}

fn default_starting_level() -> u32 {
    1
}

fn default_starting_threshold() -> u32 {
    100
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            starting_level: default_starting_level(),
            starting_xp_to_next_level: default_starting_threshold(),
            level_up: LevelUpPolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// MissionsConfig / FocusConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionsConfig {
    #[serde(default)]
    pub allow_uncomplete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusConfig {
    #[serde(default = "default_focus_minutes")]
    pub duration_minutes: u32,
}

fn default_focus_minutes() -> u32 {
    60
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            duration_minutes: default_focus_minutes(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub progression: ProgressionConfig,
    #[serde(default)]
    pub missions: MissionsConfig,
    #[serde(default)]
    pub focus: FocusConfig,
}

impl Config {
    /// `~/.wyd/config.yaml`
    pub fn default_path() -> Result<PathBuf> {
        let home = home::home_dir().ok_or(WydError::HomeNotFound)?;
        Ok(home.join(".wyd").join("config.yaml"))
    }

    /// Load from an explicit path; the file must exist.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    /// Load from `path` if given, else from the default location when it
    /// exists, else built-in defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(p) = path {
            return Self::load(p);
        }
        match Self::default_path() {
            Ok(p) if p.exists() => Self::load(&p),
            _ => Ok(Self::default()),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn rules(&self) -> Rules {
        Rules {
            level_up: self.progression.level_up,
            allow_uncomplete: self.missions.allow_uncomplete,
        }
    }

    pub fn starting_progression(&self) -> Progression {
        Progression::new(
            self.progression.starting_level,
            self.progression.starting_xp_to_next_level,
        )
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut error = |message: String| {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message,
            })
        };

        if self.gemini.conversational_model.trim().is_empty() {
            error("gemini.conversational_model is empty".into());
        }
        if self.gemini.json_model.trim().is_empty() {
            error("gemini.json_model is empty".into());
        }
        if self.gemini.timeout_secs == Some(0) {
            error("gemini.timeout_secs must be greater than 0".into());
        }
        if self.progression.starting_level == 0 {
            error("progression.starting_level must be at least 1".into());
        }
        if self.progression.starting_level > MAX_LEVEL {
            error(format!("progression.starting_level must be at most {MAX_LEVEL}"));
        }
        if self.progression.starting_xp_to_next_level == 0 {
            error("progression.starting_xp_to_next_level must be at least 1".into());
        }
        if self.focus.duration_minutes == 0 {
            error("focus.duration_minutes must be greater than 0".into());
        }
        if !self.gemini.api_base.starts_with("http") {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "gemini.api_base '{}' does not look like an http(s) URL",
                    self.gemini.api_base
                ),
            });
        }
        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_observed_behaviour() {
        let config = Config::default();
        assert_eq!(config.gemini.json_model, "gemini-2.5-flash");
        assert_eq!(config.focus.duration_minutes, 60);
        assert_eq!(config.progression.level_up, LevelUpPolicy::Single);
        assert!(!config.missions.allow_uncomplete);
        let p = config.starting_progression();
        assert_eq!((p.level, p.xp, p.xp_to_next_level, p.coins), (1, 0, 100, 0));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "progression:\n  level_up: cascade\nmissions:\n  allow_uncomplete: true\n",
        )
        .unwrap();
        let config = Config::resolve(Some(&path)).unwrap();
        assert_eq!(config.progression.level_up, LevelUpPolicy::Cascade);
        assert_eq!(config.progression.starting_xp_to_next_level, 100);
        assert!(config.rules().allow_uncomplete);
        assert_eq!(config.gemini.api_base, default_api_base());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(Config::resolve(Some(&dir.path().join("nope.yaml"))).is_err());
    }

    #[test]
    fn validate_flags_zero_values() {
        let mut config = Config::default();
        config.focus.duration_minutes = 0;
        config.progression.starting_xp_to_next_level = 0;
        config.gemini.api_base = "ftp://x".into();
        let warnings = config.validate();
        let errors = warnings
            .iter()
            .filter(|w| w.level == WarnLevel::Error)
            .count();
        assert_eq!(errors, 2);
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn validate_rejects_starting_level_above_cap() {
        let mut config = Config::default();
        config.progression.starting_level = u32::MAX;
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Error);
        assert!(warnings[0].message.contains("starting_level"));
    }
}
