use thiserror::Error;

#[derive(Debug, Error)]
pub enum WydError {
    #[error("invalid mission plan: {0}")]
    InvalidPlan(String),

    #[error("action '{action}' is not available while {stage}")]
    InvalidStage { action: String, stage: String },

    #[error("a reply is still pending; wait for it before sending another message")]
    Busy,

    #[error("message is empty")]
    EmptyMessage,

    #[error("unknown verification type: {0}")]
    UnknownVerification(String),

    #[error("unknown level-up policy: {0}")]
    UnknownLevelUpPolicy(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WydError>;
