use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Unknown scenario type: {0}")]
    UnknownScenarioType(String),

    #[error("Unknown seasonal pattern: {0}")]
    UnknownSeasonalPattern(String),

    #[error("Unknown input field: {0}")]
    UnknownInputField(String),

    #[error("Invalid month index {0}: must be between 0 and 11")]
    InvalidMonth(u32),

    #[error("Invalid duration {0}: must be between 1 and 12 months")]
    InvalidDuration(u32),

    #[error("Invalid ramp-up of {0} months: must be between 0 and 11")]
    InvalidRampUp(u32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScenarioError>;
