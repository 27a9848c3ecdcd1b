use thiserror::Error;

/// Errors that abort a planning episode.
///
/// A goal that cannot be reached is not an error: searches report it as `None`
/// and sibling goals are still planned.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// The world-state determiner failed, or did not answer in time.
    #[error("World state unavailable: {0}")]
    StateUnavailable(String),

    /// The planning system references unknown conditions, contains an action
    /// whose effects contradict its preconditions, or repeats a name.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Action cost must be non-negative and finite: {action} has cost {cost}")]
    InvalidActionCost { action: String, cost: f64 },

    #[error("Planning episode was cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for PlannerError {
    fn from(err: toml::de::Error) -> Self {
        PlannerError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for PlannerError {
    fn from(err: toml::ser::Error) -> Self {
        PlannerError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        PlannerError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
