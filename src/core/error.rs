use thiserror::Error;

/// Errors surfaced by the projection engine and its assumption loader.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("annual return series is required and must not be empty")]
    EmptyReturnSeries,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid market assumptions: {0}")]
    InvalidAssumptions(String),
    #[error("failed to read market assumptions: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse market assumptions: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlannerError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
