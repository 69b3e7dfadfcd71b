use thiserror::Error;

/// Everything the decision engine can reject.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid card '{input}': {reason}")]
    Parse { input: String, reason: String },
    #[error("invalid hand: {0}")]
    InvalidHand(String),
    #[error("player '{0}' is not seated at this table")]
    PlayerNotFound(String),
    #[error("malformed action set: {0}")]
    MalformedActionSet(String),
    #[error("unsupported table: {0}")]
    UnsupportedTable(String),
}

impl EngineError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        EngineError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
