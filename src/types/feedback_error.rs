use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("score must be between 1 and 5, got {0}")]
    InvalidScore(i64),
}
