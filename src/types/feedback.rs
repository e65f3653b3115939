use chrono::{DateTime, Utc};

use super::Score;

pub type FeedbackId = i64;

/// Soft-deletion state of a feedback record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackState {
    Active,
    Deleted { at: DateTime<Utc> },
}

impl FeedbackState {
    pub fn from_deleted_at(deleted_at: Option<DateTime<Utc>>) -> Self {
        match deleted_at {
            Some(at) => FeedbackState::Deleted { at },
            None => FeedbackState::Active,
        }
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            FeedbackState::Active => None,
            FeedbackState::Deleted { at } => Some(*at),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub id: FeedbackId,
    pub score: Score,
    pub created_at: DateTime<Utc>,
    pub state: FeedbackState,
}
