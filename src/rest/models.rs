use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Feedback;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateFeedbackRequest {
    pub score: i64,
}

/// `score` absent and `score: null` both mean "keep the current score".
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateFeedbackRequest {
    #[serde(default)]
    pub score: Option<i64>,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub id: i64,
    pub score: u8,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<Feedback> for FeedbackResponse {
    fn from(feedback: Feedback) -> Self {
        Self {
            id: feedback.id,
            score: feedback.score.get(),
            created_at: feedback.created_at,
            deleted_at: feedback.state.deleted_at(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct DeletedResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub detail: Vec<FieldError>,
}

#[derive(Serialize, Deserialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
}
