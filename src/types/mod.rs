mod feedback;
mod feedback_error;
mod score;

pub use feedback::{Feedback, FeedbackId, FeedbackState};
pub use feedback_error::FeedbackError;
pub use score::Score;
