use anyhow::Result;

use crate::types::{Feedback, FeedbackId, Score};

/// Reads only ever see active (not soft-deleted) records.
pub trait StorageRead {
    fn load_feedback(&self, id: FeedbackId) -> Result<Option<Feedback>>;
    /// Ordered by id, ascending.
    fn list_feedbacks(&self) -> Result<Vec<Feedback>>;
}

pub trait StorageWrite {
    fn insert_feedback(&self, score: Score) -> Result<Feedback>;
    fn save_feedback_score(&self, id: FeedbackId, score: Score) -> Result<Option<Feedback>>;
    fn mark_feedback_deleted(&self, id: FeedbackId) -> Result<usize>;
}

/// Dropping a transaction without committing rolls it back.
pub trait StorageTx: StorageRead + StorageWrite {
    fn commit(self) -> Result<()>;
}

pub trait Storage: StorageRead {
    type Tx: StorageTx;

    fn begin_tx(&self) -> Result<Self::Tx>;
}
