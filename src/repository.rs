use anyhow::{Context, Result};

use crate::storage::{Storage, StorageRead, StorageTx, StorageWrite};
use crate::types::{Feedback, FeedbackId, Score};

/// Feedback operations on top of a [`Storage`].
///
/// Every mutating call runs in its own transaction and is committed before it
/// returns. Absent or soft-deleted records surface as `None`/`false`, never as
/// errors.
#[derive(Clone)]
pub struct FeedbackRepository<S> {
    storage: S,
}

impl<S: Storage> FeedbackRepository<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn create(&self, score: Score) -> Result<Feedback> {
        let tx = self.storage.begin_tx().context("opening transaction")?;
        let feedback = tx.insert_feedback(score).context("inserting feedback")?;
        tx.commit().context("committing new feedback")?;

        log::debug!("📝 Created feedback {} with score {}", feedback.id, score);
        Ok(feedback)
    }

    pub fn get(&self, id: FeedbackId) -> Result<Option<Feedback>> {
        self.storage
            .load_feedback(id)
            .with_context(|| format!("loading feedback {id}"))
    }

    pub fn get_all(&self) -> Result<Vec<Feedback>> {
        self.storage.list_feedbacks().context("listing feedbacks")
    }

    /// A `None` score leaves the record as it is and takes no write lock.
    pub fn update(&self, id: FeedbackId, score: Option<Score>) -> Result<Option<Feedback>> {
        let Some(score) = score else {
            return self.get(id);
        };

        let tx = self.storage.begin_tx().context("opening transaction")?;
        let Some(current) = tx
            .load_feedback(id)
            .with_context(|| format!("loading feedback {id}"))?
        else {
            return Ok(None);
        };

        let updated = tx
            .save_feedback_score(id, score)
            .with_context(|| format!("updating feedback {id}"))?
            .with_context(|| format!("feedback {id} vanished during update"))?;
        tx.commit().context("committing feedback update")?;

        log::debug!("✏️ Updated feedback {} score {} -> {}", id, current.score, score);
        Ok(Some(updated))
    }

    pub fn delete(&self, id: FeedbackId) -> Result<bool> {
        let tx = self.storage.begin_tx().context("opening transaction")?;
        if tx
            .load_feedback(id)
            .with_context(|| format!("loading feedback {id}"))?
            .is_none()
        {
            return Ok(false);
        }

        let deleted = tx
            .mark_feedback_deleted(id)
            .with_context(|| format!("deleting feedback {id}"))?;
        tx.commit().context("committing feedback deletion")?;

        log::debug!("🗑️ Soft-deleted feedback {}", id);
        Ok(deleted > 0)
    }
}
