use crate::domain::entities::{
    CareSnapshot, FailedOperation, PendingOperation, PendingOperationDraft, SnapshotPatch,
};
use crate::domain::value_objects::OperationId;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable, restart-surviving storage for the pending queue, the dead-letter
/// set and the cached domain snapshot.
#[async_trait]
pub trait OfflineStore: Send + Sync {
    /// Merge the patch into the stored snapshot and refresh its timestamp.
    async fn save_snapshot(&self, patch: SnapshotPatch) -> Result<(), AppError>;

    /// The stored snapshot, or the empty default if nothing was saved yet.
    async fn snapshot(&self) -> Result<CareSnapshot, AppError>;

    /// Assign id/timestamps/retry bookkeeping, persist, and return the stored
    /// record once the transaction commits.
    async fn enqueue(&self, draft: PendingOperationDraft) -> Result<PendingOperation, AppError>;

    /// All pending operations in insertion order.
    async fn list_pending(&self) -> Result<Vec<PendingOperation>, AppError>;

    async fn pending_count(&self) -> Result<u64, AppError>;

    /// Record a failed replay attempt: bump `retry_count`, store the error and
    /// the earliest time the next attempt may run.
    async fn record_failure(
        &self,
        id: &OperationId,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Remove one successfully replayed operation.
    async fn remove(&self, id: &OperationId) -> Result<(), AppError>;

    /// Move one operation to the dead-letter set, atomically with its removal
    /// from the queue.
    async fn move_to_failed(&self, id: &OperationId, error: &str) -> Result<(), AppError>;

    /// Dead-letter records, most recently failed first.
    async fn list_failed(&self) -> Result<Vec<FailedOperation>, AppError>;

    /// Explicit discard of every pending operation. Returns the number
    /// removed. Not part of the drain path.
    async fn clear_pending(&self) -> Result<u64, AppError>;
}
