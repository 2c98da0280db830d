use crate::domain::value_objects::{EntityKind, OperationId, OperationKind, OperationPayload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A durably queued intent to create, update or delete a domain entity,
/// recorded because the remote backend was unreachable at write time.
///
/// Only `retry_count`, `next_attempt_at` and `last_error` are ever mutated;
/// everything else is fixed at enqueue time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingOperation {
    /// Storage-assigned ordering key; the queue replays in `record_id` order.
    pub record_id: i64,
    pub id: OperationId,
    pub entity: EntityKind,
    pub operation: OperationKind,
    pub payload: OperationPayload,
    pub enqueued_at: DateTime<Utc>,
    pub retry_count: u32,
    pub next_attempt_at: DateTime<Utc>,
    pub last_error: Option<String>,
}

impl PendingOperation {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_attempt_at <= now
    }
}

/// Enqueue input; id, timestamps and retry bookkeeping are assigned by the
/// store.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOperationDraft {
    pub entity: EntityKind,
    pub operation: OperationKind,
    pub payload: OperationPayload,
}

impl PendingOperationDraft {
    pub fn new(entity: EntityKind, operation: OperationKind, payload: OperationPayload) -> Self {
        Self {
            entity,
            operation,
            payload,
        }
    }
}
