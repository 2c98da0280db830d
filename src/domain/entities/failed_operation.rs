use crate::domain::value_objects::{EntityKind, OperationId, OperationKind, OperationPayload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pending operation that exhausted its retries and was moved to the
/// dead-letter set for operator inspection. Never retried automatically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailedOperation {
    pub record_id: i64,
    pub id: OperationId,
    pub entity: EntityKind,
    pub operation: OperationKind,
    pub payload: OperationPayload,
    pub enqueued_at: DateTime<Utc>,
    pub retry_count: u32,
    pub failed_at: DateTime<Utc>,
    pub last_error: String,
}
