use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PendingOperationRow {
    pub record_id: i64,
    pub operation_id: String,
    pub entity_kind: String,
    pub operation_kind: String,
    pub payload: String,
    pub enqueued_at: i64,
    pub retry_count: i64,
    pub next_attempt_at: i64,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct FailedOperationRow {
    pub record_id: i64,
    pub operation_id: String,
    pub entity_kind: String,
    pub operation_kind: String,
    pub payload: String,
    pub enqueued_at: i64,
    pub retry_count: i64,
    pub failed_at: i64,
    pub last_error: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct SnapshotRow {
    pub patients: String,
    pub appointments: String,
    pub vital_signs: String,
    pub documents: String,
    pub refreshed_at: Option<i64>,
}
