use crate::domain::entities::{CareSnapshot, FailedOperation, PendingOperation};
use crate::domain::value_objects::{EntityKind, OperationId, OperationKind, OperationPayload};
use crate::infrastructure::offline::rows::{
    FailedOperationRow, PendingOperationRow, SnapshotRow,
};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};

pub fn pending_from_row(row: PendingOperationRow) -> Result<PendingOperation, AppError> {
    Ok(PendingOperation {
        record_id: row.record_id,
        id: OperationId::new(row.operation_id).map_err(AppError::StorageRead)?,
        entity: EntityKind::parse(&row.entity_kind).map_err(AppError::StorageRead)?,
        operation: OperationKind::parse(&row.operation_kind).map_err(AppError::StorageRead)?,
        payload: payload_from_text(&row.payload)?,
        enqueued_at: timestamp_from_secs(row.enqueued_at)?,
        retry_count: count_from_i64(row.retry_count)?,
        next_attempt_at: timestamp_from_secs(row.next_attempt_at)?,
        last_error: row.last_error,
    })
}

pub fn failed_from_row(row: FailedOperationRow) -> Result<FailedOperation, AppError> {
    Ok(FailedOperation {
        record_id: row.record_id,
        id: OperationId::new(row.operation_id).map_err(AppError::StorageRead)?,
        entity: EntityKind::parse(&row.entity_kind).map_err(AppError::StorageRead)?,
        operation: OperationKind::parse(&row.operation_kind).map_err(AppError::StorageRead)?,
        payload: payload_from_text(&row.payload)?,
        enqueued_at: timestamp_from_secs(row.enqueued_at)?,
        retry_count: count_from_i64(row.retry_count)?,
        failed_at: timestamp_from_secs(row.failed_at)?,
        last_error: row.last_error,
    })
}

pub fn snapshot_from_row(row: SnapshotRow) -> Result<CareSnapshot, AppError> {
    let refreshed_at = match row.refreshed_at {
        Some(secs) => Some(timestamp_from_secs(secs)?),
        None => None,
    };
    Ok(CareSnapshot {
        patients: section_from_text(&row.patients)?,
        appointments: section_from_text(&row.appointments)?,
        vital_signs: section_from_text(&row.vital_signs)?,
        documents: section_from_text(&row.documents)?,
        refreshed_at,
    })
}

fn payload_from_text(text: &str) -> Result<OperationPayload, AppError> {
    OperationPayload::from_json_str(text)
        .map_err(|e| AppError::StorageRead(format!("corrupt stored payload: {e}")))
}

fn section_from_text(text: &str) -> Result<serde_json::Value, AppError> {
    serde_json::from_str(text)
        .map_err(|e| AppError::StorageRead(format!("corrupt stored snapshot section: {e}")))
}

fn timestamp_from_secs(secs: i64) -> Result<DateTime<Utc>, AppError> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .ok_or_else(|| AppError::StorageRead(format!("timestamp out of range: {secs}")))
}

fn count_from_i64(value: i64) -> Result<u32, AppError> {
    u32::try_from(value)
        .map_err(|_| AppError::StorageRead(format!("retry count out of range: {value}")))
}
