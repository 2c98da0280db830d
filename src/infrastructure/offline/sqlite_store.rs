use crate::application::ports::OfflineStore;
use crate::domain::entities::{
    CareSnapshot, FailedOperation, PendingOperation, PendingOperationDraft, SnapshotPatch,
};
use crate::domain::value_objects::OperationId;
use crate::infrastructure::database::DbPool;
use crate::infrastructure::offline::mappers::{failed_from_row, pending_from_row, snapshot_from_row};
use crate::infrastructure::offline::rows::{
    FailedOperationRow, PendingOperationRow, SnapshotRow,
};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

/// SQLite-backed durable queue and snapshot cache. Insertion order is the
/// `record_id` autoincrement; replay reads in that order.
pub struct SqliteOfflineStore {
    pool: DbPool,
}

impl SqliteOfflineStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn pending_by_id(&self, id: &OperationId) -> Result<PendingOperation, AppError> {
        let row = sqlx::query_as::<_, PendingOperationRow>(
            r#"
            SELECT * FROM pending_operations
            WHERE operation_id = ?1
            "#,
        )
        .bind(id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(read_err)?;

        pending_from_row(row)
    }

    async fn load_snapshot(&self) -> Result<CareSnapshot, AppError> {
        let row = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT patients, appointments, vital_signs, documents, refreshed_at
            FROM care_snapshot
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(read_err)?;

        match row {
            Some(row) => snapshot_from_row(row),
            None => Ok(CareSnapshot::default()),
        }
    }
}

#[async_trait]
impl OfflineStore for SqliteOfflineStore {
    async fn save_snapshot(&self, patch: SnapshotPatch) -> Result<(), AppError> {
        // Read-then-write; writes originate from a single UI thread of
        // control, so the merge does not race itself.
        let mut snapshot = self.load_snapshot().await?;
        snapshot.apply(patch, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO care_snapshot (id, patients, appointments, vital_signs, documents, refreshed_at)
            VALUES (1, ?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                patients = excluded.patients,
                appointments = excluded.appointments,
                vital_signs = excluded.vital_signs,
                documents = excluded.documents,
                refreshed_at = excluded.refreshed_at
            "#,
        )
        .bind(serde_json::to_string(&snapshot.patients)?)
        .bind(serde_json::to_string(&snapshot.appointments)?)
        .bind(serde_json::to_string(&snapshot.vital_signs)?)
        .bind(serde_json::to_string(&snapshot.documents)?)
        .bind(snapshot.refreshed_at.map(|t| t.timestamp()))
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        Ok(())
    }

    async fn snapshot(&self) -> Result<CareSnapshot, AppError> {
        self.load_snapshot().await
    }

    async fn enqueue(&self, draft: PendingOperationDraft) -> Result<PendingOperation, AppError> {
        let id = OperationId::generate();
        let now = Utc::now().timestamp();
        let payload_text = serde_json::to_string(draft.payload.as_json())?;

        sqlx::query(
            r#"
            INSERT INTO pending_operations (
                operation_id, entity_kind, operation_kind, payload,
                enqueued_at, retry_count, next_attempt_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?5)
            "#,
        )
        .bind(id.as_str())
        .bind(draft.entity.as_str())
        .bind(draft.operation.as_str())
        .bind(&payload_text)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        self.pending_by_id(&id).await
    }

    async fn list_pending(&self) -> Result<Vec<PendingOperation>, AppError> {
        let rows = sqlx::query_as::<_, PendingOperationRow>(
            r#"
            SELECT * FROM pending_operations
            ORDER BY record_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(read_err)?;

        rows.into_iter().map(pending_from_row).collect()
    }

    async fn pending_count(&self) -> Result<u64, AppError> {
        let row = sqlx::query(r#"SELECT COUNT(*) AS count FROM pending_operations"#)
            .fetch_one(&self.pool)
            .await
            .map_err(read_err)?;

        let count: i64 = row.try_get("count").map_err(read_err)?;
        Ok(count as u64)
    }

    async fn record_failure(
        &self,
        id: &OperationId,
        error: &str,
        next_attempt_at: chrono::DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE pending_operations
            SET retry_count = retry_count + 1,
                last_error = ?1,
                next_attempt_at = ?2
            WHERE operation_id = ?3
            "#,
        )
        .bind(error)
        .bind(next_attempt_at.timestamp())
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        Ok(())
    }

    async fn remove(&self, id: &OperationId) -> Result<(), AppError> {
        sqlx::query(r#"DELETE FROM pending_operations WHERE operation_id = ?1"#)
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(write_err)?;

        Ok(())
    }

    async fn move_to_failed(&self, id: &OperationId, error: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(write_err)?;

        let row = sqlx::query_as::<_, PendingOperationRow>(
            r#"
            SELECT * FROM pending_operations
            WHERE operation_id = ?1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(read_err)?;

        let Some(row) = row else {
            // Already drained or discarded; nothing to move.
            return Ok(());
        };

        let failed_at = Utc::now().timestamp();
        sqlx::query(
            r#"
            INSERT INTO failed_operations (
                operation_id, entity_kind, operation_kind, payload,
                enqueued_at, retry_count, failed_at, last_error
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&row.operation_id)
        .bind(&row.entity_kind)
        .bind(&row.operation_kind)
        .bind(&row.payload)
        .bind(row.enqueued_at)
        // The attempt that triggered the move counts.
        .bind(row.retry_count + 1)
        .bind(failed_at)
        .bind(error)
        .execute(&mut *tx)
        .await
        .map_err(write_err)?;

        sqlx::query(r#"DELETE FROM pending_operations WHERE operation_id = ?1"#)
            .bind(id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(write_err)?;

        tx.commit().await.map_err(write_err)?;
        Ok(())
    }

    async fn list_failed(&self) -> Result<Vec<FailedOperation>, AppError> {
        let rows = sqlx::query_as::<_, FailedOperationRow>(
            r#"
            SELECT * FROM failed_operations
            ORDER BY failed_at DESC, record_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(read_err)?;

        rows.into_iter().map(failed_from_row).collect()
    }

    async fn clear_pending(&self) -> Result<u64, AppError> {
        let result = sqlx::query(r#"DELETE FROM pending_operations"#)
            .execute(&self.pool)
            .await
            .map_err(write_err)?;

        Ok(result.rows_affected())
    }
}

fn read_err(err: sqlx::Error) -> AppError {
    AppError::StorageRead(err.to_string())
}

fn write_err(err: sqlx::Error) -> AppError {
    AppError::StorageWrite(err.to_string())
}
