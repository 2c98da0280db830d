use crate::domain::value_objects::{EntityKind, OperationKind, OperationPayload};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// The hosted practice backend, reduced to the three mutation calls the queue
/// replays. Implementations live in the host application.
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    async fn create(
        &self,
        entity: EntityKind,
        payload: &OperationPayload,
    ) -> Result<String, AppError>;

    async fn update(
        &self,
        entity: EntityKind,
        id: &str,
        payload: &OperationPayload,
    ) -> Result<(), AppError>;

    async fn delete(&self, entity: EntityKind, id: &str) -> Result<(), AppError>;
}

/// Select and invoke the backend call for one operation. Returns the remote
/// id for creates.
pub async fn dispatch(
    backend: &dyn RemoteBackend,
    entity: EntityKind,
    operation: OperationKind,
    payload: &OperationPayload,
) -> Result<Option<String>, AppError> {
    match operation {
        OperationKind::Create => backend.create(entity, payload).await.map(Some),
        OperationKind::Update => {
            let id = require_entity_id(operation, payload)?;
            backend.update(entity, id, payload).await.map(|_| None)
        }
        OperationKind::Delete => {
            let id = require_entity_id(operation, payload)?;
            backend.delete(entity, id).await.map(|_| None)
        }
    }
}

fn require_entity_id<'a>(
    operation: OperationKind,
    payload: &'a OperationPayload,
) -> Result<&'a str, AppError> {
    payload.entity_id().ok_or_else(|| {
        AppError::InvalidOperation(format!("{operation} payload is missing the entity id"))
    })
}
