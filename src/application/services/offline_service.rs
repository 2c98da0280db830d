use crate::application::ports::remote_backend;
use crate::application::ports::{Notice, OfflineStore, RemoteBackend, UserNotifier};
use crate::domain::entities::{
    CareSnapshot, FailedOperation, PendingOperation, PendingOperationDraft, SnapshotPatch,
};
use crate::domain::value_objects::{
    ConnectivityState, EntityKind, OperationId, OperationKind, OperationPayload,
};
use crate::shared::error::AppError;
use std::sync::Arc;
use tokio::sync::watch;

/// Push-based pending-queue depth for the UI indicator.
pub struct QueueGauge {
    tx: watch::Sender<u64>,
}

impl QueueGauge {
    pub fn new(initial: u64) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn set(&self, depth: u64) {
        self.tx.send_replace(depth);
    }

    pub fn get(&self) -> u64 {
        *self.tx.borrow()
    }

    pub fn watch(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The backend accepted the write directly.
    Dispatched { remote_id: Option<String> },
    /// The write was queued for a later drain.
    Queued { id: OperationId },
}

/// The domain write path. Online writes go straight to the backend; offline
/// writes (and direct dispatches that fail) land in the durable queue.
pub struct OfflineService {
    store: Arc<dyn OfflineStore>,
    backend: Arc<dyn RemoteBackend>,
    notifier: Arc<dyn UserNotifier>,
    connectivity: watch::Receiver<ConnectivityState>,
    gauge: Arc<QueueGauge>,
}

impl OfflineService {
    pub fn new(
        store: Arc<dyn OfflineStore>,
        backend: Arc<dyn RemoteBackend>,
        notifier: Arc<dyn UserNotifier>,
        connectivity: watch::Receiver<ConnectivityState>,
        gauge: Arc<QueueGauge>,
    ) -> Self {
        Self {
            store,
            backend,
            notifier,
            connectivity,
            gauge,
        }
    }

    /// Apply a domain write. Invalid payloads are rejected up front; backend
    /// rejections of well-formed writes degrade to queueing, they do not
    /// surface as errors here.
    pub async fn submit(
        &self,
        entity: EntityKind,
        operation: OperationKind,
        payload: OperationPayload,
    ) -> Result<SubmitOutcome, AppError> {
        validate_payload(operation, &payload)?;

        let online = self.connectivity.borrow().is_online();
        if online {
            match remote_backend::dispatch(self.backend.as_ref(), entity, operation, &payload)
                .await
            {
                Ok(remote_id) => return Ok(SubmitOutcome::Dispatched { remote_id }),
                Err(AppError::InvalidOperation(msg)) => {
                    return Err(AppError::InvalidOperation(msg));
                }
                Err(err) => {
                    tracing::warn!(
                        target: "offline::write",
                        entity = %entity,
                        operation = %operation,
                        error = %err,
                        "direct dispatch failed, queueing write"
                    );
                }
            }
        }

        let stored = self.enqueue_validated(entity, operation, payload).await?;
        Ok(SubmitOutcome::Queued { id: stored.id })
    }

    /// Queue a write unconditionally (the explicit offline path).
    pub async fn enqueue(
        &self,
        entity: EntityKind,
        operation: OperationKind,
        payload: OperationPayload,
    ) -> Result<PendingOperation, AppError> {
        validate_payload(operation, &payload)?;
        self.enqueue_validated(entity, operation, payload).await
    }

    async fn enqueue_validated(
        &self,
        entity: EntityKind,
        operation: OperationKind,
        payload: OperationPayload,
    ) -> Result<PendingOperation, AppError> {
        let draft = PendingOperationDraft::new(entity, operation, payload);
        let stored = self.store.enqueue(draft).await?;

        if let Ok(count) = self.store.pending_count().await {
            self.gauge.set(count);
        }
        self.notifier.notify(Notice::OperationQueued { entity, operation });

        Ok(stored)
    }

    pub async fn pending(&self) -> Result<Vec<PendingOperation>, AppError> {
        self.store.list_pending().await
    }

    pub async fn failed(&self) -> Result<Vec<FailedOperation>, AppError> {
        self.store.list_failed().await
    }

    /// Operator discard of the whole queue. Returns the number of operations
    /// dropped.
    pub async fn discard_all(&self) -> Result<u64, AppError> {
        let removed = self.store.clear_pending().await?;
        self.gauge.set(0);
        Ok(removed)
    }

    pub async fn save_snapshot(&self, patch: SnapshotPatch) -> Result<(), AppError> {
        self.store.save_snapshot(patch).await
    }

    /// Last backend-confirmed state; pending writes are not overlaid.
    pub async fn snapshot(&self) -> Result<CareSnapshot, AppError> {
        self.store.snapshot().await
    }

    pub fn queue_depth(&self) -> watch::Receiver<u64> {
        self.gauge.watch()
    }
}

fn validate_payload(operation: OperationKind, payload: &OperationPayload) -> Result<(), AppError> {
    if operation.requires_entity_id() && payload.entity_id().is_none() {
        return Err(AppError::InvalidOperation(format!(
            "{operation} payload is missing the entity id"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::Database;
    use crate::infrastructure::offline::SqliteOfflineStore;
    use crate::shared::config::Config;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct FlakyBackend {
        rejecting: AtomicBool,
        calls: StdMutex<Vec<String>>,
    }

    #[async_trait]
    impl RemoteBackend for FlakyBackend {
        async fn create(
            &self,
            entity: EntityKind,
            _payload: &OperationPayload,
        ) -> Result<String, AppError> {
            self.calls.lock().unwrap().push(format!("create:{entity}"));
            if self.rejecting.load(Ordering::SeqCst) {
                return Err(AppError::RemoteDispatch("backend down".to_string()));
            }
            Ok("remote-1".to_string())
        }

        async fn update(
            &self,
            entity: EntityKind,
            id: &str,
            _payload: &OperationPayload,
        ) -> Result<(), AppError> {
            self.calls.lock().unwrap().push(format!("update:{entity}:{id}"));
            if self.rejecting.load(Ordering::SeqCst) {
                return Err(AppError::RemoteDispatch("backend down".to_string()));
            }
            Ok(())
        }

        async fn delete(&self, entity: EntityKind, id: &str) -> Result<(), AppError> {
            self.calls.lock().unwrap().push(format!("delete:{entity}:{id}"));
            Ok(())
        }
    }

    struct RecordingNotifier {
        notices: StdMutex<Vec<Notice>>,
    }

    impl UserNotifier for RecordingNotifier {
        fn notify(&self, notice: Notice) {
            self.notices.lock().unwrap().push(notice);
        }
    }

    async fn setup(online: bool) -> (OfflineService, Arc<FlakyBackend>, Arc<RecordingNotifier>) {
        let mut config = Config::default();
        config.database.url = "sqlite::memory:".to_string();
        config.database.max_connections = 1;
        let pool = Database::initialize(&config.database).await.unwrap();
        let store = Arc::new(SqliteOfflineStore::new(pool));
        let backend = Arc::new(FlakyBackend::default());
        let notifier = Arc::new(RecordingNotifier {
            notices: StdMutex::new(Vec::new()),
        });
        let state = if online {
            ConnectivityState::Online
        } else {
            ConnectivityState::Offline
        };
        let (_tx, rx) = watch::channel(state);

        let service = OfflineService::new(
            store,
            backend.clone(),
            notifier.clone(),
            rx,
            Arc::new(QueueGauge::new(0)),
        );
        (service, backend, notifier)
    }

    fn payload(value: serde_json::Value) -> OperationPayload {
        OperationPayload::new(value).unwrap()
    }

    #[tokio::test]
    async fn offline_submit_queues_and_notifies() {
        let (service, backend, notifier) = setup(false).await;

        let outcome = service
            .submit(
                EntityKind::Patient,
                OperationKind::Update,
                payload(json!({"id": "p1", "status": "urgent"})),
            )
            .await
            .unwrap();

        assert!(matches!(outcome, SubmitOutcome::Queued { .. }));
        assert!(backend.calls.lock().unwrap().is_empty());
        assert_eq!(service.pending().await.unwrap().len(), 1);
        assert_eq!(*service.queue_depth().borrow(), 1);
        assert!(notifier.notices.lock().unwrap().iter().any(|n| matches!(
            n,
            Notice::OperationQueued { .. }
        )));
    }

    #[tokio::test]
    async fn online_submit_dispatches_directly() {
        let (service, backend, _notifier) = setup(true).await;

        let outcome = service
            .submit(
                EntityKind::Appointment,
                OperationKind::Create,
                payload(json!({"at": "2026-08-06T10:00:00Z"})),
            )
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Dispatched {
                remote_id: Some("remote-1".to_string())
            }
        );
        assert_eq!(backend.calls.lock().unwrap().len(), 1);
        assert!(service.pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_direct_dispatch_falls_back_to_queue() {
        let (service, backend, _notifier) = setup(true).await;
        backend.rejecting.store(true, Ordering::SeqCst);

        let outcome = service
            .submit(
                EntityKind::Patient,
                OperationKind::Create,
                payload(json!({"name": "New Patient"})),
            )
            .await
            .unwrap();

        assert!(matches!(outcome, SubmitOutcome::Queued { .. }));
        assert_eq!(service.pending().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_without_entity_id_is_rejected_up_front() {
        let (service, backend, _notifier) = setup(false).await;

        let err = service
            .submit(
                EntityKind::Patient,
                OperationKind::Update,
                payload(json!({"status": "urgent"})),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidOperation(_)));
        assert!(backend.calls.lock().unwrap().is_empty());
        assert!(service.pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn discard_all_empties_queue_and_gauge() {
        let (service, _backend, _notifier) = setup(false).await;
        for i in 0..3 {
            service
                .enqueue(
                    EntityKind::VitalSign,
                    OperationKind::Create,
                    payload(json!({"pulse": 60 + i})),
                )
                .await
                .unwrap();
        }

        assert_eq!(service.discard_all().await.unwrap(), 3);
        assert!(service.pending().await.unwrap().is_empty());
        assert_eq!(*service.queue_depth().borrow(), 0);
    }
}
