use crate::application::ports::remote_backend;
use crate::application::ports::{Notice, OfflineStore, RemoteBackend, UserNotifier};
use crate::application::services::connectivity_service::ReconnectHook;
use crate::application::services::offline_service::QueueGauge;
use crate::domain::entities::{DrainOutcome, DrainReport, PendingOperation};
use crate::domain::value_objects::ConnectivityState;
use crate::shared::config::SyncConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::time::{timeout, Duration};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStatusSnapshot {
    pub is_syncing: bool,
    pub pending: u64,
    pub last_drain_at: Option<i64>,
    pub consecutive_failures: u32,
}

impl Default for SyncStatusSnapshot {
    fn default() -> Self {
        Self {
            is_syncing: false,
            pending: 0,
            last_drain_at: None,
            consecutive_failures: 0,
        }
    }
}

/// Replays the pending queue against the remote backend. A drain runs on each
/// reconnect edge and on explicit request; concurrent invocations coalesce
/// through the gate instead of replaying the same operations twice.
pub struct SyncCoordinator {
    store: Arc<dyn OfflineStore>,
    backend: Arc<dyn RemoteBackend>,
    notifier: Arc<dyn UserNotifier>,
    connectivity: watch::Receiver<ConnectivityState>,
    gauge: Arc<QueueGauge>,
    config: SyncConfig,
    gate: Mutex<()>,
    status: RwLock<SyncStatusSnapshot>,
}

impl SyncCoordinator {
    pub fn new(
        store: Arc<dyn OfflineStore>,
        backend: Arc<dyn RemoteBackend>,
        notifier: Arc<dyn UserNotifier>,
        connectivity: watch::Receiver<ConnectivityState>,
        gauge: Arc<QueueGauge>,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            backend,
            notifier,
            connectivity,
            gauge,
            config,
            gate: Mutex::new(()),
            status: RwLock::new(SyncStatusSnapshot::default()),
        }
    }

    pub async fn status(&self) -> SyncStatusSnapshot {
        self.status.read().await.clone()
    }

    /// One drain pass. Only operations that actually succeed leave the queue;
    /// failures stay with an incremented retry count and a backoff deadline,
    /// or move to the dead-letter set once retries are exhausted.
    pub async fn drain(&self) -> Result<DrainReport, AppError> {
        let Ok(_gate) = self.gate.try_lock() else {
            return Ok(DrainReport::empty(DrainOutcome::AlreadyRunning));
        };

        let online = self.connectivity.borrow().is_online();
        if !online {
            return Ok(DrainReport::empty(DrainOutcome::SkippedOffline));
        }

        let pending = self.store.list_pending().await?;
        let now = Utc::now();
        let due: Vec<PendingOperation> =
            pending.into_iter().filter(|op| op.is_due(now)).collect();
        if due.is_empty() {
            self.refresh_gauge().await;
            return Ok(DrainReport::empty(DrainOutcome::Idle));
        }

        self.status.write().await.is_syncing = true;
        let result = self.replay_all(due).await;
        self.status.write().await.is_syncing = false;

        let report = result?;
        self.refresh_gauge().await;

        {
            let mut status = self.status.write().await;
            status.last_drain_at = Some(Utc::now().timestamp());
            status.consecutive_failures = if report.outcome == DrainOutcome::Completed {
                0
            } else {
                status.consecutive_failures + 1
            };
        }

        tracing::info!(
            target: "offline::sync",
            attempted = report.attempted,
            synced = report.synced,
            retried = report.retried,
            dead_lettered = report.dead_lettered,
            "drain pass finished"
        );

        Ok(report)
    }

    /// Catch-up pass at startup; failures are logged, not surfaced.
    pub async fn on_startup_drain(&self) {
        if let Err(err) = self.drain().await {
            tracing::error!(target: "offline::sync", error = %err, "startup drain failed");
        }
    }

    async fn replay_all(&self, due: Vec<PendingOperation>) -> Result<DrainReport, AppError> {
        self.notifier.notify(Notice::SyncStarted {
            count: due.len() as u32,
        });

        let mut synced = 0u32;
        let mut retried = 0u32;
        let mut dead_lettered = 0u32;

        for op in &due {
            match self.replay_one(op).await {
                Ok(()) => {
                    self.store.remove(&op.id).await?;
                    synced += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        target: "offline::sync",
                        id = %op.id,
                        entity = %op.entity,
                        operation = %op.operation,
                        retry_count = op.retry_count,
                        error = %err,
                        "replay failed"
                    );
                    // A payload the backend can never act on is not worth
                    // retrying.
                    let retryable = !matches!(err, AppError::InvalidOperation(_));
                    if retryable && op.retry_count + 1 < self.config.max_retries {
                        let next_attempt_at = self.backoff_deadline(op.retry_count, Utc::now());
                        self.store
                            .record_failure(&op.id, &err.to_string(), next_attempt_at)
                            .await?;
                        retried += 1;
                    } else {
                        self.store.move_to_failed(&op.id, &err.to_string()).await?;
                        dead_lettered += 1;
                    }
                }
            }
        }

        let outcome = if retried == 0 && dead_lettered == 0 {
            DrainOutcome::Completed
        } else {
            DrainOutcome::Partial
        };

        if outcome == DrainOutcome::Completed {
            self.notifier.notify(Notice::SyncCompleted { synced });
        } else {
            self.notifier.notify(Notice::SyncFailed {
                synced,
                retried,
                dead_lettered,
            });
        }

        Ok(DrainReport {
            outcome,
            attempted: due.len() as u32,
            synced,
            retried,
            dead_lettered,
        })
    }

    async fn replay_one(&self, op: &PendingOperation) -> Result<(), AppError> {
        let limit = Duration::from_secs(self.config.dispatch_timeout_secs);
        let dispatch =
            remote_backend::dispatch(self.backend.as_ref(), op.entity, op.operation, &op.payload);
        match timeout(limit, dispatch).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(AppError::RemoteDispatch(format!(
                "dispatch timed out after {}s",
                self.config.dispatch_timeout_secs
            ))),
        }
    }

    fn backoff_deadline(&self, retry_count: u32, now: DateTime<Utc>) -> DateTime<Utc> {
        let factor = 1u64.checked_shl(retry_count.min(16)).unwrap_or(u64::MAX);
        let secs = self
            .config
            .retry_backoff_secs
            .saturating_mul(factor)
            .min(self.config.retry_backoff_cap_secs);
        now + ChronoDuration::seconds(secs as i64)
    }

    async fn refresh_gauge(&self) {
        match self.store.pending_count().await {
            Ok(count) => {
                self.gauge.set(count);
                self.status.write().await.pending = count;
            }
            Err(err) => {
                tracing::debug!(target: "offline::sync", error = %err, "pending count unavailable");
            }
        }
    }
}

#[async_trait]
impl ReconnectHook for SyncCoordinator {
    async fn on_reconnect(&self) {
        if let Err(err) = self.drain().await {
            tracing::error!(target: "offline::sync", error = %err, "reconnect drain failed");
        }
    }
}
