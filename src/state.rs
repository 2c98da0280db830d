use crate::application::ports::offline_store::OfflineStore;
use crate::application::ports::{ConnectivitySource, RemoteBackend, UserNotifier};
use crate::application::services::{
    ConnectivityMonitor, OfflineService, QueueGauge, SyncCoordinator, SyncStatusSnapshot,
};
use crate::domain::entities::DrainReport;
use crate::infrastructure::database::{Database, DbPool};
use crate::infrastructure::offline::SqliteOfflineStore;
use crate::shared::config::Config;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::info;

/// The offline subsystem as one explicitly constructed object: the host
/// creates it with its backend, notifier and connectivity source, calls
/// `init`, and disposes it on shutdown. Nothing in this crate lives in
/// module-level state.
pub struct OfflineRuntime {
    config: Config,
    pool: DbPool,
    monitor: Arc<ConnectivityMonitor>,
    coordinator: Arc<SyncCoordinator>,
    offline: Arc<OfflineService>,
}

impl std::fmt::Debug for OfflineRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineRuntime")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OfflineRuntime {
    /// Open storage and wire the services. A [`AppError::StorageUnavailable`]
    /// here means the environment has no working embedded database; the host
    /// should continue without a runtime in always-online mode.
    pub async fn create(
        config: Config,
        backend: Arc<dyn RemoteBackend>,
        notifier: Arc<dyn UserNotifier>,
        source: Arc<dyn ConnectivitySource>,
    ) -> Result<Arc<Self>, AppError> {
        config.validate().map_err(AppError::Configuration)?;

        let pool = Database::initialize(&config.database).await?;
        let store = Arc::new(SqliteOfflineStore::new(pool.clone()));

        let initial_depth = store.pending_count().await.unwrap_or(0);
        let gauge = Arc::new(QueueGauge::new(initial_depth));

        let monitor = Arc::new(ConnectivityMonitor::new(source, notifier.clone()));
        let coordinator = Arc::new(SyncCoordinator::new(
            store.clone(),
            backend.clone(),
            notifier.clone(),
            monitor.watch_state(),
            gauge.clone(),
            config.sync.clone(),
        ));
        let offline = Arc::new(OfflineService::new(
            store,
            backend,
            notifier,
            monitor.watch_state(),
            gauge,
        ));

        Ok(Arc::new(Self {
            config,
            pool,
            monitor,
            coordinator,
            offline,
        }))
    }

    /// Start listening for connectivity edges (a reconnect edge triggers an
    /// automatic drain) and run one catch-up drain if the host comes up
    /// online with work left over from an earlier session.
    pub async fn init(self: &Arc<Self>) -> Result<(), AppError> {
        self.monitor.start(self.coordinator.clone()).await;
        info!(target: "offline::runtime", state = ?self.monitor.state(), "offline runtime started");

        if self.config.sync.drain_on_init && self.monitor.state().is_online() {
            self.coordinator.on_startup_drain().await;
        }
        Ok(())
    }

    /// The domain write path and snapshot cache.
    pub fn offline(&self) -> &Arc<OfflineService> {
        &self.offline
    }

    pub fn connectivity(&self) -> &Arc<ConnectivityMonitor> {
        &self.monitor
    }

    /// Manual "sync now" trigger. Coalesces with any drain already running.
    pub async fn drain_now(&self) -> Result<DrainReport, AppError> {
        self.coordinator.drain().await
    }

    pub async fn sync_status(&self) -> SyncStatusSnapshot {
        self.coordinator.status().await
    }

    /// Stop the connectivity listener and close the database. Idempotent.
    pub async fn dispose(&self) {
        self.monitor.shutdown().await;
        self.pool.close().await;
        info!(target: "offline::runtime", "offline runtime disposed");
    }
}
