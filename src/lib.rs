//! Offline queue and sync engine for the Curaflow home-care practice client.
//!
//! Domain writes that cannot reach the hosted backend are queued in an
//! embedded SQLite database and replayed, in order, when connectivity comes
//! back. The host injects its backend, notification surface and network
//! status source; see [`OfflineRuntime`].

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
mod state;

pub use application::ports::{
    ConnectivitySource, Notice, OfflineStore, RemoteBackend, TracingNotifier, UserNotifier,
};
pub use application::services::{
    ConnectivityMonitor, OfflineService, QueueGauge, ReconnectHook, SubmitOutcome,
    SyncCoordinator, SyncStatusSnapshot,
};
pub use domain::entities::{
    CareSnapshot, DrainOutcome, DrainReport, FailedOperation, PendingOperation,
    PendingOperationDraft, SnapshotPatch,
};
pub use domain::value_objects::{
    ConnectivityState, EntityKind, OperationId, OperationKind, OperationPayload,
};
pub use infrastructure::connectivity::{HostStatusHandle, HostStatusSource};
pub use infrastructure::database::{Database, DbPool};
pub use infrastructure::offline::SqliteOfflineStore;
pub use shared::config::{Config, DatabaseConfig, SyncConfig};
pub use shared::error::AppError;
pub use state::OfflineRuntime;
