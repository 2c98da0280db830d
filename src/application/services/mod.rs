pub mod connectivity_service;
pub mod offline_service;
pub mod sync_service;

pub use connectivity_service::{ConnectivityMonitor, ReconnectHook};
pub use offline_service::{OfflineService, QueueGauge, SubmitOutcome};
pub use sync_service::{SyncCoordinator, SyncStatusSnapshot};
