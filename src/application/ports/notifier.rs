use crate::domain::value_objects::{EntityKind, OperationKind};
use serde::{Deserialize, Serialize};

/// Transient, non-blocking notices surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    OfflineDetected,
    BackOnline,
    OperationQueued {
        entity: EntityKind,
        operation: OperationKind,
    },
    SyncStarted {
        count: u32,
    },
    SyncCompleted {
        synced: u32,
    },
    SyncFailed {
        synced: u32,
        retried: u32,
        dead_lettered: u32,
    },
}

pub trait UserNotifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Default notifier: structured log lines instead of a toast surface.
pub struct TracingNotifier;

impl UserNotifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match &notice {
            Notice::OfflineDetected => {
                tracing::warn!(target: "offline::notify", "connection lost, queueing writes locally");
            }
            Notice::BackOnline => {
                tracing::info!(target: "offline::notify", "connection restored");
            }
            Notice::OperationQueued { entity, operation } => {
                tracing::info!(
                    target: "offline::notify",
                    entity = %entity,
                    operation = %operation,
                    "write queued for later synchronization"
                );
            }
            Notice::SyncStarted { count } => {
                tracing::info!(target: "offline::notify", count, "synchronizing queued writes");
            }
            Notice::SyncCompleted { synced } => {
                tracing::info!(target: "offline::notify", synced, "synchronization completed");
            }
            Notice::SyncFailed {
                synced,
                retried,
                dead_lettered,
            } => {
                tracing::warn!(
                    target: "offline::notify",
                    synced,
                    retried,
                    dead_lettered,
                    "synchronization finished with failures"
                );
            }
        }
    }
}
