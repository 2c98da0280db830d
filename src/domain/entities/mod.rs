pub mod drain_report;
pub mod failed_operation;
pub mod pending_operation;
pub mod snapshot;

pub use drain_report::{DrainOutcome, DrainReport};
pub use failed_operation::FailedOperation;
pub use pending_operation::{PendingOperation, PendingOperationDraft};
pub use snapshot::{CareSnapshot, SnapshotPatch};
