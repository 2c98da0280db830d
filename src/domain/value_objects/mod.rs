pub mod connectivity;
pub mod entity_kind;
pub mod operation_id;
pub mod operation_kind;
pub mod operation_payload;

pub use connectivity::ConnectivityState;
pub use entity_kind::EntityKind;
pub use operation_id::OperationId;
pub use operation_kind::OperationKind;
pub use operation_payload::OperationPayload;
