pub mod connectivity_source;
pub mod notifier;
pub mod offline_store;
pub mod remote_backend;

pub use connectivity_source::ConnectivitySource;
pub use notifier::{Notice, TracingNotifier, UserNotifier};
pub use offline_store::OfflineStore;
pub use remote_backend::RemoteBackend;
