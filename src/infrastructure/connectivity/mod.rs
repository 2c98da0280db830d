pub mod host_source;

pub use host_source::{HostStatusHandle, HostStatusSource};
