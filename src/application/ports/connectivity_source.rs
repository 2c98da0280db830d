use crate::domain::value_objects::ConnectivityState;
use tokio::sync::mpsc;

/// Where connectivity events come from. The host wires whichever source its
/// environment provides (native shell push events, window events, a test
/// handle); the monitor never polls.
pub trait ConnectivitySource: Send + Sync {
    /// Current status, read synchronously at startup.
    fn current(&self) -> ConnectivityState;

    /// Stream of status events. Sources may re-deliver the current state;
    /// de-duplication is the monitor's job.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<ConnectivityState>;
}
