use crate::application::ports::ConnectivitySource;
use crate::domain::value_objects::ConnectivityState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Connectivity source fed by the embedding shell. Whatever the host listens
/// to (native network-status plugin, window online/offline events), it pushes
/// the raw booleans through a [`HostStatusHandle`]; duplicate deliveries are
/// fine, the monitor de-duplicates.
pub struct HostStatusSource {
    connected: AtomicBool,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<ConnectivityState>>>,
}

impl HostStatusSource {
    pub fn new(initially_connected: bool) -> Arc<Self> {
        Arc::new(Self {
            connected: AtomicBool::new(initially_connected),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    pub fn handle(self: &Arc<Self>) -> HostStatusHandle {
        HostStatusHandle {
            source: Arc::clone(self),
        }
    }

    fn publish(&self, state: ConnectivityState) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        subscribers.retain(|tx| tx.send(state).is_ok());
    }
}

impl ConnectivitySource for HostStatusSource {
    fn current(&self) -> ConnectivityState {
        ConnectivityState::from_connected(self.connected.load(Ordering::SeqCst))
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<ConnectivityState> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(tx);
        rx
    }
}

/// Cloneable writer half the host shell keeps.
#[derive(Clone)]
pub struct HostStatusHandle {
    source: Arc<HostStatusSource>,
}

impl HostStatusHandle {
    pub fn set_connected(&self, connected: bool) {
        self.source.connected.store(connected, Ordering::SeqCst);
        self.source
            .publish(ConnectivityState::from_connected(connected));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_status_changes_to_subscribers() {
        let source = HostStatusSource::new(true);
        let handle = source.handle();
        let mut rx = source.subscribe();

        assert_eq!(source.current(), ConnectivityState::Online);

        handle.set_connected(false);
        assert_eq!(rx.recv().await, Some(ConnectivityState::Offline));
        assert_eq!(source.current(), ConnectivityState::Offline);
    }

    #[tokio::test]
    async fn dropped_subscribers_are_pruned() {
        let source = HostStatusSource::new(false);
        let handle = source.handle();

        let rx = source.subscribe();
        drop(rx);
        handle.set_connected(true);

        let mut live = source.subscribe();
        handle.set_connected(false);
        assert_eq!(live.recv().await, Some(ConnectivityState::Offline));
    }
}
