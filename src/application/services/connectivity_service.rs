use crate::application::ports::{ConnectivitySource, Notice, UserNotifier};
use crate::domain::value_objects::ConnectivityState;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

/// Invoked once per `Offline -> Online` edge.
#[async_trait]
pub trait ReconnectHook: Send + Sync {
    async fn on_reconnect(&self);
}

/// Tracks the host's connectivity as a two-state machine driven exclusively
/// by source events. Repeated deliveries of the current state are ignored;
/// the reconnect hook fires on actual edges only.
pub struct ConnectivityMonitor {
    source: Arc<dyn ConnectivitySource>,
    notifier: Arc<dyn UserNotifier>,
    state_tx: watch::Sender<ConnectivityState>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectivityMonitor {
    pub fn new(source: Arc<dyn ConnectivitySource>, notifier: Arc<dyn UserNotifier>) -> Self {
        let initial = source.current();
        let (state_tx, _) = watch::channel(initial);
        Self {
            source,
            notifier,
            state_tx,
            listener: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ConnectivityState {
        *self.state_tx.borrow()
    }

    /// Push-based observation for the UI indicator.
    pub fn watch_state(&self) -> watch::Receiver<ConnectivityState> {
        self.state_tx.subscribe()
    }

    /// Subscribe to the source and start dispatching edges. A second call
    /// replaces the previous listener.
    pub async fn start(&self, hook: Arc<dyn ReconnectHook>) {
        let mut events = self.source.subscribe();
        let state_tx = self.state_tx.clone();
        let notifier = self.notifier.clone();

        let handle = tokio::spawn(async move {
            let mut last = *state_tx.borrow();
            while let Some(next) = events.recv().await {
                if next == last {
                    // Some environments re-deliver the current status.
                    continue;
                }
                last = next;
                state_tx.send_replace(next);
                match next {
                    ConnectivityState::Online => {
                        tracing::info!(target: "offline::connectivity", "reconnect edge");
                        notifier.notify(Notice::BackOnline);
                        hook.on_reconnect().await;
                    }
                    ConnectivityState::Offline => {
                        tracing::warn!(target: "offline::connectivity", "connection lost");
                        notifier.notify(Notice::OfflineDetected);
                    }
                }
            }
        });

        let mut slot = self.listener.lock().await;
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    pub async fn shutdown(&self) {
        if let Some(handle) = self.listener.lock().await.take() {
            handle.abort();
        }
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.listener.try_lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::connectivity::HostStatusSource;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use tokio::time::{sleep, Duration};

    struct CountingHook {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReconnectHook for CountingHook {
        async fn on_reconnect(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct RecordingNotifier {
        notices: StdMutex<Vec<Notice>>,
    }

    impl RecordingNotifier {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                notices: StdMutex::new(Vec::new()),
            })
        }

        fn collected(&self) -> Vec<Notice> {
            self.notices.lock().unwrap().clone()
        }
    }

    impl UserNotifier for RecordingNotifier {
        fn notify(&self, notice: Notice) {
            self.notices.lock().unwrap().push(notice);
        }
    }

    async fn settle() {
        sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn duplicate_online_events_fire_hook_once() {
        let source = HostStatusSource::new(false);
        let handle = source.handle();
        let notifier = RecordingNotifier::new();
        let monitor = ConnectivityMonitor::new(source, notifier.clone());
        let hook = Arc::new(CountingHook {
            calls: AtomicUsize::new(0),
        });

        monitor.start(hook.clone()).await;
        assert_eq!(monitor.state(), ConnectivityState::Offline);

        handle.set_connected(true);
        handle.set_connected(true);
        settle().await;

        assert_eq!(hook.calls.load(Ordering::SeqCst), 1);
        assert_eq!(monitor.state(), ConnectivityState::Online);

        monitor.shutdown().await;
    }

    #[tokio::test]
    async fn each_edge_fires_hook_again() {
        let source = HostStatusSource::new(false);
        let handle = source.handle();
        let monitor = ConnectivityMonitor::new(source, RecordingNotifier::new());
        let hook = Arc::new(CountingHook {
            calls: AtomicUsize::new(0),
        });

        monitor.start(hook.clone()).await;

        handle.set_connected(true);
        settle().await;
        handle.set_connected(false);
        settle().await;
        handle.set_connected(true);
        settle().await;

        assert_eq!(hook.calls.load(Ordering::SeqCst), 2);

        monitor.shutdown().await;
    }

    #[tokio::test]
    async fn going_offline_notifies_without_hook() {
        let source = HostStatusSource::new(true);
        let handle = source.handle();
        let notifier = RecordingNotifier::new();
        let monitor = ConnectivityMonitor::new(source, notifier.clone());
        let hook = Arc::new(CountingHook {
            calls: AtomicUsize::new(0),
        });

        monitor.start(hook.clone()).await;

        handle.set_connected(false);
        settle().await;

        assert_eq!(hook.calls.load(Ordering::SeqCst), 0);
        assert_eq!(monitor.state(), ConnectivityState::Offline);
        assert_eq!(notifier.collected(), vec![Notice::OfflineDetected]);

        monitor.shutdown().await;
    }

    #[tokio::test]
    async fn shutdown_stops_event_delivery() {
        let source = HostStatusSource::new(false);
        let handle = source.handle();
        let monitor = ConnectivityMonitor::new(source, RecordingNotifier::new());
        let hook = Arc::new(CountingHook {
            calls: AtomicUsize::new(0),
        });

        monitor.start(hook.clone()).await;
        monitor.shutdown().await;

        handle.set_connected(true);
        settle().await;

        assert_eq!(hook.calls.load(Ordering::SeqCst), 0);
    }
}
