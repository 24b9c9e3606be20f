//! Contract event fan-out.
//!
//! [`EventHub`] is the observer registry between an event source (the
//! [`poller::LogPoller`] for a live node, or a test chain) and the feeds that
//! react to events. Sources publish decoded batches; listeners are plain
//! callbacks registered and removed explicitly, with no UI lifecycle involved.

#[cfg(feature = "http")]
pub mod poller;

use crate::contract::ContractEvent;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Callback invoked with every published batch.
pub type Listener = Arc<dyn Fn(&[ContractEvent]) + Send + Sync>;

/// Handle returned by [`EventHub::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
pub struct EventHub {
    listeners: RwLock<Vec<(ListenerId, Listener)>>,
    next_id: AtomicU64,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for all future batches.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&[ContractEvent]) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((id, Arc::new(listener)));
        tracing::debug!("Event listener {:?} registered", id);
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        let removed = listeners.len() != before;
        if removed {
            tracing::debug!("Event listener {:?} removed", id);
        }
        removed
    }

    /// Deliver a batch to every listener, in registration order.
    pub fn publish(&self, batch: &[ContractEvent]) {
        if batch.is_empty() {
            return;
        }

        // Listeners run outside the lock so they may (un)subscribe.
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        tracing::trace!(
            events = batch.len(),
            listeners = listeners.len(),
            "Publishing event batch"
        );
        for listener in listeners {
            listener(batch);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

// ─── Refresh tasks ───────────────────────────────────────────────────────────

/// Run `refresh` once immediately, then again after every published batch
/// containing an event that `wants` accepts.
///
/// Batches that arrive while a refresh is running collapse into a single
/// follow-up refresh. Must be called inside a tokio runtime.
pub fn spawn_refresh<W, F, Fut>(hub: Arc<EventHub>, wants: W, mut refresh: F) -> RefreshHandle
where
    W: Fn(&ContractEvent) -> bool + Send + Sync + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let wake = Arc::new(Notify::new());

    let listener = {
        let wake = Arc::clone(&wake);
        hub.subscribe(move |batch| {
            if batch.iter().any(&wants) {
                wake.notify_one();
            }
        })
    };

    let task = tokio::spawn(async move {
        refresh().await;
        loop {
            wake.notified().await;
            refresh().await;
        }
    });

    RefreshHandle {
        hub,
        listener,
        task,
    }
}

/// A running refresh task. Dropping it unregisters the listener and stops
/// the task.
pub struct RefreshHandle {
    hub: Arc<EventHub>,
    listener: ListenerId,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.listener);
        self.task.abort();
    }
}

impl std::fmt::Debug for RefreshHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshHandle")
            .field("listener", &self.listener)
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::LogMeta;
    use alloy_primitives::Address;
    use std::sync::atomic::AtomicUsize;

    fn activity() -> ContractEvent {
        ContractEvent::Activity {
            meta: LogMeta::new(Address::ZERO),
            topic0: None,
        }
    }

    #[test]
    fn test_publish_reaches_all_listeners() {
        let hub = EventHub::new();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..2 {
            let hits = Arc::clone(&hits);
            hub.subscribe(move |batch| {
                hits.fetch_add(batch.len(), Ordering::SeqCst);
            });
        }
        hub.publish(&[activity(), activity()]);
        assert_eq!(hits.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let hub = EventHub::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let id = {
            let hits = Arc::clone(&hits);
            hub.subscribe(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };
        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id));
        hub.publish(&[activity()]);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_empty_batch_is_not_delivered() {
        let hub = EventHub::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        hub.subscribe(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        hub.publish(&[]);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_refresh_runs_once_then_per_wanted_batch() {
        let hub = Arc::new(EventHub::new());
        let runs = Arc::new(AtomicUsize::new(0));
        let handle = {
            let runs = Arc::clone(&runs);
            spawn_refresh(
                Arc::clone(&hub),
                |e| e.address() == Address::ZERO,
                move || {
                    let runs = Arc::clone(&runs);
                    async move {
                        runs.fetch_add(1, Ordering::SeqCst);
                    }
                },
            )
        };

        while runs.load(Ordering::SeqCst) < 1 {
            tokio::task::yield_now().await;
        }
        hub.publish(&[activity()]);
        while runs.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }
        assert!(handle.is_running());
        drop(handle);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_listener_may_unsubscribe_itself() {
        let hub = Arc::new(EventHub::new());
        let slot: Arc<RwLock<Option<ListenerId>>> = Arc::new(RwLock::new(None));
        let id = {
            let hub = Arc::clone(&hub);
            let slot = Arc::clone(&slot);
            hub.clone().subscribe(move |_| {
                if let Some(id) = *slot.read().unwrap() {
                    hub.unsubscribe(id);
                }
            })
        };
        *slot.write().unwrap() = Some(id);
        hub.publish(&[activity()]);
        assert_eq!(hub.listener_count(), 0);
    }
}
