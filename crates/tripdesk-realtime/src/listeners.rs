//! Listener registry: per-event handler sets with handle-based removal.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::types::{EventName, RealtimeEvent};

/// A listener callback. Handlers run on the task that produced the event.
pub type Handler = Arc<dyn Fn(&RealtimeEvent) + Send + Sync>;

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    by_event: HashMap<EventName, BTreeMap<u64, Handler>>,
}

/// Shared table of listeners keyed by event name.
#[derive(Clone, Default)]
pub(crate) struct ListenerRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

fn lock(inner: &Mutex<RegistryInner>) -> MutexGuard<'_, RegistryInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `event`. Every call gets its own slot, so the
    /// same `Arc` registered twice runs twice per event.
    pub(crate) fn add(&self, event: EventName, handler: Handler) -> Subscription {
        let mut inner = lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.by_event.entry(event).or_default().insert(id, handler);
        Subscription {
            registry: Arc::downgrade(&self.inner),
            event,
            id,
        }
    }

    /// Invoke every handler registered for the event's name.
    ///
    /// Handlers are snapshotted first and called without the lock held, so a
    /// handler may subscribe or unsubscribe while it runs. Returns the number
    /// of handlers invoked.
    pub(crate) fn emit(&self, event: &RealtimeEvent) -> usize {
        // Ids are handed out in increasing order, so this is registration order.
        let handlers: Vec<Handler> = {
            let inner = lock(&self.inner);
            match inner.by_event.get(&event.name()) {
                Some(set) => set.values().cloned().collect(),
                None => return 0,
            }
        };
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    pub(crate) fn count(&self, event: EventName) -> usize {
        lock(&self.inner)
            .by_event
            .get(&event)
            .map_or(0, BTreeMap::len)
    }
}

/// Handle returned by `subscribe`. Dropping it does not unsubscribe.
pub struct Subscription {
    registry: Weak<Mutex<RegistryInner>>,
    event: EventName,
    id: u64,
}

impl Subscription {
    pub fn event(&self) -> EventName {
        self.event
    }

    /// Remove this listener. Returns `false` if it was already removed or the
    /// client is gone.
    pub fn unsubscribe(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut inner = lock(&registry);
        let Some(set) = inner.by_event.get_mut(&self.event) else {
            return false;
        };
        let removed = set.remove(&self.id).is_some();
        if set.is_empty() {
            inner.by_event.remove(&self.event);
        }
        removed
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .field("id", &self.id)
            .finish()
    }
}

/// Several subscriptions released together.
#[derive(Debug, Default)]
pub struct SubscriptionGroup {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionGroup {
    pub(crate) fn new(subscriptions: Vec<Subscription>) -> Self {
        Self { subscriptions }
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Unsubscribe every member; returns how many were still registered.
    pub fn unsubscribe_all(&self) -> usize {
        self.subscriptions
            .iter()
            .filter(|s| s.unsubscribe())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, Handler) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let handler: Handler = Arc::new(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        (hits, handler)
    }

    fn trip() -> RealtimeEvent {
        RealtimeEvent::TripUpdate(serde_json::json!({"id": 1}))
    }

    #[test]
    fn emit_reaches_every_listener_once() {
        let registry = ListenerRegistry::new();
        let (a, ha) = counter();
        let (b, hb) = counter();
        registry.add(EventName::TripUpdate, ha);
        registry.add(EventName::TripUpdate, hb);

        assert_eq!(registry.emit(&trip()), 2);
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn emit_without_listeners_is_noop() {
        let registry = ListenerRegistry::new();
        assert_eq!(registry.emit(&trip()), 0);
    }

    #[test]
    fn other_event_names_are_not_invoked() {
        let registry = ListenerRegistry::new();
        let (hits, handler) = counter();
        registry.add(EventName::UserUpdate, handler);
        registry.emit(&trip());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn same_handler_twice_runs_twice() {
        let registry = ListenerRegistry::new();
        let (hits, handler) = counter();
        registry.add(EventName::TripUpdate, Arc::clone(&handler));
        registry.add(EventName::TripUpdate, handler);
        registry.emit(&trip());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unsubscribe_removes_only_that_slot() {
        let registry = ListenerRegistry::new();
        let (hits, handler) = counter();
        let first = registry.add(EventName::TripUpdate, Arc::clone(&handler));
        let _second = registry.add(EventName::TripUpdate, handler);

        assert!(first.unsubscribe());
        assert!(!first.unsubscribe());
        registry.emit(&trip());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(registry.count(EventName::TripUpdate), 1);
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let registry = ListenerRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for n in 0..12 {
            let order = Arc::clone(&order);
            registry.add(
                EventName::TripUpdate,
                Arc::new(move |_| order.lock().unwrap().push(n)),
            );
        }
        registry.emit(&trip());
        assert_eq!(*order.lock().unwrap(), (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn unsubscribe_after_registry_dropped() {
        let registry = ListenerRegistry::new();
        let (_, handler) = counter();
        let sub = registry.add(EventName::Error, handler);
        drop(registry);
        assert!(!sub.unsubscribe());
    }

    #[test]
    fn handler_may_unsubscribe_itself_during_emit() {
        let registry = ListenerRegistry::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let hits = Arc::new(AtomicUsize::new(0));

        let slot_in = Arc::clone(&slot);
        let hits_in = Arc::clone(&hits);
        let sub = registry.add(
            EventName::TripUpdate,
            Arc::new(move |_| {
                hits_in.fetch_add(1, Ordering::SeqCst);
                if let Some(sub) = slot_in.lock().unwrap().take() {
                    sub.unsubscribe();
                }
            }),
        );
        *slot.lock().unwrap() = Some(sub);

        registry.emit(&trip());
        registry.emit(&trip());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn group_unsubscribes_all_members() {
        let registry = ListenerRegistry::new();
        let (hits, handler) = counter();
        let group = SubscriptionGroup::new(
            EventName::ALL
                .into_iter()
                .map(|name| registry.add(name, Arc::clone(&handler)))
                .collect(),
        );
        assert_eq!(group.len(), 5);
        assert_eq!(group.unsubscribe_all(), 5);
        assert_eq!(group.unsubscribe_all(), 0);

        registry.emit(&trip());
        registry.emit(&RealtimeEvent::Error("x".into()));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
