#![forbid(unsafe_code)]

//! Named multicast event channels.
//!
//! An [`EventChannel`] holds an ordered list of subscriber handlers. Emitting
//! an event calls every handler synchronously, on the caller's stack, in
//! registration order.
//!
//! # Invariants
//!
//! 1. Handlers run in the order they were subscribed.
//! 2. Every `subscribe*` call yields a distinct [`SubscriptionId`], even when
//!    the same shared handler is registered twice.
//! 3. `unsubscribe` and `unsubscribe_handler` remove at most one
//!    registration each, so a handler registered twice must be removed twice.
//!
//! # Failure Modes
//!
//! - A panicking handler unwinds through `emit`; later handlers do not run.
//! - With fallible handlers, [`EventChannel::try_emit`] stops at the first
//!   error and returns it.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A shared subscriber callback.
///
/// `R` is `()` for plain notifications; fallible channels use a `Result`.
pub type Handler<E, R = ()> = Arc<dyn Fn(&E) -> R + Send + Sync>;

/// Global counter so identifiers never collide across channels.
static SUBSCRIPTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies one registration on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        Self(SUBSCRIPTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw identifier value.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Ordered multicast list of handlers for events of type `E`.
pub struct EventChannel<E, R = ()> {
    name: &'static str,
    subscribers: Vec<(SubscriptionId, Handler<E, R>)>,
}

impl<E, R> fmt::Debug for EventChannel<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("name", &self.name)
            .field("subscriber_count", &self.subscribers.len())
            .finish()
    }
}

impl<E, R> EventChannel<E, R> {
    /// Create an empty channel.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            subscribers: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a closure. It runs after every handler registered before it.
    pub fn subscribe(&mut self, handler: impl Fn(&E) -> R + Send + Sync + 'static) -> SubscriptionId {
        self.subscribe_handler(Arc::new(handler))
    }

    /// Register a shared handler.
    ///
    /// Keep a clone of `handler` to later remove it with
    /// [`unsubscribe_handler`](Self::unsubscribe_handler).
    pub fn subscribe_handler(&mut self, handler: Handler<E, R>) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.subscribers.push((id, handler));
        id
    }

    /// Remove the registration with the given id.
    ///
    /// Returns `false` if no such registration exists on this channel.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.subscribers.iter().position(|(sid, _)| *sid == id) {
            Some(index) => {
                self.subscribers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove the earliest registration of `handler`.
    ///
    /// Returns `false` if the handler is not registered.
    pub fn unsubscribe_handler(&mut self, handler: &Handler<E, R>) -> bool {
        match self
            .subscribers
            .iter()
            .position(|(_, h)| Arc::ptr_eq(h, handler))
        {
            Some(index) => {
                self.subscribers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of live registrations.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }

    /// Clone out the current handlers in registration order.
    ///
    /// Used when the channel lives behind a lock that must not be held while
    /// handlers run.
    #[must_use]
    pub fn handlers(&self) -> Vec<Handler<E, R>> {
        self.subscribers.iter().map(|(_, h)| Arc::clone(h)).collect()
    }
}

impl<E> EventChannel<E> {
    /// Call every handler with `event`, in registration order.
    pub fn emit(&self, event: &E) {
        for (_, handler) in &self.subscribers {
            handler(event);
        }
    }
}

impl<E, Err> EventChannel<E, Result<(), Err>> {
    /// Call handlers in registration order, stopping at the first error.
    pub fn try_emit(&self, event: &E) -> Result<(), Err> {
        for (_, handler) in &self.subscribers {
            handler(event)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Box<dyn Fn(&u32) + Send + Sync>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_for = Arc::clone(&log);
        let make = move |tag: &str| -> Box<dyn Fn(&u32) + Send + Sync> {
            let log = Arc::clone(&log_for);
            let tag = tag.to_owned();
            Box::new(move |v: &u32| log.lock().unwrap().push(format!("{tag}:{v}")))
        };
        (log, make)
    }

    #[test]
    fn emits_in_registration_order() {
        let (log, make) = recorder();
        let mut ch: EventChannel<u32> = EventChannel::new("added");
        let a = make("a");
        let b = make("b");
        ch.subscribe(move |v| a(v));
        ch.subscribe(move |v| b(v));

        ch.emit(&1);
        ch.emit(&2);
        assert_eq!(*log.lock().unwrap(), vec!["a:1", "b:1", "a:2", "b:2"]);
    }

    #[test]
    fn unsubscribe_by_id_removes_one() {
        let (log, make) = recorder();
        let mut ch: EventChannel<u32> = EventChannel::new("removed");
        let a = make("a");
        let b = make("b");
        let id_a = ch.subscribe(move |v| a(v));
        ch.subscribe(move |v| b(v));

        assert!(ch.unsubscribe(id_a));
        assert!(!ch.unsubscribe(id_a));
        ch.emit(&7);
        assert_eq!(*log.lock().unwrap(), vec!["b:7"]);
    }

    #[test]
    fn repeated_subscription_needs_repeated_unsubscription() {
        let hits = Arc::new(Mutex::new(0u32));
        let hits_clone = Arc::clone(&hits);
        let handler: Handler<u32> = Arc::new(move |_: &u32| *hits_clone.lock().unwrap() += 1);

        let mut ch: EventChannel<u32> = EventChannel::new("cleared");
        let first = ch.subscribe_handler(Arc::clone(&handler));
        let second = ch.subscribe_handler(Arc::clone(&handler));
        assert_ne!(first, second);

        ch.emit(&0);
        assert_eq!(*hits.lock().unwrap(), 2);

        assert!(ch.unsubscribe_handler(&handler));
        ch.emit(&0);
        assert_eq!(*hits.lock().unwrap(), 3);

        assert!(ch.unsubscribe_handler(&handler));
        assert!(!ch.unsubscribe_handler(&handler));
        ch.emit(&0);
        assert_eq!(*hits.lock().unwrap(), 3);
        assert!(ch.is_empty());
    }

    #[test]
    fn ids_are_unique_across_channels() {
        let mut a: EventChannel<u8> = EventChannel::new("a");
        let mut b: EventChannel<u8> = EventChannel::new("b");
        let id = a.subscribe(|_| {});
        b.subscribe(|_| {});
        assert!(!b.unsubscribe(id));
        assert_eq!(b.subscriber_count(), 1);
    }

    #[test]
    fn try_emit_stops_at_first_error() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut ch: EventChannel<u8, Result<(), String>> = EventChannel::new("fallible");

        let c1 = Arc::clone(&calls);
        ch.subscribe(move |_| {
            c1.lock().unwrap().push(1);
            Err("boom".to_owned())
        });
        let c2 = Arc::clone(&calls);
        ch.subscribe(move |_| {
            c2.lock().unwrap().push(2);
            Ok(())
        });

        assert_eq!(ch.try_emit(&0), Err("boom".to_owned()));
        assert_eq!(*calls.lock().unwrap(), vec![1]);
    }

    #[test]
    fn handlers_snapshot_preserves_order() {
        let mut ch: EventChannel<u8, u8> = EventChannel::new("snap");
        ch.subscribe(|_| 1);
        ch.subscribe(|_| 2);
        let out: Vec<u8> = ch.handlers().iter().map(|h| h(&0)).collect();
        assert_eq!(out, vec![1, 2]);
    }

    #[test]
    fn debug_shows_name_and_count() {
        let mut ch: EventChannel<u8> = EventChannel::new("added");
        ch.subscribe(|_| {});
        let s = format!("{ch:?}");
        assert!(s.contains("added"));
        assert!(s.contains("subscriber_count: 1"));
    }
}
