#![forbid(unsafe_code)]

//! Observable LIFO and FIFO containers.
//!
//! [`ObservableContainer<T, D>`] stores items in a [`VecDeque`] and exposes a
//! removal discipline chosen at the type level: [`Lifo`] for stacks and
//! [`Fifo`] for queues. Every mutation attempt raises a [`MutationEvent`] on
//! one of three channels (added, removed, cleared), whether or not it had an
//! effect.
//!
//! # Invariants
//!
//! 1. An absent item (`None`) is never stored. `add(None)` is a rejected
//!    operation: no error, no state change, a `succeeded = false` event.
//! 2. `remove()` on an empty container is a soft failure: it returns `None`
//!    and raises a `succeeded = false` event.
//! 3. `peek()` on an empty container is a hard failure
//!    ([`ContainerError::EmptyContainer`]). The asymmetry with `remove()` is
//!    intentional and preserved.
//! 4. Events fire synchronously, in operation order, on the caller's stack.
//!    Each event's count is the length after the attempt.
//! 5. Iteration yields native order: most recent first for stacks, oldest
//!    first for queues.
//!
//! # Concurrency
//!
//! There is no internal locking. Mutators take `&mut self`, so the borrow
//! checker enforces a single writer and rejects mutation during iteration.
//! Subscribers are `Send + Sync`, so a container can be shared across
//! threads behind an external `Mutex`.
//!
//! # Failure Modes
//!
//! - A panicking added-subscriber aborts `add` before the item is stored.
//! - A panicking removed-subscriber unwinds after the item has left the
//!   container; the item is dropped with the unwind.
//!
//! # Example
//!
//! ```rust
//! use murmur_collections::ObservableStack;
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let mut stack: ObservableStack<&str> = ObservableStack::new();
//!
//! let log = Arc::clone(&seen);
//! stack.on_added().subscribe(move |e| {
//!     log.lock().unwrap().push((e.count(), e.succeeded()));
//! });
//!
//! stack.push("a");
//! stack.add(None);
//! assert_eq!(*seen.lock().unwrap(), vec![(1, true), (1, false)]);
//! assert_eq!(stack.pop(), Some("a"));
//! assert_eq!(stack.pop(), None);
//! ```

use std::collections::VecDeque;
use std::collections::vec_deque;
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use murmur_core::guard::{ensure_ge, ensure_le, ensure_present};
use murmur_core::ArgumentError;
use tracing::trace;

use crate::channel::EventChannel;
use crate::event::{MutationEvent, MutationKind};

/// Errors raised by container operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    /// A construction or copy argument was rejected.
    #[error(transparent)]
    InvalidArgument(#[from] ArgumentError),
    /// `peek()` was called on an empty container.
    #[error("the container is empty")]
    EmptyContainer,
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Lifo {}
    impl Sealed for super::Fifo {}
}

/// Removal discipline of a container.
///
/// Items are always appended at the back of the underlying deque; the
/// discipline decides which end removal and iteration start from.
pub trait Discipline: sealed::Sealed + fmt::Debug + Default + Send + Sync + 'static {
    /// Short name used in logs and `Debug` output.
    const NAME: &'static str;

    /// `true` when native order runs from the back of the deque.
    const BACK_FIRST: bool;

    /// Remove the next item.
    fn take<T>(items: &mut VecDeque<T>) -> Option<T>;

    /// Borrow the next item.
    fn next<T>(items: &VecDeque<T>) -> Option<&T>;
}

/// Last in, first out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lifo;

/// First in, first out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fifo;

impl Discipline for Lifo {
    const NAME: &'static str = "lifo";
    const BACK_FIRST: bool = true;

    fn take<T>(items: &mut VecDeque<T>) -> Option<T> {
        items.pop_back()
    }

    fn next<T>(items: &VecDeque<T>) -> Option<&T> {
        items.back()
    }
}

impl Discipline for Fifo {
    const NAME: &'static str = "fifo";
    const BACK_FIRST: bool = false;

    fn take<T>(items: &mut VecDeque<T>) -> Option<T> {
        items.pop_front()
    }

    fn next<T>(items: &VecDeque<T>) -> Option<&T> {
        items.front()
    }
}

/// A stack that notifies on push, pop and clear.
pub type ObservableStack<T> = ObservableContainer<T, Lifo>;

/// A queue that notifies on enqueue, dequeue and clear.
pub type ObservableQueue<T> = ObservableContainer<T, Fifo>;

/// Sequential container with a fixed discipline and mutation events.
pub struct ObservableContainer<T, D: Discipline> {
    items: VecDeque<T>,
    added: EventChannel<MutationEvent<T>>,
    removed: EventChannel<MutationEvent<T>>,
    cleared: EventChannel<MutationEvent<T>>,
    _discipline: PhantomData<D>,
}

impl<T: fmt::Debug, D: Discipline> fmt::Debug for ObservableContainer<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableContainer")
            .field("discipline", &D::NAME)
            .field("items", &DebugItems(self))
            .field("added", &self.added)
            .field("removed", &self.removed)
            .field("cleared", &self.cleared)
            .finish()
    }
}

struct DebugItems<'a, T, D: Discipline>(&'a ObservableContainer<T, D>);

impl<T: fmt::Debug, D: Discipline> fmt::Debug for DebugItems<'_, T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl<T, D: Discipline> Default for ObservableContainer<T, D> {
    fn default() -> Self {
        Self::from_deque(VecDeque::new())
    }
}

impl<T, D: Discipline> ObservableContainer<T, D> {
    fn from_deque(items: VecDeque<T>) -> Self {
        Self {
            items,
            added: EventChannel::new(MutationKind::Added.as_str()),
            removed: EventChannel::new(MutationKind::Removed.as_str()),
            cleared: EventChannel::new(MutationKind::Cleared.as_str()),
            _discipline: PhantomData,
        }
    }

    /// Create an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty container with room for `capacity` items.
    ///
    /// The hint is advisory: if the room cannot be reserved the container
    /// starts unreserved instead of aborting.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut items = VecDeque::new();
        if let Err(err) = items.try_reserve(capacity) {
            trace!(discipline = D::NAME, capacity, %err, "capacity hint not reserved");
        }
        Self::from_deque(items)
    }

    /// Create an empty container from a signed capacity hint.
    ///
    /// # Errors
    ///
    /// [`ContainerError::InvalidArgument`] if `capacity` is negative or more
    /// room than can be allocated.
    pub fn try_with_capacity(capacity: isize) -> Result<Self, ContainerError> {
        let capacity = ensure_ge(capacity, "capacity", 0)
            .map_err(|e| e.with_details("need a non-negative number"))?
            .unsigned_abs();
        let mut items = VecDeque::new();
        items
            .try_reserve(capacity)
            .map_err(|err| ArgumentError::OutOfRange {
                name: "capacity",
                value: capacity.to_string(),
                details: format!("cannot reserve room: {err}"),
            })?;
        Ok(Self::from_deque(items))
    }

    /// Create a container holding a copy of `source`, added in order.
    ///
    /// For a stack the last source item ends up on top; for a queue the first
    /// source item is at the front. No events fire.
    ///
    /// # Errors
    ///
    /// [`ContainerError::InvalidArgument`] if `source` is `None`.
    pub fn try_from_source<I>(source: Option<I>) -> Result<Self, ContainerError>
    where
        I: IntoIterator<Item = T>,
    {
        let source = ensure_present(source, "source")?;
        Ok(source.into_iter().collect())
    }

    /// Attempt to add an item.
    ///
    /// Returns `true` if the item was stored. `None` is rejected: the
    /// container is unchanged and a `succeeded = false` event is raised.
    pub fn add(&mut self, item: Option<T>) -> bool {
        let Some(item) = item else {
            trace!(discipline = D::NAME, count = self.items.len(), "rejected absent item");
            self.added
                .emit(&MutationEvent::rejected(MutationKind::Added, self.items.len()));
            return false;
        };

        let event = MutationEvent::added(self.items.len() + 1, item);
        self.added.emit(&event);
        if let Some(item) = event.into_value() {
            self.items.push_back(item);
        }
        true
    }

    /// Remove the next item according to the discipline.
    ///
    /// An empty container yields `None` and a `succeeded = false` event;
    /// this never fails.
    pub fn remove(&mut self) -> Option<T> {
        let Some(item) = D::take(&mut self.items) else {
            trace!(discipline = D::NAME, "remove on empty container");
            self.removed
                .emit(&MutationEvent::rejected(MutationKind::Removed, 0));
            return None;
        };

        let event = MutationEvent::removed(self.items.len(), item);
        self.removed.emit(&event);
        event.into_value()
    }

    /// Borrow the item the next `remove()` would return.
    ///
    /// # Errors
    ///
    /// [`ContainerError::EmptyContainer`] if there is nothing to peek at.
    pub fn peek(&self) -> Result<&T, ContainerError> {
        D::next(&self.items).ok_or(ContainerError::EmptyContainer)
    }

    /// Remove every item and raise a cleared event.
    pub fn clear(&mut self) {
        self.items.clear();
        self.cleared.emit(&MutationEvent::cleared());
    }

    /// Number of stored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Allocated room, as reported by the underlying deque.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Whether an equal item is stored.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.contains(item)
    }

    /// Lazily iterate in native order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.items.iter(),
            back_first: D::BACK_FIRST,
        }
    }

    /// Materialize the items in native order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Copy the items, in native order, into `buffer` starting at `offset`.
    ///
    /// # Errors
    ///
    /// [`ContainerError::InvalidArgument`] if `offset` lies past the end of
    /// `buffer` or the remaining space cannot hold every item. Nothing is
    /// written in that case.
    pub fn copy_to(&self, buffer: &mut [T], offset: usize) -> Result<(), ContainerError>
    where
        T: Clone,
    {
        let offset = ensure_le(offset, "offset", buffer.len())?;
        ensure_ge(buffer.len() - offset, "buffer", self.items.len())
            .map_err(|e| e.with_details("destination is too small for the container"))?;
        for (slot, item) in buffer[offset..].iter_mut().zip(self.iter()) {
            slot.clone_from(item);
        }
        Ok(())
    }

    /// Channel raised by [`add`](Self::add).
    pub fn on_added(&mut self) -> &mut EventChannel<MutationEvent<T>> {
        &mut self.added
    }

    /// Channel raised by [`remove`](Self::remove).
    pub fn on_removed(&mut self) -> &mut EventChannel<MutationEvent<T>> {
        &mut self.removed
    }

    /// Channel raised by [`clear`](Self::clear).
    pub fn on_cleared(&mut self) -> &mut EventChannel<MutationEvent<T>> {
        &mut self.cleared
    }
}

impl<T> ObservableContainer<T, Lifo> {
    /// Push onto the top of the stack.
    pub fn push(&mut self, item: T) -> bool {
        self.add(Some(item))
    }

    /// Pop from the top of the stack.
    pub fn pop(&mut self) -> Option<T> {
        self.remove()
    }
}

impl<T> ObservableContainer<T, Fifo> {
    /// Enqueue at the back of the queue.
    pub fn enqueue(&mut self, item: T) -> bool {
        self.add(Some(item))
    }

    /// Dequeue from the front of the queue.
    pub fn dequeue(&mut self) -> Option<T> {
        self.remove()
    }
}

impl<T, D: Discipline> FromIterator<T> for ObservableContainer<T, D> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_deque(iter.into_iter().collect())
    }
}

/// Adds each item through [`ObservableContainer::add`], so events fire.
impl<T, D: Discipline> Extend<T> for ObservableContainer<T, D> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(Some(item));
        }
    }
}

impl<'a, T, D: Discipline> IntoIterator for &'a ObservableContainer<T, D> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, D: Discipline> IntoIterator for ObservableContainer<T, D> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.items.into_iter(),
            back_first: D::BACK_FIRST,
        }
    }
}

/// Borrowing iterator in native order.
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    inner: vec_deque::Iter<'a, T>,
    back_first: bool,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.back_first {
            self.inner.next_back()
        } else {
            self.inner.next()
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.back_first {
            self.inner.next()
        } else {
            self.inner.next_back()
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Owning iterator in native order.
#[derive(Debug)]
pub struct IntoIter<T> {
    inner: vec_deque::IntoIter<T>,
    back_first: bool,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.back_first {
            self.inner.next_back()
        } else {
            self.inner.next()
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.back_first {
            self.inner.next()
        } else {
            self.inner.next_back()
        }
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Discipline, ObservableContainer};

    /// Serialized as a sequence in native order.
    impl<T: Serialize, D: Discipline> Serialize for ObservableContainer<T, D> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.iter())
        }
    }

    /// Read back from a native-order sequence; subscribers are not restored.
    impl<'de, T: Deserialize<'de>, D: Discipline> Deserialize<'de> for ObservableContainer<T, D> {
        fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
            let mut items = Vec::<T>::deserialize(deserializer)?;
            if D::BACK_FIRST {
                items.reverse();
            }
            Ok(items.into_iter().collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Log<T> = Arc<Mutex<Vec<MutationEvent<T>>>>;

    fn record<T: Clone + Send + 'static>(channel: &mut EventChannel<MutationEvent<T>>) -> Log<T> {
        let log: Log<T> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        channel.subscribe(move |e: &MutationEvent<T>| sink.lock().unwrap().push(e.clone()));
        log
    }

    #[test]
    fn stack_pops_in_reverse_push_order() {
        let mut stack = ObservableStack::new();
        for c in ['a', 'b', 'c'] {
            assert!(stack.push(c));
        }
        assert_eq!(stack.pop(), Some('c'));
        assert_eq!(stack.pop(), Some('b'));
        assert_eq!(stack.pop(), Some('a'));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn queue_dequeues_in_enqueue_order() {
        let mut queue = ObservableQueue::new();
        for c in ['a', 'b', 'c'] {
            assert!(queue.enqueue(c));
        }
        assert_eq!(queue.dequeue(), Some('a'));
        assert_eq!(queue.dequeue(), Some('b'));
        assert_eq!(queue.dequeue(), Some('c'));
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn add_event_reports_count_after() {
        let mut queue: ObservableQueue<i32> = ObservableQueue::new();
        let log = record(queue.on_added());
        queue.enqueue(1);
        queue.enqueue(2);
        assert_eq!(
            *log.lock().unwrap(),
            vec![MutationEvent::added(1, 1), MutationEvent::added(2, 2)]
        );
    }

    #[test]
    fn absent_item_is_rejected_softly() {
        let mut stack: ObservableStack<String> = ObservableStack::new();
        stack.push("x".to_owned());
        let log = record(stack.on_added());

        assert!(!stack.add(None));
        assert_eq!(stack.len(), 1);
        assert_eq!(
            *log.lock().unwrap(),
            vec![MutationEvent::rejected(MutationKind::Added, 1)]
        );
    }

    #[test]
    fn remove_on_empty_is_soft_failure() {
        let mut queue: ObservableQueue<u8> = ObservableQueue::new();
        let log = record(queue.on_removed());

        assert_eq!(queue.remove(), None);
        assert_eq!(queue.len(), 0);
        let events = log.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(!events[0].succeeded());
        assert_eq!(events[0].count(), 0);
        assert_eq!(events[0].value(), None);
    }

    #[test]
    fn remove_event_carries_item() {
        let mut stack = ObservableStack::from_iter([1, 2, 3]);
        let log = record(stack.on_removed());
        assert_eq!(stack.pop(), Some(3));
        assert_eq!(*log.lock().unwrap(), vec![MutationEvent::removed(2, 3)]);
    }

    #[test]
    fn peek_on_empty_is_hard_failure() {
        let stack: ObservableStack<u8> = ObservableStack::new();
        assert_eq!(stack.peek(), Err(ContainerError::EmptyContainer));
    }

    #[test]
    fn peek_matches_next_remove_without_mutating() {
        let mut queue = ObservableQueue::from_iter(["a", "b"]);
        assert_eq!(queue.peek(), Ok(&"a"));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dequeue(), Some("a"));

        let mut stack = ObservableStack::from_iter(["a", "b"]);
        assert_eq!(stack.peek(), Ok(&"b"));
        assert_eq!(stack.pop(), Some("b"));
    }

    #[test]
    fn clear_always_fires() {
        let mut stack: ObservableStack<u8> = ObservableStack::new();
        let log = record(stack.on_cleared());
        stack.clear();
        stack.push(4);
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(
            *log.lock().unwrap(),
            vec![MutationEvent::cleared(), MutationEvent::cleared()]
        );
    }

    #[test]
    fn negative_capacity_is_invalid() {
        let err = ObservableQueue::<u8>::try_with_capacity(-4).unwrap_err();
        assert!(matches!(
            err,
            ContainerError::InvalidArgument(ArgumentError::OutOfRange { name: "capacity", .. })
        ));
        let ok = ObservableQueue::<u8>::try_with_capacity(14).unwrap();
        assert!(ok.is_empty());
        assert!(ok.capacity() >= 14);
    }

    #[test]
    fn oversized_capacity_is_reported_not_panicked() {
        let err = ObservableQueue::<u64>::try_with_capacity(isize::MAX).unwrap_err();
        assert!(matches!(
            err,
            ContainerError::InvalidArgument(ArgumentError::OutOfRange { name: "capacity", .. })
        ));

        let advisory = ObservableStack::<u64>::with_capacity(usize::MAX);
        assert!(advisory.is_empty());
    }

    #[test]
    fn absent_source_is_invalid() {
        let err = ObservableStack::<u8>::try_from_source(None::<Vec<u8>>).unwrap_err();
        assert!(matches!(
            err,
            ContainerError::InvalidArgument(ArgumentError::Missing { name: "source", .. })
        ));
    }

    #[test]
    fn source_round_trip_follows_discipline() {
        let queue = ObservableQueue::try_from_source(Some(vec![1, 2, 3])).unwrap();
        assert_eq!(queue.to_vec(), vec![1, 2, 3]);
        assert_eq!(queue.peek(), Ok(&1));

        let stack = ObservableStack::try_from_source(Some(vec![1, 2, 3])).unwrap();
        assert_eq!(stack.to_vec(), vec![3, 2, 1]);
        assert_eq!(stack.peek(), Ok(&3));
    }

    #[test]
    fn queries_fire_no_events() {
        let mut stack = ObservableStack::from_iter([1, 2]);
        let added = record(stack.on_added());
        let removed = record(stack.on_removed());
        let cleared = record(stack.on_cleared());

        assert!(stack.contains(&1));
        assert!(!stack.contains(&9));
        let _ = stack.peek();
        let _ = stack.to_vec();
        let _ = stack.iter().count();

        assert!(added.lock().unwrap().is_empty());
        assert!(removed.lock().unwrap().is_empty());
        assert!(cleared.lock().unwrap().is_empty());
    }

    #[test]
    fn copy_to_respects_offset() {
        let stack = ObservableStack::from_iter([1, 2, 3]);
        let mut buf = [0; 5];
        stack.copy_to(&mut buf, 1).unwrap();
        assert_eq!(buf, [0, 3, 2, 1, 0]);
    }

    #[test]
    fn copy_to_rejects_short_buffer_without_writing() {
        let queue = ObservableQueue::from_iter([1, 2, 3]);
        let mut buf = [0; 3];
        assert!(queue.copy_to(&mut buf, 1).is_err());
        assert!(queue.copy_to(&mut buf, 4).is_err());
        assert_eq!(buf, [0, 0, 0]);
    }

    #[test]
    fn iteration_is_native_order_and_exact() {
        let stack = ObservableStack::from_iter([1, 2, 3]);
        let it = stack.iter();
        assert_eq!(it.len(), 3);
        assert_eq!(it.collect::<Vec<_>>(), vec![&3, &2, &1]);
        assert_eq!(stack.iter().rev().copied().collect::<Vec<_>>(), vec![1, 2, 3]);

        let queue = ObservableQueue::from_iter([1, 2, 3]);
        assert_eq!((&queue).into_iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(queue.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(stack.into_iter().collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn extend_fires_per_item() {
        let mut queue: ObservableQueue<u8> = ObservableQueue::new();
        let log = record(queue.on_added());
        queue.extend([5, 6]);
        assert_eq!(log.lock().unwrap().len(), 2);
        assert_eq!(queue.to_vec(), vec![5, 6]);
    }

    #[test]
    fn events_follow_operation_order_across_channels() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut stack: ObservableStack<u8> = ObservableStack::new();
        let o = Arc::clone(&order);
        stack.on_added().subscribe(move |e| o.lock().unwrap().push(("add", e.count())));
        let o = Arc::clone(&order);
        stack.on_removed().subscribe(move |e| o.lock().unwrap().push(("remove", e.count())));
        let o = Arc::clone(&order);
        stack.on_cleared().subscribe(move |e| o.lock().unwrap().push(("clear", e.count())));

        stack.push(1);
        stack.push(2);
        stack.pop();
        stack.clear();
        stack.pop();
        assert_eq!(
            *order.lock().unwrap(),
            vec![("add", 1), ("add", 2), ("remove", 1), ("clear", 0), ("remove", 0)]
        );
    }

    #[test]
    fn debug_lists_native_order() {
        let stack = ObservableStack::from_iter([1, 2]);
        let s = format!("{stack:?}");
        assert!(s.contains("lifo"));
        assert!(s.contains("[2, 1]"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn rejections_are_traced() {
        let mut queue: ObservableQueue<u8> = ObservableQueue::new();
        queue.add(None);
        queue.remove();
        assert!(logs_contain("rejected absent item"));
        assert!(logs_contain("remove on empty container"));
    }

    #[test]
    fn shareable_behind_mutex() {
        let queue = Arc::new(Mutex::new(ObservableQueue::new()));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let q = Arc::clone(&queue);
                std::thread::spawn(move || {
                    for j in 0..25 {
                        q.lock().unwrap().enqueue(i * 100 + j);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(queue.lock().unwrap().len(), 100);
    }
}
