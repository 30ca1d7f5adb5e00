#![forbid(unsafe_code)]

//! Untyped observable containers.
//!
//! [`DynamicObservableContainer<D>`] stores [`serde_json::Value`] items and is
//! a thin adapter over [`ObservableContainer<Value, D>`]: every mutation,
//! event and query goes through the typed core, so both surfaces behave
//! identically.
//!
//! `Value::Null` plays the role of "no item" on this surface:
//!
//! - `add(Value::Null)` is rejected (`succeeded = false`, nothing stored).
//! - `remove()` on an empty container returns `Value::Null`.
//!
//! Because null is never stored, a `Value::Null` returned from `remove()`
//! always means the container was empty. The event's `succeeded` flag is the
//! authoritative signal for subscribers.

use serde_json::Value;

use crate::channel::EventChannel;
use crate::container::{ContainerError, Discipline, Fifo, Iter, Lifo, ObservableContainer};
use crate::event::MutationEvent;

/// Untyped stack.
pub type DynamicStack = DynamicObservableContainer<Lifo>;

/// Untyped queue.
pub type DynamicQueue = DynamicObservableContainer<Fifo>;

/// Observable container of untyped values.
#[derive(Debug, Default)]
pub struct DynamicObservableContainer<D: Discipline> {
    inner: ObservableContainer<Value, D>,
}

impl<D: Discipline> DynamicObservableContainer<D> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: ObservableContainer::with_capacity(capacity),
        }
    }

    /// See [`ObservableContainer::try_with_capacity`].
    pub fn try_with_capacity(capacity: isize) -> Result<Self, ContainerError> {
        Ok(Self {
            inner: ObservableContainer::try_with_capacity(capacity)?,
        })
    }

    /// Copy `source` in order, skipping null entries.
    ///
    /// # Errors
    ///
    /// [`ContainerError::InvalidArgument`] if `source` is `None`.
    pub fn try_from_source<I>(source: Option<I>) -> Result<Self, ContainerError>
    where
        I: IntoIterator<Item = Value>,
    {
        let source = source.map(|items| items.into_iter().filter(|v| !v.is_null()));
        Ok(Self {
            inner: ObservableContainer::try_from_source(source)?,
        })
    }

    /// Build from a JSON array given in native order (top first for stacks).
    ///
    /// # Errors
    ///
    /// [`ContainerError::InvalidArgument`] if `json` is null or not an array.
    pub fn from_json(json: Value) -> Result<Self, ContainerError> {
        let items = match json {
            Value::Array(mut items) => {
                if D::BACK_FIRST {
                    items.reverse();
                }
                Some(items)
            }
            Value::Null => None,
            other => {
                return Err(murmur_core::ArgumentError::Invalid {
                    name: "json",
                    details: format!("expected an array, found {other}"),
                }
                .into());
            }
        };
        Self::try_from_source(items)
    }

    /// The items as a JSON array in native order.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Array(self.inner.to_vec())
    }

    /// Attempt to add an item; `Value::Null` is rejected.
    pub fn add(&mut self, item: Value) -> bool {
        let item = (!item.is_null()).then_some(item);
        self.inner.add(item)
    }

    /// Remove the next item, or `Value::Null` when empty.
    pub fn remove(&mut self) -> Value {
        self.inner.remove().unwrap_or(Value::Null)
    }

    /// See [`ObservableContainer::peek`].
    pub fn peek(&self) -> Result<&Value, ContainerError> {
        self.inner.peek()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[must_use]
    pub fn contains(&self, item: &Value) -> bool {
        self.inner.contains(item)
    }

    pub fn iter(&self) -> Iter<'_, Value> {
        self.inner.iter()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.inner.to_vec()
    }

    /// See [`ObservableContainer::copy_to`].
    pub fn copy_to(&self, buffer: &mut [Value], offset: usize) -> Result<(), ContainerError> {
        self.inner.copy_to(buffer, offset)
    }

    pub fn on_added(&mut self) -> &mut EventChannel<MutationEvent<Value>> {
        self.inner.on_added()
    }

    pub fn on_removed(&mut self) -> &mut EventChannel<MutationEvent<Value>> {
        self.inner.on_removed()
    }

    pub fn on_cleared(&mut self) -> &mut EventChannel<MutationEvent<Value>> {
        self.inner.on_cleared()
    }

    /// Borrow the typed core.
    #[must_use]
    pub fn as_inner(&self) -> &ObservableContainer<Value, D> {
        &self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> ObservableContainer<Value, D> {
        self.inner
    }
}

impl DynamicObservableContainer<Lifo> {
    pub fn push(&mut self, item: Value) -> bool {
        self.add(item)
    }

    pub fn pop(&mut self) -> Value {
        self.remove()
    }
}

impl DynamicObservableContainer<Fifo> {
    pub fn enqueue(&mut self, item: Value) -> bool {
        self.add(item)
    }

    pub fn dequeue(&mut self) -> Value {
        self.remove()
    }
}

impl<D: Discipline> From<ObservableContainer<Value, D>> for DynamicObservableContainer<D> {
    fn from(inner: ObservableContainer<Value, D>) -> Self {
        Self { inner }
    }
}

/// Null entries are skipped.
impl<D: Discipline> FromIterator<Value> for DynamicObservableContainer<D> {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().filter(|v| !v.is_null()).collect(),
        }
    }
}

impl<'a, D: Discipline> IntoIterator for &'a DynamicObservableContainer<D> {
    type Item = &'a Value;
    type IntoIter = Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
