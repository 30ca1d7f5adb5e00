#![forbid(unsafe_code)]

//! Append-only FIFO buffer of text fragments.
//!
//! A [`BufferedSink`] is a cheap, cloneable handle: clones share the same
//! buffer and subscriber list. Every successful append raises an
//! [`ItemAvailable`] notification, synchronously, before `append` returns.
//!
//! # Invariants
//!
//! 1. Fragments leave the buffer in the order they were appended.
//! 2. An absent fragment is ignored: nothing is buffered and no notification
//!    fires.
//! 3. No lock is held while subscribers run, so a subscriber (or anything it
//!    calls) may append to the same sink again.
//!
//! # Failure Modes
//!
//! - A failing subscriber aborts notification of later subscribers and its
//!   error is returned from the `append` that triggered it. The fragment
//!   stays buffered.
//!
//! # Example
//!
//! ```rust
//! use murmur_io::BufferedSink;
//!
//! let sink = BufferedSink::new();
//! sink.append("hello ").unwrap();
//! sink.append_opt(None).unwrap();
//! sink.append_line("world").unwrap();
//!
//! assert_eq!(sink.len(), 2);
//! assert_eq!(sink.dequeue_oldest().as_deref(), Some("hello "));
//! assert_eq!(sink.dequeue_oldest().as_deref(), Some("world\n"));
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use murmur_collections::{EventChannel, SubscriptionId};
use tracing::trace;

/// Boxed error returned by fragment consumers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for sink, pump and redirect operations.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// A consumer rejected a forwarded fragment.
    #[error("fragment consumer failed: {0}")]
    Consumer(#[source] BoxError),
    /// An output redirect is already installed. Only one can be active at a time.
    #[error("an output redirect is already installed")]
    AlreadyRedirected,
    /// A global lock was poisoned (another thread panicked while holding it).
    #[error("output redirect lock was poisoned")]
    PoisonedLock,
}

/// Notification raised after each successful append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemAvailable {
    /// Fragments buffered right after the append.
    pub pending: usize,
}

type AvailableChannel = EventChannel<ItemAvailable, Result<(), SinkError>>;

/// Configuration for a [`BufferedSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Terminator added by [`BufferedSink::append_line`].
    pub newline: String,
    /// Fragments to reserve room for up front.
    pub initial_capacity: usize,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            newline: "\n".to_owned(),
            initial_capacity: 0,
        }
    }
}

impl SinkConfig {
    /// Use a different line terminator (e.g. `"\r\n"`).
    #[must_use]
    pub fn with_newline(mut self, newline: impl Into<String>) -> Self {
        self.newline = newline.into();
        self
    }

    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}

struct SinkShared {
    buffer: Mutex<VecDeque<String>>,
    /// Incomplete UTF-8 sequence left over from the last byte write.
    utf8_tail: Mutex<Vec<u8>>,
    available: Mutex<AvailableChannel>,
    config: SinkConfig,
}

/// Shared FIFO buffer of text fragments with an item-available channel.
#[derive(Clone)]
pub struct BufferedSink {
    shared: Arc<SinkShared>,
}

/// Non-owning handle to a [`BufferedSink`].
#[derive(Clone)]
pub(crate) struct WeakSink {
    shared: Weak<SinkShared>,
}

impl WeakSink {
    pub(crate) fn upgrade(&self) -> Option<BufferedSink> {
        self.shared.upgrade().map(|shared| BufferedSink { shared })
    }
}

impl fmt::Debug for BufferedSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferedSink")
            .field("pending", &self.len())
            .field("subscriber_count", &self.subscriber_count())
            .field("config", &self.shared.config)
            .finish()
    }
}

impl Default for BufferedSink {
    fn default() -> Self {
        Self::with_config(SinkConfig::default())
    }
}

// Neither lock is ever held while user code runs, so a poisoned guard can only
// come from an allocation failure mid-push; the data is still consistent.
fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl BufferedSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sink from `config`.
    ///
    /// `initial_capacity` is a hint: if the room cannot be reserved the sink
    /// starts empty and grows on demand.
    #[must_use]
    pub fn with_config(config: SinkConfig) -> Self {
        let mut buffer = VecDeque::new();
        if let Err(err) = buffer.try_reserve(config.initial_capacity) {
            trace!(capacity = config.initial_capacity, %err, "capacity hint not reserved");
        }
        Self {
            shared: Arc::new(SinkShared {
                buffer: Mutex::new(buffer),
                utf8_tail: Mutex::new(Vec::new()),
                available: Mutex::new(EventChannel::new("item-available")),
                config,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SinkConfig {
        &self.shared.config
    }

    /// Buffer a fragment and notify subscribers.
    ///
    /// # Errors
    ///
    /// Propagates the first subscriber error (typically
    /// [`SinkError::Consumer`] from a [`SinkPump`](crate::SinkPump)).
    pub fn append(&self, fragment: impl Into<String>) -> Result<(), SinkError> {
        self.append_opt(Some(fragment.into()))
    }

    /// Buffer a fragment if present; `None` is ignored without notification.
    pub fn append_opt(&self, fragment: Option<String>) -> Result<(), SinkError> {
        let Some(fragment) = fragment else {
            return Ok(());
        };
        let pending = {
            let mut buffer = relock(&self.shared.buffer);
            buffer.push_back(fragment);
            buffer.len()
        };
        trace!(pending, "fragment buffered");
        self.notify(ItemAvailable { pending })
    }

    /// Buffer `fragment` followed by the configured newline, as one fragment.
    pub fn append_line(&self, fragment: impl AsRef<str>) -> Result<(), SinkError> {
        let mut line = String::with_capacity(fragment.as_ref().len() + self.shared.config.newline.len());
        line.push_str(fragment.as_ref());
        line.push_str(&self.shared.config.newline);
        self.append(line)
    }

    /// Remove and return the oldest fragment.
    ///
    /// Returns `None` when the buffer is empty; drainers check
    /// [`len`](Self::len) or loop until `None`.
    pub fn dequeue_oldest(&self) -> Option<String> {
        relock(&self.shared.buffer).pop_front()
    }

    /// Discard every pending fragment without forwarding it.
    ///
    /// Returns the number of fragments dropped. No notification fires.
    pub fn flush(&self) -> usize {
        let mut buffer = relock(&self.shared.buffer);
        let dropped = buffer.len();
        buffer.clear();
        dropped
    }

    /// Number of buffered fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        relock(&self.shared.buffer).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        relock(&self.shared.buffer).is_empty()
    }

    /// Register an item-available subscriber.
    pub fn subscribe_available(
        &self,
        handler: impl Fn(&ItemAvailable) -> Result<(), SinkError> + Send + Sync + 'static,
    ) -> SubscriptionId {
        relock(&self.shared.available).subscribe(handler)
    }

    /// Remove one item-available registration.
    pub fn unsubscribe_available(&self, id: SubscriptionId) -> bool {
        relock(&self.shared.available).unsubscribe(id)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        relock(&self.shared.available).subscriber_count()
    }

    /// Whether two handles share the same buffer.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    pub(crate) fn downgrade(&self) -> WeakSink {
        WeakSink {
            shared: Arc::downgrade(&self.shared),
        }
    }

    fn notify(&self, event: ItemAvailable) -> Result<(), SinkError> {
        // Snapshot so handlers can subscribe, unsubscribe or append re-entrantly.
        let handlers = relock(&self.shared.available).handlers();
        for handler in handlers {
            handler(&event)?;
        }
        Ok(())
    }
}

/// Each `write_str` call becomes one fragment.
impl fmt::Write for BufferedSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s).map_err(|_| fmt::Error)
    }
}

/// Decode `bytes` behind whatever incomplete sequence `tail` still holds.
///
/// Invalid bytes become U+FFFD. A trailing sequence cut short is left in
/// `tail` for the next call.
fn decode_utf8(tail: &mut Vec<u8>, bytes: &[u8]) -> String {
    tail.extend_from_slice(bytes);
    let mut text = String::with_capacity(tail.len());
    let mut start = 0;
    while start < tail.len() {
        match std::str::from_utf8(&tail[start..]) {
            Ok(valid) => {
                text.push_str(valid);
                start = tail.len();
            }
            Err(err) => {
                let end = start + err.valid_up_to();
                text.push_str(&String::from_utf8_lossy(&tail[start..end]));
                let Some(invalid) = err.error_len() else {
                    start = end;
                    break;
                };
                text.push(char::REPLACEMENT_CHARACTER);
                start = end + invalid;
            }
        }
    }
    tail.drain(..start);
    text
}

/// Each `write` call becomes at most one fragment, decoded as UTF-8.
///
/// A multi-byte character split across writes is held back until its
/// remaining bytes arrive; invalid bytes become U+FFFD. `flush` emits a
/// held-back partial character as U+FFFD and does not discard anything;
/// use [`BufferedSink::flush`] for that.
impl io::Write for BufferedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // The tail lock is released before subscribers run.
        let text = decode_utf8(&mut relock(&self.shared.utf8_tail), buf);
        if !text.is_empty() {
            self.append(text).map_err(io::Error::other)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let tail = std::mem::take(&mut *relock(&self.shared.utf8_tail));
        if !tail.is_empty() {
            self.append(String::from_utf8_lossy(&tail).into_owned())
                .map_err(io::Error::other)?;
        }
        Ok(())
    }
}
