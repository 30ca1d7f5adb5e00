#![forbid(unsafe_code)]

//! Non-reentrant drain loop from a [`BufferedSink`] to a consumer.
//!
//! A [`SinkPump`] subscribes to the sink's item-available notification. The
//! first notification that finds the pump idle claims it (atomic
//! `Idle -> Draining`) and forwards fragments, oldest first, until the sink is
//! empty. Notifications that arrive while a drain is running, whether from the
//! consumer itself appending to the sink or from another thread, return
//! immediately; the running drain picks up their fragments.
//!
//! # Invariants
//!
//! 1. At most one drain loop runs per pump at any moment.
//! 2. Fragments reach the consumer in append order, exactly once each.
//! 3. The pump is back to [`PumpState::Idle`] after every drain, including
//!    one that ends in a consumer error or panic.
//! 4. A fragment appended by another thread just as the drainer goes idle is
//!    not stranded: the drainer re-checks the sink after releasing.
//!
//! # Failure Modes
//!
//! - A consumer error stops the drain and surfaces from the `append` that
//!   triggered it as [`SinkError::Consumer`]. The rejected fragment is gone;
//!   fragments behind it stay buffered and go out on the next drain.
//! - An `append` from a second thread while a drain is running returns before
//!   its fragment is forwarded.

use std::fmt;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use murmur_collections::SubscriptionId;
use tracing::{debug, debug_span, trace, warn};

use crate::sink::{BoxError, BufferedSink, SinkError, WeakSink};

const IDLE: u8 = 0;
const DRAINING: u8 = 1;

/// Observable pump state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PumpState {
    Idle,
    Draining,
}

impl PumpState {
    fn from_raw(raw: u8) -> Self {
        if raw == DRAINING {
            Self::Draining
        } else {
            Self::Idle
        }
    }
}

type Consumer = Box<dyn FnMut(String) -> Result<(), BoxError> + Send>;

struct PumpCore {
    sink: WeakSink,
    state: AtomicU8,
    consumer: Mutex<Consumer>,
    forwarded: AtomicU64,
}

/// Claims the drain slot; releases it when dropped.
struct DrainGuard<'a> {
    state: &'a AtomicU8,
}

impl<'a> DrainGuard<'a> {
    fn acquire(state: &'a AtomicU8) -> Option<Self> {
        state
            .compare_exchange(IDLE, DRAINING, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { state })
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.state.store(IDLE, Ordering::Release);
    }
}

impl PumpCore {
    fn drain(&self) -> Result<usize, SinkError> {
        let Some(sink) = self.sink.upgrade() else {
            return Ok(0);
        };
        let mut total = 0;
        loop {
            let Some(guard) = DrainGuard::acquire(&self.state) else {
                trace!("drain already running; fragment left for it");
                return Ok(total);
            };
            let _span = debug_span!("sink_pump_drain").entered();
            while let Some(fragment) = sink.dequeue_oldest() {
                self.forward(fragment)?;
                total += 1;
            }
            drop(guard);
            if sink.is_empty() {
                if total > 0 {
                    trace!(total, "drain finished");
                }
                return Ok(total);
            }
        }
    }

    fn forward(&self, fragment: String) -> Result<(), SinkError> {
        // A consumer that panicked earlier poisons this lock; keep pumping.
        let mut consumer = self.consumer.lock().unwrap_or_else(PoisonError::into_inner);
        consumer(fragment).map_err(|err| {
            warn!(error = %err, "fragment consumer failed");
            SinkError::Consumer(err)
        })?;
        self.forwarded.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Forwards every fragment appended to a [`BufferedSink`] to a consumer.
///
/// Dropping the pump unsubscribes it. The pump holds the sink weakly, so it
/// never keeps a sink alive on its own.
///
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use murmur_io::{BufferedSink, SinkPump};
///
/// let sink = BufferedSink::new();
/// let out = Arc::new(Mutex::new(String::new()));
/// let o = Arc::clone(&out);
/// let _pump = SinkPump::forwarding(&sink, move |s| o.lock().unwrap().push_str(&s));
///
/// sink.append("a").unwrap();
/// sink.append("b").unwrap();
/// assert_eq!(*out.lock().unwrap(), "ab");
/// assert!(sink.is_empty());
/// ```
pub struct SinkPump {
    core: Arc<PumpCore>,
    subscription: SubscriptionId,
}

impl fmt::Debug for SinkPump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkPump")
            .field("state", &self.state())
            .field("forwarded", &self.forwarded())
            .field("subscription", &self.subscription)
            .finish()
    }
}

impl SinkPump {
    /// Bind a fallible consumer to `sink`.
    ///
    /// Fragments already buffered are not forwarded until the next append or
    /// an explicit [`drain_now`](Self::drain_now).
    pub fn new<F>(sink: &BufferedSink, consumer: F) -> Self
    where
        F: FnMut(String) -> Result<(), BoxError> + Send + 'static,
    {
        let core = Arc::new(PumpCore {
            sink: sink.downgrade(),
            state: AtomicU8::new(IDLE),
            consumer: Mutex::new(Box::new(consumer)),
            forwarded: AtomicU64::new(0),
        });
        let handler_core = Arc::clone(&core);
        let subscription = sink.subscribe_available(move |_| handler_core.drain().map(|_| ()));
        debug!(?subscription, "sink pump bound");
        Self { core, subscription }
    }

    /// Bind an infallible consumer to `sink`.
    pub fn forwarding<F>(sink: &BufferedSink, mut consumer: F) -> Self
    where
        F: FnMut(String) + Send + 'static,
    {
        Self::new(sink, move |fragment| {
            consumer(fragment);
            Ok(())
        })
    }

    /// Drain whatever is buffered right now.
    ///
    /// Returns the number of fragments this call forwarded; `0` if another
    /// drain is running or the sink is gone.
    pub fn drain_now(&self) -> Result<usize, SinkError> {
        self.core.drain()
    }

    #[must_use]
    pub fn state(&self) -> PumpState {
        PumpState::from_raw(self.core.state.load(Ordering::Acquire))
    }

    /// Total fragments successfully handed to the consumer.
    #[must_use]
    pub fn forwarded(&self) -> u64 {
        self.core.forwarded.load(Ordering::Relaxed)
    }

    /// Whether the sink this pump drains is still alive.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.core.sink.upgrade().is_some()
    }
}

impl Drop for SinkPump {
    fn drop(&mut self) {
        if let Some(sink) = self.core.sink.upgrade() {
            sink.unsubscribe_available(self.subscription);
            debug!(subscription = ?self.subscription, "sink pump unbound");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    fn collector() -> (Arc<Mutex<Vec<String>>>, impl FnMut(String) + Send + 'static) {
        let out = Arc::new(Mutex::new(Vec::new()));
        let o = Arc::clone(&out);
        (out, move |s| o.lock().unwrap().push(s))
    }

    #[test]
    fn forwards_in_append_order() {
        let sink = BufferedSink::new();
        let (out, consume) = collector();
        let pump = SinkPump::forwarding(&sink, consume);

        for s in ["1", "2", "3"] {
            sink.append(s).unwrap();
        }
        assert_eq!(*out.lock().unwrap(), vec!["1", "2", "3"]);
        assert!(sink.is_empty());
        assert_eq!(pump.forwarded(), 3);
        assert_eq!(pump.state(), PumpState::Idle);
    }

    #[test]
    fn reentrant_append_is_drained_by_outer_loop() {
        let sink = BufferedSink::new();
        let out = Arc::new(Mutex::new(Vec::new()));
        let depth = Arc::new(AtomicUsize::new(0));
        let max_depth = Arc::new(AtomicUsize::new(0));

        let inner = sink.clone();
        let (o, d, m) = (Arc::clone(&out), Arc::clone(&depth), Arc::clone(&max_depth));
        let pump = SinkPump::new(&sink, move |s| {
            let now = d.fetch_add(1, Ordering::SeqCst) + 1;
            m.fetch_max(now, Ordering::SeqCst);
            if s == "x" {
                inner.append("y")?;
            }
            o.lock().unwrap().push(s);
            d.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        });

        sink.append("x").unwrap();
        assert_eq!(*out.lock().unwrap(), vec!["x", "y"]);
        assert_eq!(max_depth.load(Ordering::SeqCst), 1);
        assert!(sink.is_empty());
        assert_eq!(pump.state(), PumpState::Idle);
    }

    #[test]
    fn consumer_error_surfaces_and_pump_recovers() {
        let sink = BufferedSink::new();
        let (out, mut consume) = collector();
        let pump = SinkPump::new(&sink, move |s| {
            if s == "bad" {
                return Err("rejected".into());
            }
            consume(s);
            Ok(())
        });

        let err = sink.append("bad").unwrap_err();
        assert!(matches!(err, SinkError::Consumer(_)));
        assert_eq!(pump.state(), PumpState::Idle);

        sink.append("good").unwrap();
        assert_eq!(*out.lock().unwrap(), vec!["good"]);
        assert!(sink.is_empty());
    }

    #[test]
    fn fragments_behind_a_failure_stay_buffered() {
        let sink = BufferedSink::new();
        for s in ["a", "b", "c"] {
            sink.append(s).unwrap();
        }
        let (out, mut consume) = collector();
        let pump = SinkPump::new(&sink, move |s| {
            if s == "b" {
                return Err("transient".into());
            }
            consume(s);
            Ok(())
        });

        assert!(pump.drain_now().is_err());
        assert_eq!(sink.len(), 1);
        assert_eq!(pump.drain_now().unwrap(), 1);
        assert_eq!(*out.lock().unwrap(), vec!["a", "c"]);
        assert_eq!(pump.forwarded(), 2);
    }

    #[test]
    fn drain_now_forwards_preexisting_fragments() {
        let sink = BufferedSink::new();
        sink.append("early").unwrap();
        let (out, consume) = collector();
        let pump = SinkPump::forwarding(&sink, consume);
        assert!(out.lock().unwrap().is_empty());

        assert_eq!(pump.drain_now().unwrap(), 1);
        assert_eq!(*out.lock().unwrap(), vec!["early"]);
        assert_eq!(pump.drain_now().unwrap(), 0);
    }

    #[test]
    fn drop_unsubscribes() {
        let sink = BufferedSink::new();
        let (out, consume) = collector();
        let pump = SinkPump::forwarding(&sink, consume);
        assert_eq!(sink.subscriber_count(), 1);
        drop(pump);
        assert_eq!(sink.subscriber_count(), 0);

        sink.append("kept").unwrap();
        assert!(out.lock().unwrap().is_empty());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn pump_does_not_keep_sink_alive() {
        let sink = BufferedSink::new();
        let pump = SinkPump::forwarding(&sink, |_| {});
        assert!(pump.is_bound());
        drop(sink);
        assert!(!pump.is_bound());
        assert_eq!(pump.drain_now().unwrap(), 0);
    }

    #[test]
    fn panicking_consumer_releases_drain_slot() {
        let sink = BufferedSink::new();
        let (out, mut consume) = collector();
        let pump = SinkPump::forwarding(&sink, move |s| {
            if s == "boom" {
                panic!("consumer panic");
            }
            consume(s);
        });

        let s = sink.clone();
        let joined = thread::spawn(move || s.append("boom")).join();
        assert!(joined.is_err());
        assert_eq!(pump.state(), PumpState::Idle);

        sink.append("after").unwrap();
        assert_eq!(*out.lock().unwrap(), vec!["after"]);
    }

    #[test]
    fn concurrent_producers_lose_nothing() {
        let sink = BufferedSink::new();
        let (out, consume) = collector();
        let pump = SinkPump::forwarding(&sink, consume);

        let producers: Vec<_> = (0..4)
            .map(|t| {
                let sink = sink.clone();
                thread::spawn(move || {
                    for i in 0..250 {
                        sink.append(format!("{t}:{i}")).unwrap();
                    }
                })
            })
            .collect();
        for p in producers {
            p.join().unwrap();
        }
        pump.drain_now().unwrap();

        let out = out.lock().unwrap();
        assert_eq!(out.len(), 1000);
        assert!(sink.is_empty());
        for t in 0..4 {
            let prefix = format!("{t}:");
            let seq: Vec<usize> = out
                .iter()
                .filter_map(|s| s.strip_prefix(&prefix))
                .map(|n| n.parse().unwrap())
                .collect();
            assert_eq!(seq, (0..250).collect::<Vec<_>>());
        }
    }
}
