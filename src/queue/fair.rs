//! Fair FIFO queue with first-come-first-served hand-off to blocked consumers
//!
//! ## Design
//!
//! A single mutex guards three pieces of state:
//!
//! - the **item store**, holding values nobody has asked for yet
//! - the **waiter ledger**, the line of parked `dequeue` calls
//! - the `visited` counter of items delivered so far
//!
//! ```text
//!                 ┌──────────── Mutex<State> ────────────┐
//!  enqueue ──────►│ ledger empty? ── yes ──► store.push  │
//!                 │      │ no                            │
//!                 │      └──► ledger.serve_next ─────────┼──► wake ticket #n
//!                 │                                      │
//!  dequeue ──────►│ ledger empty && store non-empty?     │
//!                 │      │ yes ──► store.pop (fast path) │
//!                 │      └ no ───► ledger.register, park │
//!                 └──────────────────────────────────────┘
//! ```
//!
//! While anyone is parked the store is empty: an enqueue that finds a parked
//! caller never stores its item, it earmarks it for the oldest ticket. A new
//! `dequeue` arriving while others are parked therefore joins the line instead
//! of racing them for the store.
//!
//! ## Counter reads
//!
//! [`FairQueue::size`], [`FairQueue::waiting`] and [`FairQueue::visited`] read
//! relaxed atomic mirrors that are refreshed under the lock after every
//! mutation. They never block but are best-effort: a concurrent operation can
//! make the answer stale before the caller looks at it. Use
//! [`FairQueue::stats`] for a snapshot taken under the lock.

use std::time::Instant;

use tracing::{debug, trace};

use super::ledger::WaiterLedger;
use super::store::ItemStore;
use crate::config::QueueConfig;
use crate::metrics::{AtomicMetrics, MetricsCollector, PerformanceMetrics};
use crate::sync::{AtomicUsize, Mutex};
use crate::util::CachePadded;
use crate::{Error, Result};
use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

/// Unbounded multi-producer, multi-consumer queue that serves blocked
/// consumers in arrival order.
///
/// # Ordering Guarantees
///
/// - Items are delivered in the order they were enqueued.
/// - Callers blocked in [`dequeue`](Self::dequeue) are served in the order
///   they blocked. The next item always goes to the longest-waiting caller,
///   and only that caller is woken.
/// - [`try_dequeue`](Self::try_dequeue) never joins the line. It only takes
///   items from the store, which is empty whenever someone is parked, so it
///   cannot take an item meant for a parked caller.
///
/// # Examples
///
/// ```rust
/// use fairq::FairQueue;
/// use std::thread;
///
/// let queue = FairQueue::new();
///
/// thread::scope(|s| {
///     let consumer = s.spawn(|| queue.dequeue());
///     queue.enqueue(7);
///     assert_eq!(consumer.join().unwrap(), 7);
/// });
///
/// assert_eq!(queue.visited(), 1);
/// ```
pub struct FairQueue<T> {
    state: Mutex<State<T>>,
    size: CachePadded<AtomicUsize>,
    waiting: CachePadded<AtomicUsize>,
    visited: CachePadded<AtomicUsize>,
    metrics: AtomicMetrics,
    metrics_enabled: AtomicBool,
    config: QueueConfig,
}

struct State<T> {
    store: ItemStore<T>,
    ledger: WaiterLedger<T>,
    visited: usize,
}

/// Counters read together under the queue lock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Items stored and not yet delivered
    pub size: usize,
    /// Callers parked in `dequeue` that have not been served yet
    pub waiting: usize,
    /// Items delivered by `dequeue` or `try_dequeue` since creation
    pub visited: usize,
    /// Items earmarked for a served caller that has not resumed yet
    pub in_flight: usize,
}

impl<T> FairQueue<T> {
    /// Create an empty queue with default settings
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Create an empty queue with room for `capacity` items before it
    /// reallocates. The queue stays unbounded.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(QueueConfig::default().with_initial_capacity(capacity))
    }

    /// Create an empty queue from `config`
    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            state: Mutex::new(State {
                store: ItemStore::with_capacity(config.initial_capacity),
                ledger: WaiterLedger::new(),
                visited: 0,
            }),
            size: CachePadded::new(AtomicUsize::new(0)),
            waiting: CachePadded::new(AtomicUsize::new(0)),
            visited: CachePadded::new(AtomicUsize::new(0)),
            metrics: AtomicMetrics::default(),
            metrics_enabled: AtomicBool::new(config.metrics_enabled),
            config,
        }
    }

    /// Add `value` to the back of the queue.
    ///
    /// If callers are parked in [`dequeue`](Self::dequeue), the value is handed
    /// to the one that has waited longest and exactly that thread is woken.
    /// Otherwise it is stored for the next consumer. Never blocks beyond
    /// acquiring the queue lock.
    pub fn enqueue(&self, value: T) {
        let mut state = self.state.lock();

        match state.ledger.serve_next(value) {
            Ok(ticket) => {
                debug_assert!(state.store.is_empty(), "items stored while callers are parked");
                trace!(
                    queue = self.config.label,
                    ticket,
                    waiting = state.ledger.len(),
                    "handed item to parked caller"
                );
                self.record(AtomicMetrics::record_handoff);
            }
            Err(value) => {
                state.store.push(value);
                let len = state.store.len();
                self.record(|metrics| metrics.update_len(len));
            }
        }

        self.publish(&state);
        drop(state);
        self.record(AtomicMetrics::record_success);
    }

    /// Remove the value at the front of the queue, blocking until one is
    /// available *and* it is this caller's turn.
    ///
    /// When the store holds an item and nobody is parked, the item is taken
    /// immediately. Otherwise the caller takes a ticket at the back of the line
    /// and sleeps until an [`enqueue`](Self::enqueue) serves that ticket.
    /// Spurious wake-ups are absorbed. There is no timeout.
    pub fn dequeue(&self) -> T {
        let mut state = self.state.lock();

        if state.ledger.is_empty() {
            if let Some(value) = state.store.pop() {
                state.visited += 1;
                self.publish(&state);
                drop(state);
                self.record(AtomicMetrics::record_success);
                return value;
            }
        }

        let (ticket, wake) = state.ledger.register();
        self.publish(&state);
        trace!(
            queue = self.config.label,
            ticket,
            position = state.ledger.len(),
            "parked waiting for an item"
        );

        let parked_at = Instant::now();
        let mut wakeups: u32 = 0;
        let value = loop {
            if let Some(value) = state.ledger.collect(ticket) {
                break value;
            }
            wake.wait(&mut state);
            wakeups += 1;
        };

        state.visited += 1;
        self.publish(&state);
        drop(state);

        let waited = parked_at.elapsed();
        trace!(
            queue = self.config.label,
            ticket,
            waited = ?waited,
            spurious = wakeups.saturating_sub(1),
            "resumed with earmarked item"
        );
        self.record(|metrics| {
            metrics.record_contention();
            metrics.record_wait(waited);
            metrics.record_success();
        });
        value
    }

    /// Remove the value at the front of the store without blocking.
    ///
    /// Returns `None` when the store is empty, leaving every counter
    /// unchanged. This call does not take a ticket: it is served from the
    /// store directly and does not take part in the arrival-order guarantee.
    pub fn try_dequeue(&self) -> Option<T> {
        let mut state = self.state.lock();
        let value = state.store.pop();
        if value.is_some() {
            state.visited += 1;
            self.publish(&state);
        }
        drop(state);

        match value {
            Some(_) => self.record(AtomicMetrics::record_success),
            None => self.record(AtomicMetrics::record_empty_poll),
        }
        value
    }

    /// Number of stored items. Best-effort, see the module docs.
    #[inline]
    pub fn size(&self) -> usize {
        self.size.load(Ordering::Relaxed)
    }

    /// Number of callers parked in `dequeue` and not yet served.
    /// Best-effort, see the module docs.
    #[inline]
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::Relaxed)
    }

    /// Total items delivered so far. Never decreases. Best-effort, see the
    /// module docs.
    #[inline]
    pub fn visited(&self) -> usize {
        self.visited.load(Ordering::Relaxed)
    }

    /// Whether the store is empty. Best-effort, see the module docs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Read all counters together under the queue lock.
    pub fn stats(&self) -> QueueStats {
        let state = self.state.lock();
        QueueStats {
            size: state.store.len(),
            waiting: state.ledger.len(),
            visited: state.visited,
            in_flight: state.ledger.in_flight(),
        }
    }

    /// Label attached to this queue's log events
    pub fn label(&self) -> &'static str {
        self.config.label
    }

    /// Settings the queue was created with
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Tear the queue down and return the items nobody consumed, oldest first.
    ///
    /// Taking `self` by value guarantees no other caller can still be using
    /// the queue, so no thread can be parked in it.
    pub fn destroy(self) -> Vec<T> {
        let mut state = self.state.lock();
        let tickets = state.ledger.clear();
        debug_assert_eq!(tickets, 0, "queue destroyed with parked callers");
        let remaining = state.store.drain();
        self.publish(&state);
        drop(state);

        debug!(
            queue = self.config.label,
            remaining = remaining.len(),
            visited = self.visited(),
            "queue destroyed"
        );
        remaining
    }

    /// Release a shared handle and destroy the queue if it was the last one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InUse`] when other handles are still alive. The
    /// caller's handle is released either way; the queue lives on in the
    /// remaining holders.
    ///
    /// ```rust
    /// use fairq::{Error, FairQueue};
    /// use std::sync::Arc;
    ///
    /// let queue = Arc::new(FairQueue::new());
    /// queue.enqueue(1);
    ///
    /// let other = Arc::clone(&queue);
    /// assert_eq!(FairQueue::try_destroy(queue), Err(Error::InUse { handles: 2 }));
    /// assert_eq!(FairQueue::try_destroy(other), Ok(vec![1]));
    /// ```
    pub fn try_destroy(queue: std::sync::Arc<Self>) -> Result<Vec<T>> {
        match std::sync::Arc::try_unwrap(queue) {
            Ok(queue) => Ok(queue.destroy()),
            Err(shared) => Err(Error::InUse {
                handles: std::sync::Arc::strong_count(&shared),
            }),
        }
    }

    /// Wakes the longest-parked caller without handing it anything.
    #[cfg(all(test, not(loom)))]
    pub(crate) fn nudge_parked(&self) {
        self.state.lock().ledger.nudge_front();
    }

    // Must be called with the lock held so the mirrors move in lock order.
    fn publish(&self, state: &State<T>) {
        self.size.store(state.store.len(), Ordering::Relaxed);
        self.waiting.store(state.ledger.len(), Ordering::Relaxed);
        self.visited.store(state.visited, Ordering::Relaxed);
    }

    #[inline]
    fn record(&self, f: impl FnOnce(&AtomicMetrics)) {
        if self.metrics_enabled.load(Ordering::Relaxed) {
            f(&self.metrics);
        }
    }
}

impl<T> Default for FairQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FairQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FairQueue")
            .field("label", &self.config.label)
            .field("size", &self.size())
            .field("waiting", &self.waiting())
            .field("visited", &self.visited())
            .finish()
    }
}

impl<T> Drop for FairQueue<T> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        let tickets = state.ledger.clear();
        let items = state.store.len();
        if items > 0 || tickets > 0 {
            debug!(
                queue = self.config.label,
                items,
                tickets,
                "dropping queue with unconsumed state"
            );
        }
    }
}

impl<T> MetricsCollector for FairQueue<T> {
    fn metrics(&self) -> PerformanceMetrics {
        self.metrics.snapshot()
    }

    fn reset_metrics(&self) {
        self.metrics.reset();
    }

    fn set_metrics_enabled(&self, enabled: bool) {
        self.metrics_enabled.store(enabled, Ordering::Relaxed);
    }

    fn is_metrics_enabled(&self) -> bool {
        self.metrics_enabled.load(Ordering::Relaxed)
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let queue: FairQueue<i32> = FairQueue::new();

        assert!(queue.is_empty());
        assert_eq!(queue.try_dequeue(), None);

        queue.enqueue(1);
        queue.enqueue(2);
        queue.enqueue(3);
        assert_eq!(queue.size(), 3);

        assert_eq!(queue.dequeue(), 1);
        assert_eq!(queue.try_dequeue(), Some(2));
        assert_eq!(queue.dequeue(), 3);

        assert!(queue.is_empty());
        assert_eq!(queue.visited(), 3);
        assert_eq!(
            queue.stats(),
            QueueStats {
                size: 0,
                waiting: 0,
                visited: 3,
                in_flight: 0
            }
        );
    }

    #[test]
    fn test_metrics_toggle() {
        let queue: FairQueue<i32> =
            FairQueue::with_config(QueueConfig::default().with_metrics(false));
        assert!(!queue.is_metrics_enabled());

        queue.enqueue(1);
        assert_eq!(queue.metrics().total_operations, 0);

        queue.set_metrics_enabled(true);
        queue.enqueue(2);
        assert_eq!(queue.try_dequeue(), Some(1));
        assert_eq!(queue.try_dequeue(), Some(2));
        assert_eq!(queue.try_dequeue(), None);

        let metrics = queue.metrics();
        assert_eq!(metrics.total_operations, 4);
        assert_eq!(metrics.successful_operations, 3);
        assert_eq!(metrics.empty_polls, 1);
        assert_eq!(metrics.peak_len, 2);

        queue.reset_metrics();
        assert_eq!(queue.metrics(), PerformanceMetrics::default());
    }

    #[test]
    fn test_destroy_returns_remaining_in_order() {
        let queue = FairQueue::with_capacity(4);
        for i in 0..4 {
            queue.enqueue(i);
        }
        assert_eq!(queue.dequeue(), 0);
        assert_eq!(queue.destroy(), vec![1, 2, 3]);
    }

    #[test]
    fn test_debug_format() {
        let queue: FairQueue<u8> = FairQueue::new();
        queue.enqueue(1);
        let debug_str = format!("{:?}", queue);
        assert!(debug_str.contains("FairQueue"));
        assert!(debug_str.contains("size: 1"));
    }
}
