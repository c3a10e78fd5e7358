//! Performance Metrics Module
//!
//! Counters describing how a queue is being used: how often consumers had to
//! park, how long they waited, how many items were handed over directly and how
//! deep the store got. Recording uses relaxed atomics only and never touches the
//! queue lock.

use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Snapshot of the metrics recorded by a queue
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PerformanceMetrics {
    /// Total number of enqueue, dequeue and try_dequeue calls
    pub total_operations: u64,
    /// Number of calls that stored or delivered an item
    pub successful_operations: u64,
    /// Number of try_dequeue calls that found the store empty
    pub empty_polls: u64,
    /// Number of dequeue calls that had to park behind a wait ticket
    pub contended_operations: u64,
    /// Number of items handed directly from an enqueue to a parked caller
    pub handoffs: u64,
    /// Average time a parked caller spent waiting, in nanoseconds
    pub avg_wait_time_ns: u64,
    /// Longest time a parked caller spent waiting, in nanoseconds
    pub max_wait_time_ns: u64,
    /// Largest number of items observed in the store
    pub peak_len: usize,
}

impl PerformanceMetrics {
    /// Calculate success rate as percentage
    pub fn success_rate(&self) -> f64 {
        percentage(self.successful_operations, self.total_operations)
    }

    /// Calculate contention rate as percentage
    pub fn contention_rate(&self) -> f64 {
        percentage(self.contended_operations, self.total_operations)
    }

    /// Percentage of operations that were empty polls
    pub fn empty_poll_rate(&self) -> f64 {
        percentage(self.empty_polls, self.total_operations)
    }

    /// Get average wait time as Duration
    pub fn avg_wait_time(&self) -> Duration {
        Duration::from_nanos(self.avg_wait_time_ns)
    }

    /// Get maximum wait time as Duration
    pub fn max_wait_time(&self) -> Duration {
        Duration::from_nanos(self.max_wait_time_ns)
    }
}

fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Internal atomic metrics collection
#[derive(Debug, Default)]
pub struct AtomicMetrics {
    total_operations: AtomicU64,
    successful_operations: AtomicU64,
    empty_polls: AtomicU64,
    contended_operations: AtomicU64,
    handoffs: AtomicU64,
    total_wait_ns: AtomicU64,
    max_wait_ns: AtomicU64,
    peak_len: AtomicUsize,
}

impl AtomicMetrics {
    /// Record an operation that stored or delivered an item
    pub fn record_success(&self) {
        self.total_operations.fetch_add(1, Ordering::Relaxed);
        self.successful_operations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a try_dequeue that found nothing
    pub fn record_empty_poll(&self) {
        self.total_operations.fetch_add(1, Ordering::Relaxed);
        self.empty_polls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a dequeue that took the slow path
    pub fn record_contention(&self) {
        self.contended_operations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an item passed straight to a parked caller
    pub fn record_handoff(&self) {
        self.handoffs.fetch_add(1, Ordering::Relaxed);
    }

    /// Record how long a parked caller waited before being served
    pub fn record_wait(&self, waited: Duration) {
        let waited_ns = u64::try_from(waited.as_nanos()).unwrap_or(u64::MAX);
        self.total_wait_ns.fetch_add(waited_ns, Ordering::Relaxed);
        self.max_wait_ns.fetch_max(waited_ns, Ordering::Relaxed);
    }

    /// Update the store depth high-water mark
    pub fn update_len(&self, len: usize) {
        self.peak_len.fetch_max(len, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> PerformanceMetrics {
        let contended = self.contended_operations.load(Ordering::Relaxed);
        let total_wait = self.total_wait_ns.load(Ordering::Relaxed);

        PerformanceMetrics {
            total_operations: self.total_operations.load(Ordering::Relaxed),
            successful_operations: self.successful_operations.load(Ordering::Relaxed),
            empty_polls: self.empty_polls.load(Ordering::Relaxed),
            contended_operations: contended,
            handoffs: self.handoffs.load(Ordering::Relaxed),
            avg_wait_time_ns: if contended > 0 { total_wait / contended } else { 0 },
            max_wait_time_ns: self.max_wait_ns.load(Ordering::Relaxed),
            peak_len: self.peak_len.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics
    pub fn reset(&self) {
        self.total_operations.store(0, Ordering::Relaxed);
        self.successful_operations.store(0, Ordering::Relaxed);
        self.empty_polls.store(0, Ordering::Relaxed);
        self.contended_operations.store(0, Ordering::Relaxed);
        self.handoffs.store(0, Ordering::Relaxed);
        self.total_wait_ns.store(0, Ordering::Relaxed);
        self.max_wait_ns.store(0, Ordering::Relaxed);
        self.peak_len.store(0, Ordering::Relaxed);
    }
}

/// Trait for data structures that support performance metrics
pub trait MetricsCollector {
    /// Get current performance metrics
    fn metrics(&self) -> PerformanceMetrics;

    /// Reset all metrics
    fn reset_metrics(&self);

    /// Enable or disable metrics collection
    fn set_metrics_enabled(&self, enabled: bool);

    /// Check if metrics collection is enabled
    fn is_metrics_enabled(&self) -> bool;
}
