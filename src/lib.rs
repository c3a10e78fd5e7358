//! # fairq
//!
//! An unbounded, thread-safe FIFO queue that serves *blocked consumers* in
//! strict arrival order.
//!
//! Most blocking queues guarantee that items leave in the order they arrived.
//! [`FairQueue`] additionally guarantees that callers parked in
//! [`FairQueue::dequeue`] are served in the order they started waiting: an
//! `enqueue` that finds a parked caller hands the item straight to the oldest
//! one and wakes only that thread.
//!
//! ## Quick Start
//!
//! ```rust
//! use fairq::FairQueue;
//!
//! let queue = FairQueue::new();
//! queue.enqueue("A");
//! queue.enqueue("B");
//! assert_eq!(queue.dequeue(), "A");
//! assert_eq!(queue.try_dequeue(), Some("B"));
//! assert_eq!(queue.try_dequeue(), None);
//! assert_eq!(queue.visited(), 2);
//! ```
//!
//! ## Thread Safety
//!
//! One mutex guards the item store, the waiter ledger and the counters. Every
//! operation does O(1) work under it. Only the slow path of `dequeue` ever
//! suspends the calling thread.

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod config;
pub mod metrics;
pub mod queue;
mod sync;

pub use crate::config::QueueConfig;
pub use crate::metrics::{MetricsCollector, PerformanceMetrics};
pub use crate::queue::{FairQueue, QueueStats};

/// Common utilities and helper types
pub mod util {
    use core::ops::{Deref, DerefMut};

    /// Pads and aligns a value to the cache line size.
    ///
    /// The lock-free counter mirrors of a queue are read by arbitrary threads
    /// while the lock holder writes them; padding keeps them off the lock's line.
    #[repr(align(64))]
    #[derive(Default)]
    pub struct CachePadded<T> {
        value: T,
    }

    impl<T> CachePadded<T> {
        /// Create a new cache-padded value
        #[inline]
        pub const fn new(value: T) -> Self {
            Self { value }
        }

        /// Get the inner value
        #[inline]
        pub fn into_inner(self) -> T {
            self.value
        }
    }

    impl<T> Deref for CachePadded<T> {
        type Target = T;

        #[inline]
        fn deref(&self) -> &T {
            &self.value
        }
    }

    impl<T> DerefMut for CachePadded<T> {
        #[inline]
        fn deref_mut(&mut self) -> &mut T {
            &mut self.value
        }
    }

    impl<T: core::fmt::Debug> core::fmt::Debug for CachePadded<T> {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            core::fmt::Debug::fmt(&self.value, f)
        }
    }
}

/// Error types for fairq operations
///
/// Allocation failure is not represented here: the global allocator aborts
/// the process, which is the intended outcome for an exhausted queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Teardown was requested while other handles to the queue were alive
    InUse {
        /// Number of handles still alive, including the caller's
        handles: usize,
    },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InUse { handles } => {
                write!(f, "Queue is still in use by {} handles", handles)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result type for fairq operations
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_line_alignment() {
        assert_eq!(core::mem::align_of::<util::CachePadded<u8>>(), 64);
    }

    #[test]
    fn test_cache_padded() {
        let mut padded = util::CachePadded::new(42);
        assert_eq!(*padded, 42);

        *padded = 100;
        assert_eq!(padded.into_inner(), 100);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::InUse { handles: 3 }.to_string(),
            "Queue is still in use by 3 handles"
        );
    }
}
