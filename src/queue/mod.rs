//! Queue implementation
//!
//! - [`FairQueue`]: unbounded MPMC queue serving blocked consumers in arrival
//!   order
//!
//! ## Components
//!
//! - **Item store**: FIFO of values nobody has asked for yet
//! - **Waiter ledger**: FIFO of wait tickets, one per parked `dequeue` call,
//!   each with its own condition variable
//! - **Coordinator**: [`FairQueue`], owning the lock, both FIFOs and the
//!   counters
//!
//! ## Operation Costs
//!
//! | Operation | Cost under the lock | Blocks |
//! |-----------|---------------------|--------|
//! | `enqueue` | O(1) | no |
//! | `dequeue` | O(1) | until served |
//! | `try_dequeue` | O(1) | no |
//! | `size` / `waiting` / `visited` | lock-free | no |
//! | `stats` | O(1) | no |
//!
//! ## Examples
//!
//! ```rust
//! use fairq::queue::FairQueue;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let queue = Arc::new(FairQueue::new());
//!
//! let worker = {
//!     let queue = Arc::clone(&queue);
//!     thread::spawn(move || queue.dequeue())
//! };
//!
//! queue.enqueue("job-1");
//! assert_eq!(worker.join().unwrap(), "job-1");
//! ```
mod fair;
mod ledger;
mod store;

pub use fair::{FairQueue, QueueStats};


#[cfg(all(test, not(loom)))]
mod proptests;

#[cfg(all(test, loom))]
mod loom_tests;
