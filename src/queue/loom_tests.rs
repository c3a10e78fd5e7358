//! Loom model checks for the hand-off protocol
//!
//! Built only with `RUSTFLAGS="--cfg loom"`, where the coordinator's mutex,
//! condition variables and counters are loom's. Loom then explores every
//! interleaving of the threads below against the real `FairQueue`.
//!
//! ```text
//! RUSTFLAGS="--cfg loom" cargo test --release --lib loom
//! ```

use super::*;
use loom::sync::Arc;
use loom::thread;

/// A parked consumer receives the item regardless of who grabs the lock first
#[test]
fn loom_handoff_to_parked_consumer() {
    loom::model(|| {
        let queue = Arc::new(FairQueue::new());

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.dequeue())
        };

        queue.enqueue(1);

        assert_eq!(consumer.join().unwrap(), 1);
        let stats = queue.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.waiting, 0);
        assert_eq!(stats.in_flight, 0);
        assert_eq!(stats.visited, 1);
    });
}

/// Two consumers racing for two items each get exactly one
#[test]
fn loom_two_consumers_no_loss_no_duplication() {
    loom::model(|| {
        let queue = Arc::new(FairQueue::new());

        let consumers: Vec<_> = (0..2)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.dequeue())
            })
            .collect();

        queue.enqueue(1);
        queue.enqueue(2);

        let mut results: Vec<i32> = consumers
            .into_iter()
            .map(|consumer| consumer.join().unwrap())
            .collect();
        results.sort_unstable();

        assert_eq!(results, vec![1, 2]);
        assert_eq!(queue.stats().visited, 2);
    });
}

/// Items reach a blocking consumer in enqueue order
#[test]
fn loom_fifo_across_threads() {
    loom::model(|| {
        let queue = Arc::new(FairQueue::new());

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                queue.enqueue(1);
                queue.enqueue(2);
            })
        };

        let first = queue.dequeue();
        let second = queue.dequeue();
        producer.join().unwrap();

        assert_eq!((first, second), (1, 2));
        assert!(queue.try_dequeue().is_none());
    });
}

/// A non-blocking poll racing a parked consumer loses and duplicates nothing
#[test]
fn loom_try_dequeue_against_parked_consumer() {
    loom::model(|| {
        let queue = Arc::new(FairQueue::new());

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.dequeue())
        };
        let poller = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.try_dequeue())
        };

        queue.enqueue(7);
        queue.enqueue(8);

        let polled = poller.join().unwrap();
        let consumed = consumer.join().unwrap();
        let leftover = queue.try_dequeue();

        let mut delivered: Vec<i32> = [Some(consumed), polled, leftover]
            .into_iter()
            .flatten()
            .collect();
        delivered.sort_unstable();
        assert_eq!(delivered, vec![7, 8]);
    });
}
