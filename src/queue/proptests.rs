//! Property-based tests for the fair queue using proptest
//!
//! Single-threaded operation sequences are checked against a `VecDeque`
//! model; the counters must agree with the model after every step.

use crate::queue::FairQueue;
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Op {
    Enqueue(i32),
    Dequeue,
    TryDequeue,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<i32>().prop_map(Op::Enqueue),
        1 => Just(Op::Dequeue),
        1 => Just(Op::TryDequeue),
    ]
}

proptest! {
    #[test]
    fn test_fifo_ordering_single_thread(
        values in prop::collection::vec(any::<i32>(), 0..200)
    ) {
        let queue = FairQueue::new();
        for &value in &values {
            queue.enqueue(value);
        }

        for &expected in &values {
            prop_assert_eq!(queue.dequeue(), expected);
        }

        prop_assert!(queue.is_empty());
        prop_assert_eq!(queue.visited(), values.len());
    }

    #[test]
    fn test_counters_match_model(
        operations in prop::collection::vec(op_strategy(), 1..200)
    ) {
        let queue = FairQueue::new();
        let mut model = VecDeque::new();
        let mut delivered = 0usize;

        for op in operations {
            let visited_before = queue.visited();
            match op {
                Op::Enqueue(value) => {
                    queue.enqueue(value);
                    model.push_back(value);
                }
                // Only issued when it cannot block this thread.
                Op::Dequeue => {
                    if let Some(expected) = model.pop_front() {
                        prop_assert_eq!(queue.dequeue(), expected);
                        delivered += 1;
                    }
                }
                Op::TryDequeue => {
                    let expected = model.pop_front();
                    prop_assert_eq!(queue.try_dequeue(), expected);
                    if expected.is_some() {
                        delivered += 1;
                    }
                }
            }

            prop_assert!(queue.visited() >= visited_before);
            prop_assert_eq!(queue.size(), model.len());
            prop_assert_eq!(queue.visited(), delivered);
            prop_assert_eq!(queue.waiting(), 0);
        }

        let remaining: Vec<_> = model.into_iter().collect();
        prop_assert_eq!(queue.destroy(), remaining);
    }

    #[test]
    fn test_empty_try_dequeue_leaves_state_unchanged(
        values in prop::collection::vec(any::<u8>(), 0..20),
        polls in 1usize..10
    ) {
        let queue = FairQueue::new();
        for &value in &values {
            queue.enqueue(value);
        }
        while queue.try_dequeue().is_some() {}

        let before = queue.stats();
        for _ in 0..polls {
            prop_assert_eq!(queue.try_dequeue(), None);
        }
        prop_assert_eq!(queue.stats(), before);
        prop_assert_eq!(before.visited, values.len());
    }

    #[test]
    fn test_no_memory_leaks(
        values in prop::collection::vec(any::<i32>(), 1..100)
    ) {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        struct DropTracker(Arc<AtomicUsize>);

        impl Drop for DropTracker {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::Relaxed);
            }
        }

        let drops = Arc::new(AtomicUsize::new(0));
        let queue = FairQueue::new();
        for _ in &values {
            queue.enqueue(DropTracker(Arc::clone(&drops)));
        }
        for _ in 0..values.len() / 2 {
            drop(queue.dequeue());
        }

        drop(queue);
        prop_assert_eq!(drops.load(Ordering::Relaxed), values.len());
    }
}
