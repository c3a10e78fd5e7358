//! Item store: the FIFO sequence of values waiting for a consumer.

use std::collections::VecDeque;

/// Owned FIFO of enqueued values.
///
/// Not synchronized on its own; the coordinator only touches it while holding
/// the queue lock.
#[derive(Debug)]
pub(crate) struct ItemStore<T> {
    items: VecDeque<T>,
}

impl<T> ItemStore<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, value: T) {
        self.items.push_back(value);
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Removes every stored value, oldest first.
    pub(crate) fn drain(&mut self) -> Vec<T> {
        self.items.drain(..).collect()
    }
}
