//! Waiter ledger: the ordered line of parked `dequeue` calls.
//!
//! Each parked call owns a [`Ticket`] with its own wake handle. Serving works
//! strictly from the front of the line:
//!
//! ```text
//!  enqueue(v) ──► serve_next(v)
//!                   │ pop front ticket #n
//!                   │ earmark v under #n
//!                   └► notify #n's condvar (only that thread)
//!
//!  dequeue() parked on #n ──► wake ──► collect(#n)?
//!                                       ├ Some(v): served, return v
//!                                       └ None:    spurious, wait again
//! ```
//!
//! A ticket leaves the line only through [`WaiterLedger::serve_next`]; the
//! parked side never removes itself. A woken caller resumes only once an item
//! sits under its own ticket id, so neither spurious wake-ups nor its position
//! relative to other tickets can make it return early or late.

use std::collections::HashMap;
use std::collections::VecDeque;

use crate::sync::{Arc, Condvar};

/// Monotonic ticket number, unique per queue.
pub(crate) type TicketId = u64;

/// One parked `dequeue` call's place in line.
#[derive(Debug)]
pub(crate) struct Ticket {
    id: TicketId,
    wake: Arc<Condvar>,
}

/// Line of wait tickets plus the items earmarked for tickets already served.
#[derive(Debug)]
pub(crate) struct WaiterLedger<T> {
    tickets: VecDeque<Ticket>,
    earmarked: HashMap<TicketId, T>,
    next_id: TicketId,
}

impl<T> WaiterLedger<T> {
    pub(crate) fn new() -> Self {
        Self {
            tickets: VecDeque::new(),
            earmarked: HashMap::new(),
            next_id: 0,
        }
    }

    /// Appends a ticket at the tail and returns its id with the wake handle
    /// the caller must park on.
    pub(crate) fn register(&mut self) -> (TicketId, Arc<Condvar>) {
        let id = self.next_id;
        self.next_id += 1;

        let wake = Arc::new(Condvar::new());
        self.tickets.push_back(Ticket {
            id,
            wake: Arc::clone(&wake),
        });
        (id, wake)
    }

    /// Hands `value` to the oldest ticket and wakes its owner.
    ///
    /// Returns the served ticket id, or gives `value` back when nobody is
    /// parked.
    pub(crate) fn serve_next(&mut self, value: T) -> Result<TicketId, T> {
        let Some(ticket) = self.tickets.pop_front() else {
            return Err(value);
        };

        let previous = self.earmarked.insert(ticket.id, value);
        debug_assert!(previous.is_none(), "ticket {} served twice", ticket.id);
        ticket.wake.notify_one();
        Ok(ticket.id)
    }

    /// Takes the item earmarked for `id`, if that ticket has been served.
    pub(crate) fn collect(&mut self, id: TicketId) -> Option<T> {
        self.earmarked.remove(&id)
    }

    /// Number of tickets still waiting to be served.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.tickets.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Number of served tickets whose owner has not collected its item yet.
    #[inline]
    pub(crate) fn in_flight(&self) -> usize {
        self.earmarked.len()
    }

    /// Wakes the front ticket's owner without serving it.
    #[cfg(all(test, not(loom)))]
    pub(crate) fn nudge_front(&self) {
        if let Some(ticket) = self.tickets.front() {
            ticket.wake.notify_one();
        }
    }

    /// Releases every outstanding ticket and earmarked item.
    ///
    /// Returns how many tickets were still in line.
    pub(crate) fn clear(&mut self) -> usize {
        let outstanding = self.tickets.len();
        self.tickets.clear();
        self.earmarked.clear();
        outstanding
    }
}
