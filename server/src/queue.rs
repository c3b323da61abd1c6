//! FIFO of pending requests shared between the acceptor and the workers
//!
//! A monitor: one mutex guards the deque and a [`Notify`] is signalled once
//! per enqueue. Waiters register for the notification *before* inspecting
//! the deque, so a wakeup issued between the check and the wait is never
//! lost, and they re-check after every wakeup.

use parking_lot::Mutex;
use std::collections::{TryReserveError, VecDeque};
use thiserror::Error;
use tokio::sync::Notify;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("cannot grow request queue: {0}")]
    Exhausted(#[from] TryReserveError),
}

pub struct RequestQueue<T> {
    items: Mutex<VecDeque<T>>,
    available: Notify,
}

impl<T> RequestQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Notify::new(),
        }
    }

    /// Appends to the tail and wakes one waiting worker
    ///
    /// The item is dropped if the deque cannot grow.
    pub fn enqueue(&self, item: T) -> Result<(), QueueError> {
        {
            let mut items = self.items.lock();
            items.try_reserve(1)?;
            items.push_back(item);
        }
        self.available.notify_one();
        Ok(())
    }

    /// Waits until an item is available, then removes and returns the head
    ///
    /// Cancel safe: a dequeue abandoned while waiting claims nothing.
    pub async fn dequeue(&self) -> T {
        loop {
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(item) = self.try_dequeue() {
                return item;
            }

            notified.await;
        }
    }

    pub fn try_dequeue(&self) -> Option<T> {
        self.items.lock().pop_front()
    }

    /// Removes every unclaimed item, oldest first
    pub fn drain(&self) -> Vec<T> {
        self.items.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl<T> Default for RequestQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
