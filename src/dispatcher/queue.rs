//! FIFO queue feeding the dispatch worker.

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::error;

/// An unbounded FIFO of items awaiting dispatch.
///
/// Many producers may `push` concurrently; completed pushes are delivered in
/// push order. The dispatch worker is the single consumer and drains with
/// [`try_pop`](Self::try_pop) until empty on each wake.
#[derive(Debug)]
pub struct DispatchQueue<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> Default for DispatchQueue<T> {
    fn default() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }
}

impl<T> DispatchQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item. Never blocks beyond channel-internal contention.
    pub fn push(&self, item: T) {
        // The queue owns its receiver, so the channel cannot disconnect while
        // the queue is alive.
        if self.tx.send(item).is_err() {
            error!("dispatch queue disconnected, item dropped");
        }
    }

    /// Pops the oldest item, or `None` if the queue is empty.
    #[must_use]
    pub fn try_pop(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Number of queued items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
