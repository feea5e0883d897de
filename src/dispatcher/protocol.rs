//! Receive/dispatch worker pair.
//!
//! `ProtocolDispatcher` owns the two trigger-gated workers and the dispatch
//! queue between them. The I/O collaborator signals the receiver whenever data
//! is ready; the receive action decodes available bytes and enqueues any
//! message that requires dispatch; the dispatch worker drains the queue in
//! arrival order and hands each item to the dispatch handler.

use std::sync::Arc;

use tracing::error;

use crate::error::GemResult;

use super::queue::DispatchQueue;
use super::worker::TriggerWorker;

/// Dispatcher configuration.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Prefix for the two worker thread names
    /// (`{name}-receiver`, `{name}-dispatcher`).
    pub name: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            name: "gemlink".to_string(),
        }
    }
}

/// An item awaiting dispatch: the connection it arrived on and the decoded
/// message. Ownership moves to the queue on enqueue and to the handler on
/// dequeue.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchItem<O, M> {
    pub origin: O,
    pub message: M,
}

/// The trigger-gated receive/dispatch worker pair.
///
/// Generic over the origin handle `O` and decoded message type `M`; the
/// pipeline never inspects either.
///
/// The receive action must drain all currently-available data per invocation:
/// receiver trigger signals coalesce, so an action that reads a single
/// message per call can strand data between the trigger clear and the read.
pub struct ProtocolDispatcher<O, M> {
    receiver: TriggerWorker,
    dispatcher: TriggerWorker,
    queue: Arc<DispatchQueue<DispatchItem<O, M>>>,
}

impl<O, M> std::fmt::Debug for ProtocolDispatcher<O, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtocolDispatcher")
            .field("receiver", &self.receiver)
            .field("dispatcher", &self.dispatcher)
            .field("queued", &self.queue.len())
            .finish()
    }
}

impl<O, M> ProtocolDispatcher<O, M>
where
    O: Send + 'static,
    M: Send + 'static,
{
    /// Creates the pair in idle state.
    ///
    /// `receive` is invoked once per receiver trigger edge. `handle` is
    /// invoked once per queued item, in FIFO order; its failures are isolated
    /// per item.
    pub fn new(
        config: DispatcherConfig,
        receive: impl Fn() -> GemResult<()> + Send + Sync + 'static,
        handle: impl Fn(O, M) -> GemResult<()> + Send + Sync + 'static,
    ) -> Self {
        let queue = Arc::new(DispatchQueue::<DispatchItem<O, M>>::new());

        let receiver = TriggerWorker::new(format!("{}-receiver", config.name), receive);

        // Drain to empty on each wake: the trigger coalesces signals, so
        // items enqueued between a dequeue and the next signal observation
        // would otherwise starve.
        let dispatcher = {
            let queue = Arc::clone(&queue);
            TriggerWorker::new(format!("{}-dispatcher", config.name), move || {
                while let Some(item) = queue.try_pop() {
                    if let Err(err) = handle(item.origin, item.message) {
                        error!(error = %err, "dispatch handler failed");
                    }
                }
                Ok(())
            })
        };

        Self {
            receiver,
            dispatcher,
            queue,
        }
    }

    /// Starts both workers.
    pub fn start(&self) -> GemResult<()> {
        self.receiver.start()?;
        if let Err(err) = self.dispatcher.start() {
            // Do not leave a half-started pair behind.
            let _ = self.receiver.stop();
            return Err(err);
        }
        Ok(())
    }

    /// Stops both workers and waits for their threads to terminate.
    ///
    /// The receiver stops first so nothing new is enqueued while the
    /// dispatcher finishes its current wake. Items still queued after stop
    /// remain queued and are delivered after a restart.
    pub fn stop(&self) -> GemResult<()> {
        let receiver = self.receiver.stop();
        let dispatcher = self.dispatcher.stop();
        receiver.and(dispatcher)
    }

    /// Signals the receiver worker that data is ready.
    pub fn trigger_receiver(&self) {
        self.receiver.signal();
    }

    /// Appends `(origin, message)` to the dispatch queue and signals the
    /// dispatch worker. Never blocks the caller beyond brief contention.
    pub fn enqueue(&self, origin: O, message: M) {
        self.queue.push(DispatchItem { origin, message });
        self.dispatcher.signal();
    }

    /// Number of items awaiting dispatch.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Whether both workers are alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.receiver.is_running() && self.dispatcher.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    fn wait_until(what: &str, predicate: impl Fn() -> bool) {
        for _ in 0..200 {
            if predicate() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("timed out waiting for {what}");
    }

    #[test]
    fn test_enqueue_dispatches_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let pair = {
            let seen = Arc::clone(&seen);
            ProtocolDispatcher::new(
                DispatcherConfig::default(),
                || Ok(()),
                move |origin: u64, message: u64| {
                    seen.lock().unwrap().push((origin, message));
                    Ok(())
                },
            )
        };

        pair.start().unwrap();
        for i in 0..50 {
            pair.enqueue(1, i);
        }
        wait_until("all items dispatched", || seen.lock().unwrap().len() == 50);
        pair.stop().unwrap();

        let seen = seen.lock().unwrap();
        let expected: Vec<(u64, u64)> = (0..50).map(|i| (1, i)).collect();
        assert_eq!(*seen, expected);
    }

    #[test]
    fn test_trigger_receiver_runs_receive_action() {
        let received = Arc::new(AtomicUsize::new(0));
        let pair: ProtocolDispatcher<u64, u64> = {
            let received = Arc::clone(&received);
            ProtocolDispatcher::new(
                DispatcherConfig {
                    name: "rx-test".to_string(),
                },
                move || {
                    received.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                },
                |_, _| Ok(()),
            )
        };

        pair.start().unwrap();
        pair.trigger_receiver();
        wait_until("receive action ran", || received.load(Ordering::SeqCst) == 1);
        pair.stop().unwrap();
    }

    #[test]
    fn test_stop_keeps_undelivered_items_for_restart() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let pair = {
            let seen = Arc::clone(&seen);
            ProtocolDispatcher::new(
                DispatcherConfig::default(),
                || Ok(()),
                move |_: u64, message: u64| {
                    seen.lock().unwrap().push(message);
                    Ok(())
                },
            )
        };

        // Enqueue while stopped: items stay queued, trigger stays armed.
        pair.enqueue(0, 1);
        pair.enqueue(0, 2);
        assert_eq!(pair.queued(), 2);

        pair.start().unwrap();
        wait_until("backlog delivered after start", || {
            seen.lock().unwrap().len() == 2
        });
        pair.stop().unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }
}
