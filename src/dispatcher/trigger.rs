//! Edge-triggered wake signal for the worker loop.

use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

/// An edge-triggered trigger.
///
/// `set` arms the trigger; arming an already-armed trigger is idempotent until
/// the armed state is observed. `wait` blocks until armed, then clears, so the
/// next wake requires a new `set`. Repeated `set` calls before a wake collapse
/// into a single wake; the waiting work unit must re-check its full backlog on
/// each wake.
#[derive(Debug, Default)]
pub struct Trigger {
    armed: Mutex<bool>,
    condvar: Condvar,
}

impl Trigger {
    /// Creates a disarmed trigger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the trigger and wakes a waiter.
    pub fn set(&self) {
        // The guarded state is a plain flag; a poisoned guard is still
        // consistent, so recover instead of propagating.
        let mut armed = self.armed.lock().unwrap_or_else(PoisonError::into_inner);
        *armed = true;
        self.condvar.notify_one();
    }

    /// Blocks until the trigger is armed, then clears it.
    pub fn wait(&self) {
        let mut armed = self.armed.lock().unwrap_or_else(PoisonError::into_inner);
        while !*armed {
            armed = self
                .condvar
                .wait(armed)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *armed = false;
    }

    /// Like [`wait`](Self::wait), but gives up after `timeout`.
    ///
    /// Returns `true` if the trigger fired (and was cleared), `false` on
    /// timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut armed = self.armed.lock().unwrap_or_else(PoisonError::into_inner);
        let deadline = std::time::Instant::now() + timeout;
        while !*armed {
            let now = std::time::Instant::now();
            let Some(remaining) = deadline.checked_duration_since(now).filter(|d| !d.is_zero())
            else {
                return false;
            };
            let (guard, _) = self
                .condvar
                .wait_timeout(armed, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            armed = guard;
        }
        *armed = false;
        true
    }

    /// Whether the trigger is currently armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        *self.armed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_set_then_wait_returns_and_clears() {
        let trigger = Trigger::new();
        trigger.set();
        assert!(trigger.is_armed());
        trigger.wait();
        assert!(!trigger.is_armed());
    }

    #[test]
    fn test_set_is_idempotent_until_observed() {
        let trigger = Trigger::new();
        trigger.set();
        trigger.set();
        trigger.set();
        trigger.wait();
        // Three sets collapsed into one edge.
        assert!(!trigger.is_armed());
        assert!(!trigger.wait_timeout(Duration::from_millis(20)));
    }

    #[test]
    fn test_wait_blocks_until_set_from_another_thread() {
        let trigger = Arc::new(Trigger::new());
        let waiter = {
            let trigger = Arc::clone(&trigger);
            std::thread::spawn(move || trigger.wait())
        };
        std::thread::sleep(Duration::from_millis(50));
        trigger.set();
        waiter.join().unwrap();
    }

    #[test]
    fn test_wait_timeout_expires() {
        let trigger = Trigger::new();
        assert!(!trigger.wait_timeout(Duration::from_millis(20)));
    }
}
