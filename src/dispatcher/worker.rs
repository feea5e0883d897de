//! Trigger-gated background worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::{debug, error};

use crate::error::{GemError, GemResult, WorkerError};

use super::trigger::Trigger;

/// Work unit bound to a worker: invoked once per trigger edge.
pub type WorkFn = Arc<dyn Fn() -> GemResult<()> + Send + Sync>;

/// A background thread that blocks until signaled, then runs its work unit
/// exactly once, repeating until stopped.
///
/// The trigger is edge-triggered and coalescing (see [`Trigger`]), so the work
/// unit must re-check its full backlog on each wake; a work unit that assumes
/// "one signal = one item" will lose work.
///
/// A failed work-unit invocation is reported and the loop continues; `stop()`
/// is the only path that terminates the loop, and it only takes effect between
/// invocations (or immediately, if the worker is blocked waiting).
pub struct TriggerWorker {
    name: String,
    trigger: Arc<Trigger>,
    stop_requested: Arc<AtomicBool>,
    work: WorkFn,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for TriggerWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerWorker")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl TriggerWorker {
    /// Creates an idle worker. No thread is spawned until [`start`](Self::start).
    pub fn new(
        name: impl Into<String>,
        work: impl Fn() -> GemResult<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            trigger: Arc::new(Trigger::new()),
            stop_requested: Arc::new(AtomicBool::new(false)),
            work: Arc::new(work),
            join: Mutex::new(None),
        }
    }

    /// The worker's diagnostic name (also the thread name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arms the worker's trigger.
    pub fn signal(&self) {
        self.trigger.set();
    }

    /// Whether the worker's execution context is currently alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.join
            .lock()
            .map(|guard| guard.as_ref().is_some_and(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    /// Spawns the worker thread.
    ///
    /// Callable again after [`stop`](Self::stop); fails with
    /// [`WorkerError::AlreadyRunning`] if the previous execution context is
    /// still alive.
    pub fn start(&self) -> GemResult<()> {
        let mut join = self
            .join
            .lock()
            .map_err(|_| GemError::internal("worker join handle lock poisoned"))?;

        if join.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Err(WorkerError::AlreadyRunning {
                name: self.name.clone(),
            }
            .into());
        }

        self.stop_requested.store(false, Ordering::Release);

        let name = self.name.clone();
        let trigger = Arc::clone(&self.trigger);
        let stop_requested = Arc::clone(&self.stop_requested);
        let work = Arc::clone(&self.work);

        let handle = thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || worker_loop(&name, &trigger, &stop_requested, &work))
            .map_err(|err| WorkerError::SpawnFailed {
                name: self.name.clone(),
                message: err.to_string(),
            })?;

        *join = Some(handle);
        Ok(())
    }

    /// Stops the worker and waits for its thread to terminate.
    ///
    /// A no-op if the worker was never started or has already terminated.
    /// After return the worker may be started again.
    pub fn stop(&self) -> GemResult<()> {
        let handle = {
            let mut join = self
                .join
                .lock()
                .map_err(|_| GemError::internal("worker join handle lock poisoned"))?;
            join.take()
        };

        let Some(handle) = handle else {
            return Ok(());
        };

        self.stop_requested.store(true, Ordering::Release);
        self.trigger.set();

        handle.join().map_err(|_| {
            GemError::from(WorkerError::Panicked {
                name: self.name.clone(),
            })
        })
    }
}

fn worker_loop(name: &str, trigger: &Trigger, stop_requested: &AtomicBool, work: &WorkFn) {
    debug!(worker = name, "worker started");

    loop {
        trigger.wait();

        if stop_requested.load(Ordering::Acquire) {
            break;
        }

        if let Err(err) = (work)() {
            error!(worker = name, error = %err, "work unit failed");
        }
    }

    debug!(worker = name, "worker stopped");
}
