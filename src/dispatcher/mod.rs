//! Concurrent delivery pipeline.
//!
//! Two long-lived, trigger-gated workers decouple "a message became
//! available" (an asynchronous I/O event) from "the message is processed by
//! application logic" (ordered, serialized, fault-isolated). The receiver
//! worker runs the collaborator's receive action; the dispatch worker drains
//! the FIFO queue of decoded messages and hands each to the dispatch handler.

/// Edge-triggered wake signal.
pub mod trigger;
/// Trigger-gated worker thread.
pub mod worker;
/// FIFO queue between receiver-side logic and the dispatch worker.
pub mod queue;
/// The receive/dispatch worker pair.
pub mod protocol;

pub use protocol::{DispatchItem, DispatcherConfig, ProtocolDispatcher};
pub use queue::DispatchQueue;
pub use trigger::Trigger;
pub use worker::TriggerWorker;
