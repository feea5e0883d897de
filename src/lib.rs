//! # gemlink - SECS/GEM host dispatch engine
//!
//! gemlink is the concurrent delivery core of a SECS/GEM host: it turns
//! low-level "data is ready" signals into ordered, fault-isolated processing
//! of decoded messages, and resolves incoming collection-event reports back
//! into the named data values a caller subscribed to.
//!
//! ## Core Concepts
//!
//! - **TriggerWorker**: a background thread gated by an edge-triggered,
//!   coalescing trigger; runs one work unit per wake, isolating failures
//! - **ProtocolDispatcher**: the receive/dispatch worker pair with a FIFO
//!   queue between them
//! - **ReportSubscriptions**: RPTID → ordered DVID registry consulted when
//!   event reports arrive
//! - **HostHandler**: routes inbound messages by stream/function, fires
//!   resolved events, and drives the subscription lifecycle through narrow
//!   collaborator traits
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gemlink::{DispatcherConfig, HostHandler, ProtocolDispatcher};
//!
//! let host = Arc::new(HostHandler::new(link, sender, sink));
//!
//! // The receive action comes from the I/O collaborator; it must drain all
//! // currently-available data per invocation and enqueue decoded messages.
//! let dispatcher = Arc::new(ProtocolDispatcher::new(
//!     DispatcherConfig::default(),
//!     receive_action,
//!     host.dispatch_handler(),
//! ));
//! dispatcher.start()?;
//!
//! host.subscribe_collection_event(ceid, data_values, None)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// Concurrency core
pub mod dispatcher;

// Data model
pub mod error;
pub mod ids;
pub mod message;
pub mod value;

// Host-side GEM logic
pub mod gem;

// Re-export primary types at crate root for convenience
pub use dispatcher::{DispatchItem, DispatchQueue, DispatcherConfig, ProtocolDispatcher, Trigger, TriggerWorker};
pub use error::{GemError, GemResult, MessageError, ResolutionError, WorkerError};
pub use gem::{
    AlarmNotification, CollectionEventReport, EventSink, GemEvent, HostHandler, MessageRouter,
    MessageSender, ReportLink, ReportSubscriptions, ResolvedValue, TerminalNotification,
};
pub use ids::{AlarmId, CollectionEventId, DataValueId, ReportId, SessionId};
pub use message::{Alarm, EventReport, Message, ReportBlock, Terminal};
pub use value::Value;
