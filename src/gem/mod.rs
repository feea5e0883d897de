//! Host-side GEM logic: subscription bookkeeping, report resolution, and
//! message routing.
//!
//! The dispatch pipeline in [`crate::dispatcher`] is domain-neutral; this
//! module is where raw report data becomes named values and application
//! events.

/// Fired events and the event sink collaborator.
pub mod events;
/// Host message handling and subscription lifecycle.
pub mod host;
/// Event report resolution.
pub mod resolver;
/// Stream/function message routing.
pub mod router;
/// Report subscription registry.
pub mod subscriptions;

pub use events::{
    AlarmNotification, CollectionEventReport, EventSink, GemEvent, ResolvedValue,
    TerminalNotification,
};
pub use host::{HostHandler, MessageSender, ReportLink};
pub use resolver::EventReportResolver;
pub use router::MessageRouter;
pub use subscriptions::ReportSubscriptions;
