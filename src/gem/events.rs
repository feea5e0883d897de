//! Events fired at the application as messages are translated.
//!
//! These types are intentionally serializable: consumers bridging to
//! loosely-typed layers (scripting, IPC, UIs) can take the JSON mapping form
//! from [`GemEvent::payload`] instead of matching on the enum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AlarmId, CollectionEventId, DataValueId, ReportId, SessionId};
use crate::value::Value;

/// One resolved report value: the subscribed data value id paired with the
/// positional value the equipment sent for it.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedValue {
    pub data_value: DataValueId,
    pub value: Value,
}

/// A collection event report resolved against the subscription registry.
///
/// Ephemeral: produced per incoming report block, handed to the sink,
/// not persisted.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEventReport {
    pub origin: SessionId,
    pub collection_event: CollectionEventId,
    pub report_id: ReportId,
    /// Values in subscription order.
    pub values: Vec<ResolvedValue>,
    pub timestamp: DateTime<Utc>,
}

impl CollectionEventReport {
    #[must_use]
    pub fn new(
        origin: SessionId,
        collection_event: CollectionEventId,
        report_id: ReportId,
        values: Vec<ResolvedValue>,
    ) -> Self {
        Self {
            origin,
            collection_event,
            report_id,
            values,
            timestamp: Utc::now(),
        }
    }
}

/// An alarm reported by the equipment.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmNotification {
    pub origin: SessionId,
    pub alarm_id: AlarmId,
    /// Alarm code byte; bit 7 set means the alarm is active.
    pub code: u8,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl AlarmNotification {
    #[must_use]
    pub fn new(origin: SessionId, alarm_id: AlarmId, code: u8, text: String) -> Self {
        Self {
            origin,
            alarm_id,
            code,
            text,
            timestamp: Utc::now(),
        }
    }
}

/// A terminal message sent by the equipment operator.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalNotification {
    pub origin: SessionId,
    pub terminal_id: u64,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl TerminalNotification {
    #[must_use]
    pub fn new(origin: SessionId, terminal_id: u64, text: String) -> Self {
        Self {
            origin,
            terminal_id,
            text,
            timestamp: Utc::now(),
        }
    }
}

/// An event fired at the [`EventSink`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GemEvent {
    CollectionEvent(CollectionEventReport),
    Alarm(AlarmNotification),
    Terminal(TerminalNotification),
}

impl GemEvent {
    /// Stable event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CollectionEvent(_) => "collection_event_received",
            Self::Alarm(_) => "alarm_received",
            Self::Terminal(_) => "terminal_received",
        }
    }

    /// The loosely-typed mapping form of the event payload.
    #[must_use]
    pub fn payload(&self) -> serde_json::Value {
        match self {
            Self::CollectionEvent(ev) => serde_json::json!({
                "ceid": ev.collection_event,
                "rptid": ev.report_id,
                "values": ev.values,
                "origin": ev.origin,
                "timestamp": ev.timestamp,
            }),
            Self::Alarm(ev) => serde_json::json!({
                "alid": ev.alarm_id,
                "code": ev.code,
                "text": ev.text,
                "origin": ev.origin,
                "timestamp": ev.timestamp,
            }),
            Self::Terminal(ev) => serde_json::json!({
                "terminal": ev.terminal_id,
                "text": ev.text,
                "origin": ev.origin,
                "timestamp": ev.timestamp,
            }),
        }
    }
}

/// Event-firing collaborator.
///
/// Fire-and-forget from the resolver's perspective: the sink must not block
/// the dispatch worker for long, and its failures are its own to report.
pub trait EventSink: Send + Sync {
    /// Delivers one event to the application.
    fn fire(&self, event: GemEvent);
}
