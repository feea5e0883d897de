//! Identifier newtypes for the GEM data model.
//!
//! SECS/GEM identifiers are plain integers on the wire; the newtypes keep a
//! CEID from being handed to an API expecting an RPTID.

use serde::{Deserialize, Serialize};

/// Identifier of a collection event (a defined occurrence on the equipment
/// side), CEID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionEventId(u64);

/// Identifier of a report, RPTID: a named, ordered group of data values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(u64);

/// Identifier of a single data value within a report, DVID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataValueId(u64);

/// Identifier of an alarm, ALID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlarmId(u64);

/// Opaque handle naming the peer connection a message arrived on.
///
/// The dispatch pipeline never inspects it; it is threaded through to event
/// payloads and reply sending so a multi-connection handler can tell peers
/// apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

macro_rules! id_impls {
    ($name:ident) => {
        impl $name {
            /// Wraps a raw numeric identifier.
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// The raw numeric identifier.
            #[must_use]
            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_impls!(CollectionEventId);
id_impls!(ReportId);
id_impls!(DataValueId);
id_impls!(AlarmId);
id_impls!(SessionId);
