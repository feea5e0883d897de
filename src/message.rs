//! Decoded message objects and typed views.
//!
//! The wire codec is an external collaborator; this core consumes `Message`
//! values it produced. A `Message` is the generic `(stream, function, body)`
//! form; the typed views (`EventReport`, `Alarm`, `Terminal`) expose the
//! structure the host layer actually works with and fail with a
//! [`MessageError`] when the body does not have the expected item shape.

use serde::{Deserialize, Serialize};

use crate::error::{GemResult, MessageError};
use crate::ids::{AlarmId, CollectionEventId, ReportId};
use crate::value::Value;

/// A decoded protocol message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Stream number.
    pub stream: u8,
    /// Function number.
    pub function: u8,
    /// Decoded body item.
    pub body: Value,
}

impl Message {
    /// Creates a message from its parts.
    #[must_use]
    pub const fn new(stream: u8, function: u8, body: Value) -> Self {
        Self {
            stream,
            function,
            body,
        }
    }

    /// S6F12 event report acknowledge, ACKC6 = accepted.
    #[must_use]
    pub fn event_report_ack() -> Self {
        Self::new(6, 12, Value::Binary(vec![0]))
    }

    /// S5F2 alarm report acknowledge, ACKC5 = accepted.
    #[must_use]
    pub fn alarm_ack() -> Self {
        Self::new(5, 2, Value::Binary(vec![0]))
    }

    /// S10F2 terminal request acknowledge, ACKC10 = accepted.
    #[must_use]
    pub fn terminal_ack() -> Self {
        Self::new(10, 2, Value::Binary(vec![0]))
    }

    fn expect_function(&self, stream: u8, function: u8) -> Result<(), MessageError> {
        if self.stream == stream && self.function == function {
            Ok(())
        } else {
            Err(MessageError::UnexpectedFunction {
                expected_stream: stream,
                expected_function: function,
                stream: self.stream,
                function: self.function,
            })
        }
    }

    fn malformed(&self, context: impl Into<String>) -> MessageError {
        MessageError::Malformed {
            stream: self.stream,
            function: self.function,
            context: context.into(),
        }
    }
}

/// One report block inside an event report: the report id and the positional
/// values in subscription order.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportBlock {
    pub report_id: ReportId,
    pub values: Vec<Value>,
}

/// Typed view of S6F11, Event Report Send.
///
/// Body shape: `L[3] { DATAID, CEID, L[n] { L[2] { RPTID, L[m] V } } }`.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventReport {
    pub collection_event: CollectionEventId,
    pub reports: Vec<ReportBlock>,
}

impl EventReport {
    /// Decodes the typed view from a generic message.
    pub fn decode(message: &Message) -> GemResult<Self> {
        message.expect_function(6, 11)?;

        let items = message
            .body
            .as_list()
            .ok_or_else(|| message.malformed("body is not a list"))?;
        let [_, ceid, reports] = items else {
            return Err(message.malformed(format!("expected 3 items, got {}", items.len())).into());
        };

        let collection_event = ceid
            .as_u64()
            .map(CollectionEventId::from)
            .ok_or_else(|| message.malformed("CEID is not an integer"))?;

        let report_items = reports
            .as_list()
            .ok_or_else(|| message.malformed("report list is not a list"))?;

        let mut blocks = Vec::with_capacity(report_items.len());
        for item in report_items {
            let pair = item
                .as_list()
                .ok_or_else(|| message.malformed("report block is not a list"))?;
            let [rptid, values] = pair else {
                return Err(message
                    .malformed(format!("report block has {} items, expected 2", pair.len()))
                    .into());
            };

            let report_id = rptid
                .as_u64()
                .map(ReportId::from)
                .ok_or_else(|| message.malformed("RPTID is not an integer"))?;
            let values = values
                .as_list()
                .ok_or_else(|| message.malformed("report values are not a list"))?;

            blocks.push(ReportBlock {
                report_id,
                values: values.to_vec(),
            });
        }

        Ok(Self {
            collection_event,
            reports: blocks,
        })
    }
}

/// Typed view of S5F1, Alarm Report Send.
///
/// Body shape: `L[3] { ALCD, ALID, ALTX }`.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    pub alarm_id: AlarmId,
    /// Alarm code byte; bit 7 set means the alarm is active.
    pub code: u8,
    pub text: String,
}

impl Alarm {
    /// Decodes the typed view from a generic message.
    pub fn decode(message: &Message) -> GemResult<Self> {
        message.expect_function(5, 1)?;

        let items = message
            .body
            .as_list()
            .ok_or_else(|| message.malformed("body is not a list"))?;
        let [alcd, alid, altx] = items else {
            return Err(message.malformed(format!("expected 3 items, got {}", items.len())).into());
        };

        let code = alcd
            .as_binary()
            .and_then(|b| b.first().copied())
            .ok_or_else(|| message.malformed("ALCD is not a one-byte binary"))?;
        let alarm_id = alid
            .as_u64()
            .map(AlarmId::from)
            .ok_or_else(|| message.malformed("ALID is not an integer"))?;
        let text = altx
            .as_ascii()
            .ok_or_else(|| message.malformed("ALTX is not ascii"))?
            .to_string();

        Ok(Self {
            alarm_id,
            code,
            text,
        })
    }
}

/// Typed view of S10F1, Terminal Request.
///
/// Body shape: `L[2] { TID, TEXT }`.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terminal {
    pub terminal_id: u64,
    pub text: String,
}

impl Terminal {
    /// Decodes the typed view from a generic message.
    pub fn decode(message: &Message) -> GemResult<Self> {
        message.expect_function(10, 1)?;

        let items = message
            .body
            .as_list()
            .ok_or_else(|| message.malformed("body is not a list"))?;
        let [tid, text] = items else {
            return Err(message.malformed(format!("expected 2 items, got {}", items.len())).into());
        };

        let terminal_id = tid
            .as_u64()
            .or_else(|| tid.as_binary().and_then(|b| b.first().copied().map(u64::from)))
            .ok_or_else(|| message.malformed("TID is not an integer or binary"))?;
        let text = text
            .as_ascii()
            .ok_or_else(|| message.malformed("TEXT is not ascii"))?
            .to_string();

        Ok(Self { terminal_id, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GemError;

    fn s6f11(ceid: u64, reports: Vec<(u64, Vec<Value>)>) -> Message {
        let blocks = reports
            .into_iter()
            .map(|(rptid, values)| {
                Value::List(vec![Value::UInt(rptid), Value::List(values)])
            })
            .collect();
        Message::new(
            6,
            11,
            Value::List(vec![Value::UInt(0), Value::UInt(ceid), Value::List(blocks)]),
        )
    }

    #[test]
    fn test_event_report_decode() {
        let message = s6f11(
            30,
            vec![(1000, vec![Value::Float(21.5), Value::Ascii("OK".into())])],
        );
        let report = EventReport::decode(&message).unwrap();
        assert_eq!(report.collection_event, CollectionEventId::from(30));
        assert_eq!(report.reports.len(), 1);
        assert_eq!(report.reports[0].report_id, ReportId::from(1000));
        assert_eq!(report.reports[0].values.len(), 2);
    }

    #[test]
    fn test_event_report_decode_accepts_signed_ids() {
        let message = Message::new(
            6,
            11,
            Value::List(vec![
                Value::UInt(0),
                Value::Int(30),
                Value::List(vec![Value::List(vec![
                    Value::Int(1000),
                    Value::List(vec![]),
                ])]),
            ]),
        );
        let report = EventReport::decode(&message).unwrap();
        assert_eq!(report.reports[0].report_id, ReportId::from(1000));
    }

    #[test]
    fn test_event_report_decode_wrong_function() {
        let message = Message::new(5, 1, Value::List(vec![]));
        let err = EventReport::decode(&message).unwrap_err();
        let GemError::Message(MessageError::UnexpectedFunction { stream, function, .. }) = err
        else {
            panic!("expected unexpected-function error, got {err:?}");
        };
        assert_eq!((stream, function), (5, 1));
    }

    #[test]
    fn test_event_report_decode_malformed_body() {
        let message = Message::new(6, 11, Value::Ascii("junk".into()));
        let err = EventReport::decode(&message).unwrap_err();
        assert!(matches!(
            err,
            GemError::Message(MessageError::Malformed { stream: 6, function: 11, .. })
        ));
    }

    #[test]
    fn test_alarm_decode() {
        let message = Message::new(
            5,
            1,
            Value::List(vec![
                Value::Binary(vec![0x80]),
                Value::UInt(12),
                Value::Ascii("CHAMBER OVERTEMP".into()),
            ]),
        );
        let alarm = Alarm::decode(&message).unwrap();
        assert_eq!(alarm.alarm_id, AlarmId::from(12));
        assert_eq!(alarm.code, 0x80);
        assert_eq!(alarm.text, "CHAMBER OVERTEMP");
    }

    #[test]
    fn test_terminal_decode() {
        let message = Message::new(
            10,
            1,
            Value::List(vec![Value::Binary(vec![1]), Value::Ascii("LOT DONE".into())]),
        );
        let terminal = Terminal::decode(&message).unwrap();
        assert_eq!(terminal.terminal_id, 1);
        assert_eq!(terminal.text, "LOT DONE");
    }

    #[test]
    fn test_ack_constructors() {
        let ack = Message::event_report_ack();
        assert_eq!((ack.stream, ack.function), (6, 12));
        assert_eq!(ack.body, Value::Binary(vec![0]));

        assert_eq!(Message::alarm_ack().stream, 5);
        assert_eq!(Message::terminal_ack().function, 2);
    }
}
