//! Event report resolution.

use std::sync::Arc;

use tracing::warn;

use crate::error::ResolutionError;
use crate::gem::events::{CollectionEventReport, EventSink, GemEvent};
use crate::gem::subscriptions::ReportSubscriptions;
use crate::ids::SessionId;
use crate::message::EventReport;

/// Translates decoded event reports into resolved collection events.
///
/// Each report block is resolved independently: a block whose report id is
/// unknown (or whose value count disagrees with the subscription) is reported
/// and skipped, and its siblings in the same message still resolve. Partial
/// success is expected.
pub struct EventReportResolver {
    subscriptions: Arc<ReportSubscriptions>,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for EventReportResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventReportResolver")
            .field("subscriptions", &self.subscriptions)
            .finish_non_exhaustive()
    }
}

impl EventReportResolver {
    /// Creates a resolver over a registry and an event sink.
    #[must_use]
    pub fn new(subscriptions: Arc<ReportSubscriptions>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            subscriptions,
            sink,
        }
    }

    /// Resolves every report block of `report`, firing one collection event
    /// per resolved block at the sink.
    ///
    /// Returns the per-block failures (empty on total success); failures are
    /// also logged at warn level. The caller decides nothing on them — the
    /// enclosing message is acknowledged either way.
    pub fn process(&self, origin: SessionId, report: &EventReport) -> Vec<ResolutionError> {
        let mut failures = Vec::new();

        for block in &report.reports {
            match self
                .subscriptions
                .resolve(block.report_id, block.values.clone())
            {
                Ok(values) => {
                    self.sink.fire(GemEvent::CollectionEvent(
                        CollectionEventReport::new(
                            origin,
                            report.collection_event,
                            block.report_id,
                            values,
                        ),
                    ));
                }
                Err(err) => {
                    warn!(
                        ceid = %report.collection_event,
                        rptid = %block.report_id,
                        error = %err,
                        "dropping unresolvable report block"
                    );
                    failures.push(err);
                }
            }
        }

        failures
    }
}
