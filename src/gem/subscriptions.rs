//! Report subscription registry.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::ResolutionError;
use crate::gem::events::ResolvedValue;
use crate::ids::{DataValueId, ReportId};
use crate::value::Value;

/// First auto-assigned report id.
///
/// Host-assigned ids start well above the small ids equipment vendors tend to
/// predefine, so auto-numbered reports do not collide with them.
const AUTO_REPORT_ID_BASE: u64 = 1000;

#[derive(Debug)]
struct SubscriptionState {
    reports: HashMap<ReportId, Vec<DataValueId>>,
    next_auto_id: u64,
}

/// Registry mapping each subscribed report id to the ordered data value ids
/// that report represents.
///
/// All operations are linearizable behind a single guard: the registry is
/// read from the dispatch worker and written from caller threads
/// concurrently. The auto-numbering counter is instance state, so independent
/// registries do not interfere.
#[derive(Debug)]
pub struct ReportSubscriptions {
    inner: Mutex<SubscriptionState>,
}

impl Default for ReportSubscriptions {
    fn default() -> Self {
        Self {
            inner: Mutex::new(SubscriptionState {
                reports: HashMap::new(),
                next_auto_id: AUTO_REPORT_ID_BASE,
            }),
        }
    }
}

impl ReportSubscriptions {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SubscriptionState> {
        // The guarded state is a plain map plus a counter; no operation can
        // leave it half-updated, so a poisoned guard is recovered.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a subscription, replacing any prior entry for the same id.
    ///
    /// With `report_id` omitted, the next auto-numbered id is assigned.
    /// Auto-assigned ids are strictly increasing and never reused within this
    /// registry instance, including across [`clear`](Self::clear). An explicit
    /// id the counter later reaches is replaced like any other re-subscribed
    /// id (last write wins).
    pub fn subscribe(
        &self,
        report_id: Option<ReportId>,
        data_value_ids: Vec<DataValueId>,
    ) -> ReportId {
        let mut state = self.lock();

        let report_id = report_id.unwrap_or_else(|| {
            let id = ReportId::from(state.next_auto_id);
            state.next_auto_id += 1;
            id
        });

        state.reports.insert(report_id, data_value_ids);
        report_id
    }

    /// Atomically empties the registry.
    ///
    /// No protocol side effect: disabling the server-side event/report
    /// linkage is the caller's job, through its own collaborators.
    pub fn clear(&self) {
        self.lock().reports.clear();
    }

    /// Zips the subscribed data value ids for `report_id` with the positional
    /// values of an incoming report, in order.
    ///
    /// Fails with [`ResolutionError::UnknownReport`] for an unsubscribed id
    /// and [`ResolutionError::ArityMismatch`] when the value count differs
    /// from the subscription; values are never truncated or padded.
    pub fn resolve(
        &self,
        report_id: ReportId,
        positional_values: Vec<Value>,
    ) -> Result<Vec<ResolvedValue>, ResolutionError> {
        let state = self.lock();

        let data_value_ids = state
            .reports
            .get(&report_id)
            .ok_or(ResolutionError::UnknownReport { report_id })?;

        if data_value_ids.len() != positional_values.len() {
            return Err(ResolutionError::ArityMismatch {
                report_id,
                expected: data_value_ids.len(),
                actual: positional_values.len(),
            });
        }

        Ok(data_value_ids
            .iter()
            .copied()
            .zip(positional_values)
            .map(|(data_value, value)| ResolvedValue { data_value, value })
            .collect())
    }

    /// The subscribed data value ids for `report_id`, if any.
    #[must_use]
    pub fn data_values(&self, report_id: ReportId) -> Option<Vec<DataValueId>> {
        self.lock().reports.get(&report_id).cloned()
    }

    /// Whether `report_id` is subscribed.
    #[must_use]
    pub fn contains(&self, report_id: ReportId) -> bool {
        self.lock().reports.contains_key(&report_id)
    }

    /// Number of subscribed reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().reports.len()
    }

    /// Whether no reports are subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().reports.is_empty()
    }
}
