// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outbound notifications for committed transitions.
//!
//! An event is published only after the record write has committed. No-op
//! decisions and failed commands publish nothing.

use std::sync::Mutex;

use fieldcheck_domain::{ApprovalStatus, AttendanceAction, AttendanceRecord, Validity};
use serde::{Deserialize, Serialize};

/// What kind of transition produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    CheckedIn,
    CheckedOut,
    ReasonSubmitted,
    Decided,
}

/// An externally observable attendance change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    pub attendance_id: i64,
    pub kind: EventKind,
    pub action: AttendanceAction,
    pub new_status: ApprovalStatus,
    pub overall_validity: Validity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_hours: Option<f64>,
    pub officer_id: String,
    pub office_id: String,
}

impl AttendanceEvent {
    /// Builds the event for `action` from a committed record.
    ///
    /// Returns `None` if the record does not hold that action.
    #[must_use]
    pub fn from_record(
        kind: EventKind,
        action: AttendanceAction,
        record: &AttendanceRecord,
    ) -> Option<Self> {
        let target = record.action(action)?;
        Some(Self {
            attendance_id: record.id(),
            kind,
            action,
            new_status: target.status,
            overall_validity: record.overall_validity(),
            total_hours: record.total_hours(),
            officer_id: record.officer_id.value().to_string(),
            office_id: record.office_id.value().to_string(),
        })
    }
}

/// Receives events after each committed transition.
///
/// Implementations must not block; slow consumers should buffer or drop.
pub trait EventSink: Send + Sync {
    /// Publishes one event.
    fn publish(&self, event: AttendanceEvent);
}

/// Keeps every event in memory, in publish order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<AttendanceEvent>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything published so far.
    #[must_use]
    pub fn events(&self) -> Vec<AttendanceEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for CollectingSink {
    fn publish(&self, event: AttendanceEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
