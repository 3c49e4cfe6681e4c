// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! Audit trail for attendance state changes.
//!
//! Every committed transition produces exactly one [`AuditEvent`] that records
//! who acted, why, what changed, and the record state on either side of the
//! change. Idempotent no-op decisions produce no event.

#[cfg(test)]
mod tests;

use fieldcheck_domain::{AttendanceAction, AttendanceRecord, OfficeId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The entity performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The unique identifier for this actor (officer or supervisor id).
    pub id: String,
    /// The actor's role (e.g. "officer", "supervisor", "admin", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// The reason or trigger for an action, typically a request id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    /// Request or correlation identifier.
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// The state change that was performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the action (e.g. "`CheckIn`", "`ApproveCheckOut`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }

    /// The action name for a decision on `action`.
    #[must_use]
    pub fn decision_name(approve: bool, action: AttendanceAction) -> String {
        let verb: &str = if approve { "Approve" } else { "Reject" };
        let target: &str = match action {
            AttendanceAction::CheckIn => "CheckIn",
            AttendanceAction::CheckOut => "CheckOut",
        };
        format!("{verb}{target}")
    }
}

/// A textual snapshot of an attendance record at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// Snapshot of an attendance record.
    #[must_use]
    pub fn of_record(record: &AttendanceRecord) -> Self {
        Self::new(record.summary())
    }

    /// Snapshot used before a record exists.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(String::from("none"))
    }
}

/// An immutable audit event representing one attendance transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Store-assigned identifier, `None` until persisted.
    pub event_id: Option<i64>,
    /// The attendance record this event belongs to.
    ///
    /// `None` only for a check-in that has not been persisted yet; the
    /// store fills it in when the record and event are written together.
    pub attendance_id: Option<i64>,
    /// The office of the attendance record.
    pub office_id: OfficeId,
    /// When the transition happened.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new, unpersisted `AuditEvent`.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        attendance_id: Option<i64>,
        office_id: OfficeId,
        created_at: OffsetDateTime,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            event_id: None,
            attendance_id,
            office_id,
            created_at,
            actor,
            cause,
            action,
            before,
            after,
        }
    }

    /// Returns a copy bound to a persisted attendance id.
    #[must_use]
    pub fn for_attendance(mut self, attendance_id: i64) -> Self {
        self.attendance_id = Some(attendance_id);
        self
    }
}
