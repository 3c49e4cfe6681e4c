// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance records and the per-action approval state machine.
//!
//! Each record holds a check-in and, once the check-in is approved, an
//! optional check-out. Both actions carry their own approval status:
//!
//! ```text
//! NONE -> PENDING -> APPROVED <-> REJECTED
//!                 \-> REJECTED <-> APPROVED
//! ```
//!
//! No transition ever returns an action to `PENDING`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

use crate::error::DomainError;
use crate::geo::{GeoPoint, Geofence, GeofenceReading, display_distance};
use crate::types::{OfficeId, OfficerId, PhotoRef};

/// One of the two actions an officer performs per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceAction {
    /// Arrival at the office.
    CheckIn,
    /// Departure from the office.
    CheckOut,
}

impl AttendanceAction {
    /// Returns the string representation used by persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CheckIn => "checkin",
            Self::CheckOut => "checkout",
        }
    }
}

impl std::fmt::Display for AttendanceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checkin" | "check_in" => Ok(Self::CheckIn),
            "checkout" | "check_out" => Ok(Self::CheckOut),
            _ => Err(format!(
                "unknown action '{s}', expected 'checkin' or 'checkout'"
            )),
        }
    }
}

/// Supervisor approval status of a single action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting a supervisor decision.
    Pending,
    /// Counted as valid attendance.
    Approved,
    /// Not counted.
    Rejected,
}

impl ApprovalStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns the status a decision leads to, or `None` when the action
    /// already holds that value and the decision is a no-op.
    #[must_use]
    pub const fn after(self, decision: Decision) -> Option<Self> {
        match (self, decision) {
            (Self::Approved, Decision::Approve) | (Self::Rejected, Decision::Reject) => None,
            (_, Decision::Approve) => Some(Self::Approved),
            (_, Decision::Reject) => Some(Self::Rejected),
        }
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("unknown approval status '{s}'")),
        }
    }
}

/// A supervisor's verdict on one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Accept the action as valid attendance.
    Approve,
    /// Refuse the action.
    Reject,
}

impl Decision {
    /// Returns the string representation of the decision.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            _ => Err(format!(
                "unknown decision '{s}', expected 'approve' or 'reject'"
            )),
        }
    }
}

/// Whether attendance locations were inside the office geofence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validity {
    /// Every recorded action was within the radius.
    Valid,
    /// At least one recorded action was outside the radius.
    Invalid,
}

impl Validity {
    /// Returns the string representation of the validity.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}

/// The state of a single check-in or check-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// When the officer performed the action.
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
    /// Where the officer was.
    pub location: GeoPoint,
    /// Full-precision distance from the office, in meters.
    pub distance_m: f64,
    /// Whether the location was inside the geofence.
    pub within_radius: bool,
    /// Photo captured with the action.
    pub photo: PhotoRef,
    /// Supervisor approval status.
    pub status: ApprovalStatus,
    /// Why the supervisor rejected the action.
    #[serde(default)]
    pub rejection_reason: Option<String>,
    /// Officer's justification for an out-of-range action.
    #[serde(default)]
    pub reason: Option<String>,
    /// Optional photo supporting the reason.
    #[serde(default)]
    pub reason_photo: Option<PhotoRef>,
    /// When the reason was submitted.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub reason_submitted_at: Option<OffsetDateTime>,
    /// The supervisor who made the latest decision.
    #[serde(default)]
    pub decided_by: Option<String>,
    /// When the latest decision was made.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub decided_at: Option<OffsetDateTime>,
}

impl ActionRecord {
    /// Creates a pending action from a geofence reading.
    #[must_use]
    pub const fn pending(
        time: OffsetDateTime,
        location: GeoPoint,
        reading: GeofenceReading,
        photo: PhotoRef,
    ) -> Self {
        Self {
            time,
            location,
            distance_m: reading.distance_m,
            within_radius: reading.within_radius,
            photo,
            status: ApprovalStatus::Pending,
            rejection_reason: None,
            reason: None,
            reason_photo: None,
            reason_submitted_at: None,
            decided_by: None,
            decided_at: None,
        }
    }

    /// Validity of this action alone.
    #[must_use]
    pub const fn validity(&self) -> Validity {
        if self.within_radius {
            Validity::Valid
        } else {
            Validity::Invalid
        }
    }

    /// True when the action is out of range and still lacks a reason.
    #[must_use]
    pub const fn needs_reason(&self) -> bool {
        !self.within_radius && self.reason.is_none()
    }

    /// Distance rounded to 0.1 m for display.
    #[must_use]
    pub fn display_distance(&self) -> f64 {
        display_distance(self.distance_m)
    }
}

/// One officer's attendance for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Canonical identifier, assigned by the store on first write.
    pub attendance_id: Option<i64>,
    /// The officer. Immutable after creation.
    pub officer_id: OfficerId,
    /// The office. Immutable after creation.
    pub office_id: OfficeId,
    /// The calendar day in the authoritative timezone.
    pub work_date: time::Date,
    /// Office geofence as it was at check-in.
    pub geofence: Geofence,
    /// The check-in action.
    pub checkin: ActionRecord,
    /// The check-out action, once recorded.
    pub checkout: Option<ActionRecord>,
    /// Optimistic concurrency version; bumped on every committed write.
    pub version: i64,
}

impl AttendanceRecord {
    /// Creates a new record for a check-in.
    #[must_use]
    pub const fn new(
        officer_id: OfficerId,
        office_id: OfficeId,
        work_date: time::Date,
        geofence: Geofence,
        checkin: ActionRecord,
    ) -> Self {
        Self {
            attendance_id: None,
            officer_id,
            office_id,
            work_date,
            geofence,
            checkin,
            checkout: None,
            version: 0,
        }
    }

    /// Returns the canonical identifier, or 0 for an unsaved record.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.attendance_id.unwrap_or_default()
    }

    /// Returns the given action, if recorded.
    #[must_use]
    pub const fn action(&self, action: AttendanceAction) -> Option<&ActionRecord> {
        match action {
            AttendanceAction::CheckIn => Some(&self.checkin),
            AttendanceAction::CheckOut => self.checkout.as_ref(),
        }
    }

    /// Returns the given action mutably, if recorded.
    pub fn action_mut(&mut self, action: AttendanceAction) -> Option<&mut ActionRecord> {
        match action {
            AttendanceAction::CheckIn => Some(&mut self.checkin),
            AttendanceAction::CheckOut => self.checkout.as_mut(),
        }
    }

    /// Returns the action or `ActionNotRecorded`.
    ///
    /// # Errors
    ///
    /// Returns an error if the action has not been recorded.
    pub fn require_action(&self, action: AttendanceAction) -> Result<&ActionRecord, DomainError> {
        self.action(action)
            .ok_or_else(|| DomainError::ActionNotRecorded {
                attendance_id: self.id(),
                action,
            })
    }

    /// Valid iff every recorded action was within the geofence.
    #[must_use]
    pub fn overall_validity(&self) -> Validity {
        let checkout_ok: bool = self.checkout.as_ref().is_none_or(|c| c.within_radius);
        if self.checkin.within_radius && checkout_ok {
            Validity::Valid
        } else {
            Validity::Invalid
        }
    }

    /// Worked hours, defined only when both actions are approved.
    #[must_use]
    pub fn total_hours(&self) -> Option<f64> {
        let checkout: &ActionRecord = self.checkout.as_ref()?;
        if self.checkin.status != ApprovalStatus::Approved
            || checkout.status != ApprovalStatus::Approved
        {
            return None;
        }
        let worked: time::Duration = checkout.time - self.checkin.time;
        Some(worked.as_seconds_f64() / 3600.0)
    }

    /// True if any action is awaiting a decision.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.checkin.status == ApprovalStatus::Pending
            || self
                .checkout
                .as_ref()
                .is_some_and(|c| c.status == ApprovalStatus::Pending)
    }

    /// True if any action has been rejected.
    #[must_use]
    pub fn has_rejection(&self) -> bool {
        self.checkin.status == ApprovalStatus::Rejected
            || self
                .checkout
                .as_ref()
                .is_some_and(|c| c.status == ApprovalStatus::Rejected)
    }

    /// A compact textual summary used for audit snapshots.
    #[must_use]
    pub fn summary(&self) -> String {
        let checkout: String = self.checkout.as_ref().map_or_else(
            || String::from("none"),
            |c| format!("{}@{}m", c.status, c.display_distance()),
        );
        format!(
            "attendance_id={},officer={},office={},date={},checkin={}@{}m,checkout={},validity={},version={}",
            self.id(),
            self.officer_id,
            self.office_id,
            self.work_date,
            self.checkin.status,
            self.checkin.display_distance(),
            checkout,
            self.overall_validity().as_str(),
            self.version
        )
    }
}
