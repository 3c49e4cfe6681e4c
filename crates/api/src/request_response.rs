// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use fieldcheck::BulkItem;
use fieldcheck_audit::AuditEvent;
use fieldcheck_domain::{
    ActionRecord, ApprovalStatus, AttendanceAction, AttendanceRecord, Decision, HoursSummary,
    Office, Validity,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// API request to check in at an office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInRequest {
    /// The officer checking in.
    pub officer_id: String,
    /// The office being checked in at.
    pub office_id: String,
    /// Device latitude in degrees.
    pub latitude: f64,
    /// Device longitude in degrees.
    pub longitude: f64,
    /// Opaque, already-compressed photo payload.
    pub photo: String,
    /// Capture time on the device. Rejected when it strays from the server
    /// clock, which always decides the recorded time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
}

/// API request to check out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutRequest {
    /// The officer checking out.
    pub officer_id: String,
    /// Device latitude in degrees.
    pub latitude: f64,
    /// Device longitude in degrees.
    pub longitude: f64,
    /// Opaque, already-compressed photo payload.
    pub photo: String,
    /// Capture time on the device. Rejected when it strays from the server
    /// clock, which always decides the recorded time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
}

/// API request to justify an out-of-range action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReasonRequest {
    /// The action being justified.
    pub action: AttendanceAction,
    /// The officer's explanation.
    pub reason: String,
    /// Optional supporting photo.
    #[serde(default)]
    pub photo: Option<String>,
}

/// API request for a single supervisor decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// The action being decided.
    pub action: AttendanceAction,
    /// Approve or reject.
    pub decision: Decision,
    /// Required when rejecting.
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// API request for a bulk supervisor decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDecisionRequest {
    /// Explicit `(attendance_id, action)` targets.
    pub items: Vec<BulkItem>,
    /// Approve or reject, applied to every item.
    pub decision: Decision,
    /// Required when rejecting.
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// Selects a pending-approval queue: by office or by supervisor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingApprovalsQuery {
    /// Queue of one office.
    #[serde(default)]
    pub office_id: Option<String>,
    /// Queue across every office a supervisor is assigned to.
    #[serde(default)]
    pub supervisor_id: Option<String>,
}

/// Inclusive day range for an hours summary, as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursQuery {
    /// First day, inclusive.
    pub from: String,
    /// Last day, inclusive.
    pub to: String,
}

/// One action as presented to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionView {
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
    pub latitude: f64,
    pub longitude: f64,
    /// Distance from the office rounded to 0.1 m.
    pub distance_m: f64,
    pub within_radius: bool,
    pub status: ApprovalStatus,
    pub needs_reason: bool,
    pub reason: Option<String>,
    pub has_reason_photo: bool,
    pub rejection_reason: Option<String>,
    pub decided_by: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub decided_at: Option<OffsetDateTime>,
}

impl From<&ActionRecord> for ActionView {
    fn from(action: &ActionRecord) -> Self {
        Self {
            time: action.time,
            latitude: action.location.lat(),
            longitude: action.location.lng(),
            distance_m: action.display_distance(),
            within_radius: action.within_radius,
            status: action.status,
            needs_reason: action.needs_reason(),
            reason: action.reason.clone(),
            has_reason_photo: action.reason_photo.is_some(),
            rejection_reason: action.rejection_reason.clone(),
            decided_by: action.decided_by.clone(),
            decided_at: action.decided_at,
        }
    }
}

/// An attendance record as presented to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceView {
    pub attendance_id: i64,
    pub officer_id: String,
    pub office_id: String,
    /// Calendar day in the deployment timezone, `YYYY-MM-DD`.
    pub work_date: String,
    pub radius_m: f64,
    pub checkin: ActionView,
    pub checkout: Option<ActionView>,
    pub overall_validity: Validity,
    pub total_hours: Option<f64>,
    pub version: i64,
}

impl From<&AttendanceRecord> for AttendanceView {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            attendance_id: record.id(),
            officer_id: record.officer_id.value().to_string(),
            office_id: record.office_id.value().to_string(),
            work_date: record.work_date.to_string(),
            radius_m: record.geofence.radius_m(),
            checkin: ActionView::from(&record.checkin),
            checkout: record.checkout.as_ref().map(ActionView::from),
            overall_validity: record.overall_validity(),
            total_hours: record.total_hours(),
            version: record.version,
        }
    }
}

/// API response for every attendance write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceResponse {
    /// The record after the operation.
    pub attendance: AttendanceView,
    /// True when the touched action is out of range and still needs a reason.
    pub needs_reason: bool,
    /// False when the request repeated a decision already in effect.
    pub changed: bool,
    /// The audit event written, if anything changed.
    pub event_id: Option<i64>,
    /// A success message.
    pub message: String,
}

/// Records with at least one pending action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingApprovalsResponse {
    pub records: Vec<AttendanceView>,
}

/// Worked hours for one officer over a day range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoursSummaryResponse {
    pub officer_id: String,
    pub from: String,
    pub to: String,
    pub summary: HoursSummary,
}

/// One audit event as presented to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventView {
    pub event_id: Option<i64>,
    pub actor_id: String,
    pub actor_type: String,
    pub cause_id: String,
    pub cause_description: String,
    pub action_name: String,
    pub action_details: Option<String>,
    pub before_snapshot: String,
    pub after_snapshot: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&AuditEvent> for AuditEventView {
    fn from(event: &AuditEvent) -> Self {
        Self {
            event_id: event.event_id,
            actor_id: event.actor.id.clone(),
            actor_type: event.actor.actor_type.clone(),
            cause_id: event.cause.id.clone(),
            cause_description: event.cause.description.clone(),
            action_name: event.action.name.clone(),
            action_details: event.action.details.clone(),
            before_snapshot: event.before.data.clone(),
            after_snapshot: event.after.data.clone(),
            created_at: event.created_at,
        }
    }
}

/// The audit trail of one attendance record, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTimelineResponse {
    pub attendance_id: i64,
    pub events: Vec<AuditEventView>,
}

/// An office as presented to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeView {
    pub office_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
    pub is_active: bool,
    pub supervisor_ids: Vec<String>,
}

impl From<&Office> for OfficeView {
    fn from(office: &Office) -> Self {
        Self {
            office_id: office.office_id.value().to_string(),
            name: office.name.clone(),
            latitude: office.geofence.center().lat(),
            longitude: office.geofence.center().lng(),
            radius_m: office.geofence.radius_m(),
            is_active: office.is_active,
            supervisor_ids: office.supervisor_ids.clone(),
        }
    }
}

/// Every known office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListOfficesResponse {
    pub offices: Vec<OfficeView>,
}
