// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

use crate::attendance::AttendanceAction;

/// Errors that can occur during domain validation and attendance transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A coordinate is NaN or outside the valid latitude/longitude range.
    #[error("Invalid coordinate: {reason}")]
    InvalidCoordinate {
        /// Why the coordinate was rejected.
        reason: String,
    },
    /// A geofence radius is not a positive, finite number of meters.
    #[error("Invalid geofence radius: {reason}")]
    InvalidRadius {
        /// Why the radius was rejected.
        reason: String,
    },
    /// An officer or office identifier is empty or malformed.
    #[error("Invalid {field}: {reason}")]
    InvalidIdentifier {
        /// The identifier field.
        field: &'static str,
        /// Why the identifier was rejected.
        reason: String,
    },
    /// A photo payload is empty or exceeds the configured bound.
    #[error("Invalid photo: {reason}")]
    InvalidPhoto {
        /// Why the photo was rejected.
        reason: String,
    },
    /// A reason text is blank.
    #[error("Invalid reason: {reason}")]
    InvalidReason {
        /// Why the reason was rejected.
        reason: String,
    },
    /// The configured day-boundary timezone is not a valid IANA name.
    #[error("Invalid timezone: '{0}'")]
    InvalidTimezone(String),
    /// An instant could not be mapped onto a calendar day.
    #[error("Date conversion failed: {reason}")]
    DateConversion {
        /// What went wrong.
        reason: String,
    },
    /// The office does not exist.
    #[error("Office '{office_id}' not found")]
    OfficeNotFound {
        /// The office identifier.
        office_id: String,
    },
    /// The office exists but is not accepting attendance.
    #[error("Office '{office_id}' is inactive")]
    OfficeInactive {
        /// The office identifier.
        office_id: String,
    },
    /// The officer already has an attendance record for the day.
    #[error("Officer '{officer_id}' already checked in on {work_date}")]
    DuplicateAction {
        /// The officer identifier.
        officer_id: String,
        /// The calendar day of the existing record.
        work_date: time::Date,
    },
    /// The officer has no attendance record for the day.
    #[error("Officer '{officer_id}' has no check-in on {work_date}")]
    NoActiveCheckIn {
        /// The officer identifier.
        officer_id: String,
        /// The calendar day that was searched.
        work_date: time::Date,
    },
    /// Check-out attempted before the check-in was approved.
    #[error("Check-in for attendance {attendance_id} has not been approved")]
    CheckInNotApproved {
        /// The attendance record identifier.
        attendance_id: i64,
    },
    /// A check-out already exists on the record.
    #[error("Attendance {attendance_id} is already checked out")]
    AlreadyCheckedOut {
        /// The attendance record identifier.
        attendance_id: i64,
    },
    /// Check-out time precedes the check-in time.
    #[error("Check-out at {check_out} precedes check-in at {check_in}")]
    CheckOutBeforeCheckIn {
        /// The recorded check-in time.
        check_in: time::OffsetDateTime,
        /// The rejected check-out time.
        check_out: time::OffsetDateTime,
    },
    /// The attendance record does not exist.
    #[error("Attendance {0} not found")]
    AttendanceNotFound(i64),
    /// The action has not been recorded on the attendance yet.
    #[error("Attendance {attendance_id} has no {action} recorded")]
    ActionNotRecorded {
        /// The attendance record identifier.
        attendance_id: i64,
        /// The missing action.
        action: AttendanceAction,
    },
    /// A reason was submitted for an action that is within the geofence.
    #[error("Attendance {attendance_id} {action} is within range; no reason is required")]
    ReasonNotRequired {
        /// The attendance record identifier.
        attendance_id: i64,
        /// The action.
        action: AttendanceAction,
    },
    /// A reason already exists for the action.
    #[error("Attendance {attendance_id} {action} already has a reason")]
    ReasonAlreadyProvided {
        /// The attendance record identifier.
        attendance_id: i64,
        /// The action.
        action: AttendanceAction,
    },
    /// Approval of an out-of-range action without a reason.
    #[error("Attendance {attendance_id} {action} is out of range and needs a reason before approval")]
    ReasonRequired {
        /// The attendance record identifier.
        attendance_id: i64,
        /// The action.
        action: AttendanceAction,
    },
    /// Rejection without a rejection reason.
    #[error("Rejecting attendance {attendance_id} {action} requires a rejection reason")]
    RejectionReasonRequired {
        /// The attendance record identifier.
        attendance_id: i64,
        /// The action.
        action: AttendanceAction,
    },
    /// The check-in cannot be rejected because a check-out depends on it.
    #[error("Check-in for attendance {attendance_id} cannot be rejected after check-out")]
    CheckInLocked {
        /// The attendance record identifier.
        attendance_id: i64,
    },
}
