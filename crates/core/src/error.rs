// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldcheck_domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during attendance transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A domain rule was violated.
    #[error("Domain violation: {0}")]
    DomainViolation(#[from] DomainError),
    /// The record changed between read and write.
    #[error("Attendance {attendance_id} was modified concurrently")]
    Conflict {
        /// The attendance record identifier.
        attendance_id: i64,
    },
}

impl CoreError {
    /// Flattens the error into a stable, copyable code.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DomainViolation(err) => ErrorKind::of_domain(err),
            Self::Conflict { .. } => ErrorKind::Conflict,
        }
    }
}

/// Stable error codes reported per item by bulk decisions and the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidCoordinate,
    InvalidRadius,
    InvalidIdentifier,
    InvalidPhoto,
    InvalidReason,
    InvalidTimezone,
    InvalidQuery,
    ClockSkew,
    OfficeNotFound,
    OfficeInactive,
    DuplicateAction,
    NoActiveCheckIn,
    CheckInNotApproved,
    AlreadyCheckedOut,
    CheckOutBeforeCheckIn,
    AttendanceNotFound,
    ActionNotRecorded,
    ReasonNotRequired,
    ReasonAlreadyProvided,
    ReasonRequired,
    RejectionReasonRequired,
    CheckInLocked,
    Conflict,
    Unauthorized,
    Internal,
}

impl ErrorKind {
    /// The code for a domain error.
    #[must_use]
    pub const fn of_domain(err: &DomainError) -> Self {
        match err {
            DomainError::InvalidCoordinate { .. } => Self::InvalidCoordinate,
            DomainError::InvalidRadius { .. } => Self::InvalidRadius,
            DomainError::InvalidIdentifier { .. } => Self::InvalidIdentifier,
            DomainError::InvalidPhoto { .. } => Self::InvalidPhoto,
            DomainError::InvalidReason { .. } => Self::InvalidReason,
            DomainError::InvalidTimezone(_) => Self::InvalidTimezone,
            DomainError::DateConversion { .. } => Self::Internal,
            DomainError::OfficeNotFound { .. } => Self::OfficeNotFound,
            DomainError::OfficeInactive { .. } => Self::OfficeInactive,
            DomainError::DuplicateAction { .. } => Self::DuplicateAction,
            DomainError::NoActiveCheckIn { .. } => Self::NoActiveCheckIn,
            DomainError::CheckInNotApproved { .. } => Self::CheckInNotApproved,
            DomainError::AlreadyCheckedOut { .. } => Self::AlreadyCheckedOut,
            DomainError::CheckOutBeforeCheckIn { .. } => Self::CheckOutBeforeCheckIn,
            DomainError::AttendanceNotFound(_) => Self::AttendanceNotFound,
            DomainError::ActionNotRecorded { .. } => Self::ActionNotRecorded,
            DomainError::ReasonNotRequired { .. } => Self::ReasonNotRequired,
            DomainError::ReasonAlreadyProvided { .. } => Self::ReasonAlreadyProvided,
            DomainError::ReasonRequired { .. } => Self::ReasonRequired,
            DomainError::RejectionReasonRequired { .. } => Self::RejectionReasonRequired,
            DomainError::CheckInLocked { .. } => Self::CheckInLocked,
        }
    }

    /// Returns the code as it appears on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCoordinate => "InvalidCoordinate",
            Self::InvalidRadius => "InvalidRadius",
            Self::InvalidIdentifier => "InvalidIdentifier",
            Self::InvalidPhoto => "InvalidPhoto",
            Self::InvalidReason => "InvalidReason",
            Self::InvalidTimezone => "InvalidTimezone",
            Self::InvalidQuery => "InvalidQuery",
            Self::ClockSkew => "ClockSkew",
            Self::OfficeNotFound => "OfficeNotFound",
            Self::OfficeInactive => "OfficeInactive",
            Self::DuplicateAction => "DuplicateAction",
            Self::NoActiveCheckIn => "NoActiveCheckIn",
            Self::CheckInNotApproved => "CheckInNotApproved",
            Self::AlreadyCheckedOut => "AlreadyCheckedOut",
            Self::CheckOutBeforeCheckIn => "CheckOutBeforeCheckIn",
            Self::AttendanceNotFound => "AttendanceNotFound",
            Self::ActionNotRecorded => "ActionNotRecorded",
            Self::ReasonNotRequired => "ReasonNotRequired",
            Self::ReasonAlreadyProvided => "ReasonAlreadyProvided",
            Self::ReasonRequired => "ReasonRequired",
            Self::RejectionReasonRequired => "RejectionReasonRequired",
            Self::CheckInLocked => "CheckInLocked",
            Self::Conflict => "Conflict",
            Self::Unauthorized => "Unauthorized",
            Self::Internal => "Internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
