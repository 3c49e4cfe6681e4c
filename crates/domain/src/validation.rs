// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::attendance::{ActionRecord, ApprovalStatus, AttendanceAction, AttendanceRecord, Decision};
use crate::error::DomainError;

/// Maximum length of a free-text reason, in characters.
pub const MAX_REASON_CHARS: usize = 1000;

/// Validates and normalizes an officer's free-text reason.
///
/// # Errors
///
/// Returns `DomainError::InvalidReason` if the text is blank or too long.
pub fn validate_reason_text(reason: &str) -> Result<String, DomainError> {
    let trimmed: &str = reason.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidReason {
            reason: String::from("reason must not be empty"),
        });
    }
    if trimmed.chars().count() > MAX_REASON_CHARS {
        return Err(DomainError::InvalidReason {
            reason: format!("reason must be at most {MAX_REASON_CHARS} characters"),
        });
    }
    Ok(trimmed.to_string())
}

/// Validates that an officer may attach a reason to `action`.
///
/// A reason is accepted only for an out-of-range action that has none yet.
///
/// # Errors
///
/// Returns an error if the action is within range or already has a reason.
pub fn validate_reason_allowed(
    record: &AttendanceRecord,
    action: AttendanceAction,
) -> Result<(), DomainError> {
    let target: &ActionRecord = record.require_action(action)?;
    if target.within_radius {
        return Err(DomainError::ReasonNotRequired {
            attendance_id: record.id(),
            action,
        });
    }
    if target.reason.is_some() {
        return Err(DomainError::ReasonAlreadyProvided {
            attendance_id: record.id(),
            action,
        });
    }
    Ok(())
}

/// Validates a supervisor decision against the record.
///
/// Returns the normalized rejection reason for a rejection.
///
/// # Errors
///
/// Returns an error if:
/// - The action has not been recorded
/// - A rejection has no rejection reason
/// - An approval targets an out-of-range action with no reason
/// - A rejection targets a check-in that already has a check-out
pub fn validate_decision(
    record: &AttendanceRecord,
    action: AttendanceAction,
    decision: Decision,
    rejection_reason: Option<&str>,
) -> Result<Option<String>, DomainError> {
    let target: &ActionRecord = record.require_action(action)?;

    match decision {
        Decision::Approve => {
            if target.needs_reason() {
                return Err(DomainError::ReasonRequired {
                    attendance_id: record.id(),
                    action,
                });
            }
            Ok(None)
        }
        Decision::Reject => {
            let reason: &str = rejection_reason.map(str::trim).unwrap_or_default();
            if reason.is_empty() {
                return Err(DomainError::RejectionReasonRequired {
                    attendance_id: record.id(),
                    action,
                });
            }
            if action == AttendanceAction::CheckIn
                && record.checkout.is_some()
                && target.status != ApprovalStatus::Rejected
            {
                return Err(DomainError::CheckInLocked {
                    attendance_id: record.id(),
                });
            }
            Ok(Some(reason.to_string()))
        }
    }
}

/// Validates that the record accepts a check-out at `at`.
///
/// # Errors
///
/// Returns an error if the check-in is not approved, a check-out exists,
/// or `at` precedes the check-in.
pub fn validate_check_out_allowed(
    record: &AttendanceRecord,
    at: time::OffsetDateTime,
) -> Result<(), DomainError> {
    if record.checkout.is_some() {
        return Err(DomainError::AlreadyCheckedOut {
            attendance_id: record.id(),
        });
    }
    if record.checkin.status != ApprovalStatus::Approved {
        return Err(DomainError::CheckInNotApproved {
            attendance_id: record.id(),
        });
    }
    if at < record.checkin.time {
        return Err(DomainError::CheckOutBeforeCheckIn {
            check_in: record.checkin.time,
            check_out: at,
        });
    }
    Ok(())
}
