// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldcheck_domain::{AttendanceAction, Decision, GeoPoint, OfficeId, OfficerId};
use time::OffsetDateTime;

/// An officer or supervisor intent, expressed as data only.
///
/// Commands are the only way to request attendance state changes. Photo
/// payloads arrive raw and are bounded by the engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Open today's attendance record.
    CheckIn {
        /// The officer checking in.
        officer_id: OfficerId,
        /// The office being checked into.
        office_id: OfficeId,
        /// Device location.
        location: GeoPoint,
        /// Captured photo.
        photo: String,
        /// Submission time.
        at: OffsetDateTime,
    },
    /// Close today's attendance record.
    CheckOut {
        /// The officer checking out.
        officer_id: OfficerId,
        /// Device location.
        location: GeoPoint,
        /// Captured photo.
        photo: String,
        /// Submission time.
        at: OffsetDateTime,
    },
    /// Justify an out-of-range action.
    SubmitReason {
        /// The attendance record.
        attendance_id: i64,
        /// Which action the reason is for.
        action: AttendanceAction,
        /// Free-text justification.
        reason: String,
        /// Optional supporting photo.
        photo: Option<String>,
        /// Submission time.
        at: OffsetDateTime,
    },
    /// Approve or reject one action.
    Decide {
        /// The attendance record.
        attendance_id: i64,
        /// Which action is being decided.
        action: AttendanceAction,
        /// The verdict.
        decision: Decision,
        /// Required when rejecting.
        rejection_reason: Option<String>,
        /// Decision time.
        at: OffsetDateTime,
    },
}

impl Command {
    /// The audit action name for this command.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::CheckIn { .. } => String::from("CheckIn"),
            Self::CheckOut { .. } => String::from("CheckOut"),
            Self::SubmitReason { .. } => String::from("SubmitReason"),
            Self::Decide {
                action, decision, ..
            } => fieldcheck_audit::Action::decision_name(
                matches!(decision, Decision::Approve),
                *action,
            ),
        }
    }
}
