// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldcheck_audit::AuditEvent;
use fieldcheck_domain::{AttendanceAction, AttendanceRecord};

use crate::notify::EventKind;

/// The result of a transition that changed the record.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The record after the transition, with its version bumped.
    pub new_record: AttendanceRecord,
    /// The version the store must still hold for the write to commit.
    /// `None` for a freshly created record.
    pub expected_version: Option<i64>,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
    /// The action the transition touched.
    pub action: AttendanceAction,
    /// The notification kind to publish once committed.
    pub kind: EventKind,
    /// True when the touched action is out of range and still lacks a reason.
    pub needs_reason: bool,
}

/// What applying a command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The record changed and must be committed.
    Applied(Box<TransitionResult>),
    /// The command repeated a terminal decision; nothing to write or publish.
    Unchanged(AttendanceRecord),
}

impl Outcome {
    /// The record as it stands after the command.
    #[must_use]
    pub fn record(&self) -> &AttendanceRecord {
        match self {
            Self::Applied(result) => &result.new_record,
            Self::Unchanged(record) => record,
        }
    }
}
