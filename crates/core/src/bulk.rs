// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Best-effort fan-out for bulk supervisor decisions.
//!
//! Items are processed in order and independently. A failing item is
//! reported and skipped; items already committed stay committed.

use fieldcheck_domain::AttendanceAction;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ErrorKind};

/// One explicitly tagged target of a bulk decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItem {
    /// The attendance record.
    pub attendance_id: i64,
    /// Which action to decide.
    pub action: AttendanceAction,
}

/// Why a single item failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemError {
    /// Stable error code.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl ItemError {
    /// Creates an item error.
    #[must_use]
    pub const fn new(kind: ErrorKind, message: String) -> Self {
        Self { kind, message }
    }
}

impl From<CoreError> for ItemError {
    fn from(err: CoreError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

/// A failed item in a bulk outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItemFailure {
    pub attendance_id: i64,
    pub action: AttendanceAction,
    pub kind: ErrorKind,
    pub message: String,
}

/// Aggregate result of a bulk decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
    /// Items that succeeded, including idempotent no-ops.
    pub success_count: usize,
    /// Items that failed.
    pub failure_count: usize,
    /// One entry per failed item, in input order.
    pub failures: Vec<BulkItemFailure>,
}

impl BulkOutcome {
    fn record_failure(&mut self, item: BulkItem, err: ItemError) {
        self.failure_count += 1;
        self.failures.push(BulkItemFailure {
            attendance_id: item.attendance_id,
            action: item.action,
            kind: err.kind,
            message: err.message,
        });
    }
}

/// Runs `decide_one` for every item and tallies the results.
pub fn fan_out<F>(items: &[BulkItem], mut decide_one: F) -> BulkOutcome
where
    F: FnMut(BulkItem) -> Result<(), ItemError>,
{
    let mut outcome: BulkOutcome = BulkOutcome::default();
    for item in items.iter().copied() {
        match decide_one(item) {
            Ok(()) => outcome.success_count += 1,
            Err(err) => outcome.record_failure(item, err),
        }
    }
    outcome
}
