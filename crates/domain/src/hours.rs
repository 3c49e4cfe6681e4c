// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Worked-hours aggregation.
//!
//! Only records whose check-in and check-out are both approved contribute
//! hours. A record with any rejected action is excluded outright, and one
//! still awaiting a decision or a check-out is reported as incomplete.

use serde::{Deserialize, Serialize};

use crate::attendance::AttendanceRecord;

/// Aggregated worked hours over a set of attendance records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoursSummary {
    /// Sum of worked hours over fully approved records.
    pub total_hours: f64,
    /// Number of records that contributed hours.
    pub counted_days: usize,
    /// Number of records excluded because an action was rejected.
    pub rejected_days: usize,
    /// Number of records still pending a decision or a check-out.
    pub incomplete_days: usize,
}

/// Sums worked hours over `records`.
#[must_use]
pub fn summarize_hours<'a, I>(records: I) -> HoursSummary
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut summary: HoursSummary = HoursSummary {
        total_hours: 0.0,
        counted_days: 0,
        rejected_days: 0,
        incomplete_days: 0,
    };

    for record in records {
        if record.has_rejection() {
            summary.rejected_days += 1;
            continue;
        }
        match record.total_hours() {
            Some(hours) => {
                summary.total_hours += hours;
                summary.counted_days += 1;
            }
            None => summary.incomplete_days += 1,
        }
    }

    summary
}
