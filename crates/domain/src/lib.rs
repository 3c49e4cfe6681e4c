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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod attendance;
mod error;
mod geo;
mod hours;
mod types;
mod validation;
mod work_day;

#[cfg(test)]
mod tests;

pub use attendance::{
    ActionRecord, ApprovalStatus, AttendanceAction, AttendanceRecord, Decision, Validity,
};
pub use error::DomainError;
pub use geo::{
    EARTH_RADIUS_M, GeoPoint, Geofence, GeofenceReading, display_distance, distance,
    is_within_radius,
};
pub use hours::{HoursSummary, summarize_hours};
pub use types::{OfficeId, OfficerId, Office, PhotoRef};
pub use validation::{
    MAX_REASON_CHARS, validate_check_out_allowed, validate_decision, validate_reason_allowed,
    validate_reason_text,
};
pub use work_day::WorkDayClock;
