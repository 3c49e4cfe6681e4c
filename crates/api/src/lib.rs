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
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! API boundary for the `FieldCheck` attendance engine.
//!
//! Translates requests from already-authenticated actors into engine
//! commands, enforces who may do what, commits through the persistence
//! layer and maps every lower-layer failure onto the API error taxonomy.

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    EngineContext, MAX_DEVICE_CLOCK_SKEW, audit_timeline, check_in, check_out, decide, decide_bulk, get_attendance,
    get_pending_approvals, hours_summary, list_offices, submit_reason,
};
pub use request_response::{
    ActionView, AttendanceResponse, AttendanceView, AuditEventView, AuditTimelineResponse,
    BulkDecisionRequest, CheckInRequest, CheckOutRequest, DecisionRequest, HoursQuery,
    HoursSummaryResponse, ListOfficesResponse, OfficeView, PendingApprovalsQuery,
    PendingApprovalsResponse, SubmitReasonRequest,
};
