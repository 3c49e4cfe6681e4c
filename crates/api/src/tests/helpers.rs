// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use fieldcheck::{CollectingSink, EngineConfig};
use fieldcheck_audit::Cause;
use fieldcheck_domain::{AttendanceAction, Decision, EARTH_RADIUS_M, Office, OfficeId};
use fieldcheck_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    AttendanceResponse, AuthenticatedActor, CheckInRequest, CheckOutRequest, DecisionRequest,
    EngineContext, Role, SubmitReasonRequest, check_in, check_out, decide, submit_reason,
};

pub const OFFICE_LAT: f64 = -6.2;
pub const OFFICE_LNG: f64 = 106.816_666;

pub fn create_test_officer(id: &str) -> AuthenticatedActor {
    AuthenticatedActor::new(id.to_string(), Role::Officer)
}

pub fn create_test_supervisor(id: &str) -> AuthenticatedActor {
    AuthenticatedActor::new(id.to_string(), Role::Supervisor)
}

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-1"), Role::Admin)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

fn office(id: &str, supervisor: &str, is_active: bool) -> Office {
    Office::new(
        OfficeId::new(id).unwrap(),
        format!("Office {id}"),
        (OFFICE_LAT, OFFICE_LNG),
        50.0,
        is_active,
        vec![supervisor.to_string()],
    )
    .unwrap()
}

/// Persistence seeded with `jakarta-hq` (sup-1), `bandung` (sup-2) and an
/// inactive `closed` office.
pub fn setup_test_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence
        .upsert_office(&office("jakarta-hq", "sup-1", true))
        .unwrap();
    persistence
        .upsert_office(&office("bandung", "sup-2", true))
        .unwrap();
    persistence
        .upsert_office(&office("closed", "sup-1", false))
        .unwrap();
    persistence
}

/// Engine settings and a sink that remembers what was published.
pub struct TestEngine {
    pub config: EngineConfig,
    pub sink: CollectingSink,
}

impl TestEngine {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            sink: CollectingSink::new(),
        }
    }

    pub fn with_timezone(timezone: &str) -> Self {
        Self {
            config: EngineConfig::new(timezone, 1024, 3).unwrap(),
            sink: CollectingSink::new(),
        }
    }

    pub fn ctx(&self) -> EngineContext<'_> {
        EngineContext::new(&self.config, &self.sink)
    }
}

pub fn morning() -> OffsetDateTime {
    datetime!(2026-03-10 08:00 UTC)
}

pub fn evening() -> OffsetDateTime {
    datetime!(2026-03-10 16:30 UTC)
}

/// Latitude `meters` north of the office centre.
pub fn lat_north(meters: f64) -> f64 {
    OFFICE_LAT + (meters / EARTH_RADIUS_M).to_degrees()
}

pub fn check_in_request(officer: &str, office_id: &str, meters: f64) -> CheckInRequest {
    CheckInRequest {
        officer_id: officer.to_string(),
        office_id: office_id.to_string(),
        latitude: lat_north(meters),
        longitude: OFFICE_LNG,
        photo: String::from("checkin-photo"),
        timestamp: None,
    }
}

pub fn check_out_request(officer: &str, meters: f64) -> CheckOutRequest {
    CheckOutRequest {
        officer_id: officer.to_string(),
        latitude: lat_north(meters),
        longitude: OFFICE_LNG,
        photo: String::from("checkout-photo"),
        timestamp: None,
    }
}

pub fn approve(action: AttendanceAction) -> DecisionRequest {
    DecisionRequest {
        action,
        decision: Decision::Approve,
        rejection_reason: None,
    }
}

pub fn reject(action: AttendanceAction, reason: &str) -> DecisionRequest {
    DecisionRequest {
        action,
        decision: Decision::Reject,
        rejection_reason: Some(reason.to_string()),
    }
}

pub fn reason(action: AttendanceAction, text: &str) -> SubmitReasonRequest {
    SubmitReasonRequest {
        action,
        reason: text.to_string(),
        photo: None,
    }
}

/// Checks `officer` in at `jakarta-hq` and returns the new attendance id.
pub fn seed_check_in(
    persistence: &mut Persistence,
    engine: &TestEngine,
    officer: &str,
    meters: f64,
) -> i64 {
    check_in(
        persistence,
        engine.ctx(),
        &check_in_request(officer, "jakarta-hq", meters),
        &create_test_officer(officer),
        &create_test_cause(),
        morning(),
    )
    .unwrap()
    .attendance
    .attendance_id
}

/// Checks in within range and has `sup-1` approve it.
pub fn seed_approved_check_in(
    persistence: &mut Persistence,
    engine: &TestEngine,
    officer: &str,
) -> i64 {
    let attendance_id: i64 = seed_check_in(persistence, engine, officer, 10.0);
    supervisor_decides(
        persistence,
        engine,
        attendance_id,
        &approve(AttendanceAction::CheckIn),
    );
    attendance_id
}

pub fn supervisor_decides(
    persistence: &mut Persistence,
    engine: &TestEngine,
    attendance_id: i64,
    request: &DecisionRequest,
) -> AttendanceResponse {
    decide(
        persistence,
        engine.ctx(),
        attendance_id,
        request,
        &create_test_supervisor("sup-1"),
        &create_test_cause(),
        morning() + time::Duration::hours(1),
    )
    .unwrap()
}

pub fn officer_checks_out(
    persistence: &mut Persistence,
    engine: &TestEngine,
    officer: &str,
    meters: f64,
) -> AttendanceResponse {
    check_out(
        persistence,
        engine.ctx(),
        &check_out_request(officer, meters),
        &create_test_officer(officer),
        &create_test_cause(),
        evening(),
    )
    .unwrap()
}

pub fn officer_submits_reason(
    persistence: &mut Persistence,
    engine: &TestEngine,
    officer: &str,
    attendance_id: i64,
    request: &SubmitReasonRequest,
) -> AttendanceResponse {
    submit_reason(
        persistence,
        engine.ctx(),
        attendance_id,
        request,
        &create_test_officer(officer),
        &create_test_cause(),
        morning() + time::Duration::minutes(20),
    )
    .unwrap()
}
