// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldcheck::{Command, EngineConfig, Outcome, TransitionResult, apply};
use fieldcheck_audit::{Actor, Cause};
use fieldcheck_domain::{
    AttendanceAction, AttendanceRecord, Decision, EARTH_RADIUS_M, GeoPoint, Office, OfficeId,
    OfficerId,
};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{PersistedTransition, Persistence};

pub const OFFICE_LAT: f64 = -6.2;
pub const OFFICE_LNG: f64 = 106.816_666;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("officer-7"), String::from("officer"))
}

pub fn create_test_supervisor() -> Actor {
    Actor::new(String::from("sup-1"), String::from("supervisor"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn create_test_office(office_id: &str) -> Office {
    Office::new(
        OfficeId::new(office_id).unwrap(),
        format!("Office {office_id}"),
        (OFFICE_LAT, OFFICE_LNG),
        50.0,
        true,
        vec![String::from("sup-1")],
    )
    .unwrap()
}

pub fn create_test_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence
        .upsert_office(&create_test_office("jakarta-hq"))
        .unwrap();
    persistence
}

pub fn point_north(meters: f64) -> GeoPoint {
    let dlat: f64 = (meters / EARTH_RADIUS_M).to_degrees();
    GeoPoint::new(OFFICE_LAT + dlat, OFFICE_LNG).unwrap()
}

pub fn day(n: u8) -> OffsetDateTime {
    datetime!(2026-03-01 08:00 UTC) + time::Duration::days(i64::from(n) - 1)
}

fn applied(outcome: Outcome) -> TransitionResult {
    match outcome {
        Outcome::Applied(result) => *result,
        Outcome::Unchanged(_) => panic!("expected a change"),
    }
}

pub fn check_in_transition(
    officer: &str,
    office: &Office,
    meters: f64,
    at: OffsetDateTime,
) -> TransitionResult {
    applied(
        apply(
            &EngineConfig::default(),
            None,
            Some(office),
            Command::CheckIn {
                officer_id: OfficerId::new(officer).unwrap(),
                office_id: office.office_id.clone(),
                location: point_north(meters),
                photo: String::from("photo"),
                at,
            },
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap(),
    )
}

pub fn decide_transition(
    record: &AttendanceRecord,
    action: AttendanceAction,
    decision: Decision,
    rejection_reason: Option<&str>,
) -> TransitionResult {
    applied(
        apply(
            &EngineConfig::default(),
            Some(record),
            None,
            Command::Decide {
                attendance_id: record.id(),
                action,
                decision,
                rejection_reason: rejection_reason.map(String::from),
                at: record.checkin.time + time::Duration::minutes(30),
            },
            create_test_supervisor(),
            create_test_cause(),
        )
        .unwrap(),
    )
}

pub fn check_out_transition(record: &AttendanceRecord, meters: f64) -> TransitionResult {
    applied(
        apply(
            &EngineConfig::default(),
            Some(record),
            None,
            Command::CheckOut {
                officer_id: record.officer_id.clone(),
                location: point_north(meters),
                photo: String::from("photo-out"),
                at: record.checkin.time + time::Duration::hours(8),
            },
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap(),
    )
}

/// Checks in and stores the record.
pub fn seed_check_in(
    persistence: &mut Persistence,
    officer: &str,
    meters: f64,
    at: OffsetDateTime,
) -> AttendanceRecord {
    let office: Office = persistence
        .get_office(&OfficeId::new("jakarta-hq").unwrap())
        .unwrap()
        .unwrap();
    let persisted: PersistedTransition = persistence
        .persist_transition(&check_in_transition(officer, &office, meters, at))
        .unwrap();
    persisted.record
}

/// Checks in, approves, checks out and approves, storing every step.
pub fn seed_completed_day(
    persistence: &mut Persistence,
    officer: &str,
    at: OffsetDateTime,
) -> AttendanceRecord {
    let record: AttendanceRecord = seed_check_in(persistence, officer, 10.0, at);
    let record: AttendanceRecord = persistence
        .persist_transition(&decide_transition(
            &record,
            AttendanceAction::CheckIn,
            Decision::Approve,
            None,
        ))
        .unwrap()
        .record;
    let record: AttendanceRecord = persistence
        .persist_transition(&check_out_transition(&record, 10.0))
        .unwrap()
        .record;
    persistence
        .persist_transition(&decide_transition(
            &record,
            AttendanceAction::CheckOut,
            Decision::Approve,
            None,
        ))
        .unwrap()
        .record
}
