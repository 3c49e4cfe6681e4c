// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldcheck_audit::{Actor, Cause};
use fieldcheck_domain::{
    AttendanceAction, AttendanceRecord, Decision, EARTH_RADIUS_M, GeoPoint, Office, OfficeId,
    OfficerId,
};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{Command, CoreError, EngineConfig, Outcome, TransitionResult, apply};

pub const OFFICE_LAT: f64 = -6.2;
pub const OFFICE_LNG: f64 = 106.816_666;

pub fn create_test_officer_actor() -> Actor {
    Actor::new(String::from("officer-7"), String::from("officer"))
}

pub fn create_test_supervisor_actor() -> Actor {
    Actor::new(String::from("sup-1"), String::from("supervisor"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Mobile request"))
}

pub fn create_test_config() -> EngineConfig {
    EngineConfig::default()
}

pub fn create_test_office() -> Office {
    Office::new(
        OfficeId::new("jakarta-hq").unwrap(),
        String::from("Jakarta HQ"),
        (OFFICE_LAT, OFFICE_LNG),
        50.0,
        true,
        vec![String::from("sup-1")],
    )
    .unwrap()
}

pub fn officer() -> OfficerId {
    OfficerId::new("officer-7").unwrap()
}

/// A point `meters` due north of the office.
pub fn point_north(meters: f64) -> GeoPoint {
    let dlat: f64 = (meters / EARTH_RADIUS_M).to_degrees();
    GeoPoint::new(OFFICE_LAT + dlat, OFFICE_LNG).unwrap()
}

pub fn morning() -> OffsetDateTime {
    datetime!(2026-03-10 08:00 UTC)
}

pub fn evening() -> OffsetDateTime {
    datetime!(2026-03-10 17:00 UTC)
}

pub fn check_in_command(meters: f64) -> Command {
    Command::CheckIn {
        officer_id: officer(),
        office_id: OfficeId::new("jakarta-hq").unwrap(),
        location: point_north(meters),
        photo: String::from("photo-in"),
        at: morning(),
    }
}

pub fn check_out_command(meters: f64, at: OffsetDateTime) -> Command {
    Command::CheckOut {
        officer_id: officer(),
        location: point_north(meters),
        photo: String::from("photo-out"),
        at,
    }
}

pub fn decide_command(
    attendance_id: i64,
    action: AttendanceAction,
    decision: Decision,
    rejection_reason: Option<&str>,
) -> Command {
    Command::Decide {
        attendance_id,
        action,
        decision,
        rejection_reason: rejection_reason.map(String::from),
        at: datetime!(2026-03-10 09:00 UTC),
    }
}

pub fn reason_command(attendance_id: i64, action: AttendanceAction, reason: &str) -> Command {
    Command::SubmitReason {
        attendance_id,
        action,
        reason: reason.to_string(),
        photo: None,
        at: datetime!(2026-03-10 08:05 UTC),
    }
}

pub fn expect_applied(outcome: Outcome) -> TransitionResult {
    match outcome {
        Outcome::Applied(result) => *result,
        Outcome::Unchanged(_) => panic!("expected the command to change the record"),
    }
}

/// Runs a command the way the store would: assigns an id on first write.
pub fn run(
    current: Option<&AttendanceRecord>,
    command: Command,
    actor: Actor,
) -> Result<Outcome, CoreError> {
    let office: Office = create_test_office();
    let outcome: Outcome = apply(
        &create_test_config(),
        current,
        Some(&office),
        command,
        actor,
        create_test_cause(),
    )?;
    Ok(match outcome {
        Outcome::Applied(mut result) => {
            if result.new_record.attendance_id.is_none() {
                result.new_record.attendance_id = Some(1);
            }
            Outcome::Applied(result)
        }
        unchanged @ Outcome::Unchanged(_) => unchanged,
    })
}

/// A persisted record with a pending check-in `meters` from the office.
pub fn checked_in(meters: f64) -> AttendanceRecord {
    let result = expect_applied(
        run(None, check_in_command(meters), create_test_officer_actor()).unwrap(),
    );
    result.new_record
}

/// A persisted record with an approved check-in.
pub fn approved_check_in(meters: f64) -> AttendanceRecord {
    let mut record: AttendanceRecord = checked_in(meters);
    if meters > 50.0 {
        record = expect_applied(
            run(
                Some(&record),
                reason_command(1, AttendanceAction::CheckIn, "client visit"),
                create_test_officer_actor(),
            )
            .unwrap(),
        )
        .new_record;
    }
    expect_applied(
        run(
            Some(&record),
            decide_command(1, AttendanceAction::CheckIn, Decision::Approve, None),
            create_test_supervisor_actor(),
        )
        .unwrap(),
    )
    .new_record
}

/// A persisted record with an approved check-in and a pending check-out.
pub fn checked_out(checkin_m: f64, checkout_m: f64) -> AttendanceRecord {
    let record: AttendanceRecord = approved_check_in(checkin_m);
    expect_applied(
        run(
            Some(&record),
            check_out_command(checkout_m, evening()),
            create_test_officer_actor(),
        )
        .unwrap(),
    )
    .new_record
}
