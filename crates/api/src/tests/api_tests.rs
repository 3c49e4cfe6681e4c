// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! End-to-end attendance flows through the API boundary.

use fieldcheck::{AttendanceEvent, ErrorKind, EventKind};
use fieldcheck_domain::{ApprovalStatus, AttendanceAction, Validity};
use fieldcheck_persistence::Persistence;
use time::macros::datetime;

use crate::{
    ApiError, AttendanceResponse, CheckInRequest, CheckOutRequest, MAX_DEVICE_CLOCK_SKEW,
    check_in, check_out, decide, submit_reason,
};

use super::helpers::{
    TestEngine, approve, check_in_request, check_out_request, create_test_cause,
    create_test_officer, create_test_supervisor, morning, officer_checks_out,
    officer_submits_reason, reason, reject, seed_approved_check_in, seed_check_in,
    setup_test_persistence, supervisor_decides,
};

fn kinds(events: &[AttendanceEvent]) -> Vec<EventKind> {
    events.iter().map(|e| e.kind).collect()
}

#[test]
fn test_in_range_check_in_is_approvable() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();

    let response: AttendanceResponse = check_in(
        &mut persistence,
        engine.ctx(),
        &check_in_request("officer-7", "jakarta-hq", 32.0),
        &create_test_officer("officer-7"),
        &create_test_cause(),
        morning(),
    )
    .unwrap();

    assert!(!response.needs_reason);
    assert!(response.changed);
    assert!(response.event_id.is_some());
    assert_eq!(response.attendance.overall_validity, Validity::Valid);
    assert_eq!(response.attendance.checkin.status, ApprovalStatus::Pending);
    assert!((response.attendance.checkin.distance_m - 32.0).abs() < 0.2);
    assert_eq!(response.attendance.work_date, "2026-03-10");

    let approved: AttendanceResponse = supervisor_decides(
        &mut persistence,
        &engine,
        response.attendance.attendance_id,
        &approve(AttendanceAction::CheckIn),
    );
    assert_eq!(approved.attendance.checkin.status, ApprovalStatus::Approved);
    assert_eq!(approved.attendance.checkin.decided_by.as_deref(), Some("sup-1"));
    assert_eq!(
        kinds(&engine.sink.events()),
        vec![EventKind::CheckedIn, EventKind::Decided]
    );
}

#[test]
fn test_out_of_range_check_in_needs_reason_before_approval() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();
    let attendance_id: i64 = seed_check_in(&mut persistence, &engine, "officer-7", 125.0);

    let result = decide(
        &mut persistence,
        engine.ctx(),
        attendance_id,
        &approve(AttendanceAction::CheckIn),
        &create_test_supervisor("sup-1"),
        &create_test_cause(),
        morning(),
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation {
            rule: ErrorKind::ReasonRequired,
            ..
        })
    ));

    let reasoned: AttendanceResponse = officer_submits_reason(
        &mut persistence,
        &engine,
        "officer-7",
        attendance_id,
        &reason(AttendanceAction::CheckIn, "stuck in traffic"),
    );
    assert!(!reasoned.needs_reason);
    assert_eq!(
        reasoned.attendance.checkin.reason.as_deref(),
        Some("stuck in traffic")
    );
    assert_eq!(reasoned.attendance.checkin.status, ApprovalStatus::Pending);

    let approved: AttendanceResponse = supervisor_decides(
        &mut persistence,
        &engine,
        attendance_id,
        &approve(AttendanceAction::CheckIn),
    );
    assert_eq!(approved.attendance.checkin.status, ApprovalStatus::Approved);
    assert_eq!(approved.attendance.overall_validity, Validity::Invalid);
    assert_eq!(
        kinds(&engine.sink.events()),
        vec![
            EventKind::CheckedIn,
            EventKind::ReasonSubmitted,
            EventKind::Decided
        ]
    );
}

#[test]
fn test_out_of_range_check_in_reports_needs_reason() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();

    let response: AttendanceResponse = check_in(
        &mut persistence,
        engine.ctx(),
        &check_in_request("officer-7", "jakarta-hq", 125.0),
        &create_test_officer("officer-7"),
        &create_test_cause(),
        morning(),
    )
    .unwrap();

    assert!(response.needs_reason);
    assert!(response.attendance.checkin.needs_reason);
    assert_eq!(response.attendance.overall_validity, Validity::Invalid);
}

#[test]
fn test_duplicate_same_day_check_in_is_rejected() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();
    seed_check_in(&mut persistence, &engine, "officer-7", 10.0);

    let result = check_in(
        &mut persistence,
        engine.ctx(),
        &check_in_request("officer-7", "jakarta-hq", 10.0),
        &create_test_officer("officer-7"),
        &create_test_cause(),
        datetime!(2026-03-10 11:00 UTC),
    );

    assert!(matches!(
        result,
        Err(ApiError::Conflict {
            kind: ErrorKind::DuplicateAction,
            ..
        })
    ));
    assert_eq!(engine.sink.events().len(), 1);
}

#[test]
fn test_check_out_before_approval_is_rejected() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();
    seed_check_in(&mut persistence, &engine, "officer-7", 10.0);

    let result = check_out(
        &mut persistence,
        engine.ctx(),
        &check_out_request("officer-7", 10.0),
        &create_test_officer("officer-7"),
        &create_test_cause(),
        morning(),
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation {
            rule: ErrorKind::CheckInNotApproved,
            ..
        })
    ));
}

#[test]
fn test_check_out_without_check_in_is_rejected() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();

    let result = check_out(
        &mut persistence,
        engine.ctx(),
        &check_out_request("officer-7", 10.0),
        &create_test_officer("officer-7"),
        &create_test_cause(),
        morning(),
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation {
            rule: ErrorKind::NoActiveCheckIn,
            ..
        })
    ));
}

#[test]
fn test_full_day_yields_total_hours() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();
    let attendance_id: i64 = seed_approved_check_in(&mut persistence, &engine, "officer-7");

    let checked_out: AttendanceResponse =
        officer_checks_out(&mut persistence, &engine, "officer-7", 20.0);
    assert_eq!(checked_out.attendance.total_hours, None);
    assert!(!checked_out.needs_reason);

    let done: AttendanceResponse = supervisor_decides(
        &mut persistence,
        &engine,
        attendance_id,
        &approve(AttendanceAction::CheckOut),
    );
    assert_eq!(done.attendance.total_hours, Some(8.5));

    let last: AttendanceEvent = engine.sink.events().pop().unwrap();
    assert_eq!(last.kind, EventKind::Decided);
    assert_eq!(last.action, AttendanceAction::CheckOut);
    assert_eq!(last.total_hours, Some(8.5));
}

#[test]
fn test_out_of_range_check_out_needs_its_own_reason() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();
    let attendance_id: i64 = seed_approved_check_in(&mut persistence, &engine, "officer-7");

    let checked_out: AttendanceResponse =
        officer_checks_out(&mut persistence, &engine, "officer-7", 300.0);
    assert!(checked_out.needs_reason);
    assert_eq!(checked_out.attendance.overall_validity, Validity::Invalid);

    let reasoned: AttendanceResponse = officer_submits_reason(
        &mut persistence,
        &engine,
        "officer-7",
        attendance_id,
        &reason(AttendanceAction::CheckOut, "field visit ran late"),
    );
    let checkout = reasoned.attendance.checkout.unwrap();
    assert_eq!(checkout.reason.as_deref(), Some("field visit ran late"));
    assert!(!checkout.needs_reason);
}

#[test]
fn test_repeated_approval_is_a_silent_no_op() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();
    let attendance_id: i64 = seed_approved_check_in(&mut persistence, &engine, "officer-7");
    let events_before: usize = engine.sink.events().len();
    let timeline_before: usize = persistence.audit_timeline(attendance_id).unwrap().len();
    let version_before: i64 = persistence
        .get_attendance(attendance_id)
        .unwrap()
        .unwrap()
        .version;

    let again: AttendanceResponse = supervisor_decides(
        &mut persistence,
        &engine,
        attendance_id,
        &approve(AttendanceAction::CheckIn),
    );

    assert!(!again.changed);
    assert_eq!(again.event_id, None);
    assert_eq!(again.attendance.version, version_before);
    assert_eq!(again.attendance.checkin.status, ApprovalStatus::Approved);
    assert_eq!(engine.sink.events().len(), events_before);
    assert_eq!(
        persistence.audit_timeline(attendance_id).unwrap().len(),
        timeline_before
    );
}

#[test]
fn test_rejection_then_approval_clears_rejection_reason() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();
    let attendance_id: i64 = seed_check_in(&mut persistence, &engine, "officer-7", 10.0);

    let rejected: AttendanceResponse = supervisor_decides(
        &mut persistence,
        &engine,
        attendance_id,
        &reject(AttendanceAction::CheckIn, "photo is blurred"),
    );
    assert_eq!(rejected.attendance.checkin.status, ApprovalStatus::Rejected);
    assert_eq!(
        rejected.attendance.checkin.rejection_reason.as_deref(),
        Some("photo is blurred")
    );

    let approved: AttendanceResponse = supervisor_decides(
        &mut persistence,
        &engine,
        attendance_id,
        &approve(AttendanceAction::CheckIn),
    );
    assert_eq!(approved.attendance.checkin.status, ApprovalStatus::Approved);
    assert_eq!(approved.attendance.checkin.rejection_reason, None);
}

#[test]
fn test_rejection_requires_reason() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();
    let attendance_id: i64 = seed_check_in(&mut persistence, &engine, "officer-7", 10.0);

    let result = decide(
        &mut persistence,
        engine.ctx(),
        attendance_id,
        &reject(AttendanceAction::CheckIn, "   "),
        &create_test_supervisor("sup-1"),
        &create_test_cause(),
        morning(),
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation {
            rule: ErrorKind::RejectionReasonRequired,
            ..
        })
    ));
}

#[test]
fn test_check_in_cannot_be_rejected_after_check_out() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();
    let attendance_id: i64 = seed_approved_check_in(&mut persistence, &engine, "officer-7");
    officer_checks_out(&mut persistence, &engine, "officer-7", 10.0);

    let result = decide(
        &mut persistence,
        engine.ctx(),
        attendance_id,
        &reject(AttendanceAction::CheckIn, "changed my mind"),
        &create_test_supervisor("sup-1"),
        &create_test_cause(),
        morning(),
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation {
            rule: ErrorKind::CheckInLocked,
            ..
        })
    ));
}

#[test]
fn test_reason_is_write_once() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();
    let attendance_id: i64 = seed_check_in(&mut persistence, &engine, "officer-7", 125.0);
    officer_submits_reason(
        &mut persistence,
        &engine,
        "officer-7",
        attendance_id,
        &reason(AttendanceAction::CheckIn, "stuck in traffic"),
    );

    let result = submit_reason(
        &mut persistence,
        engine.ctx(),
        attendance_id,
        &reason(AttendanceAction::CheckIn, "actually a flat tyre"),
        &create_test_officer("officer-7"),
        &create_test_cause(),
        morning(),
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation {
            rule: ErrorKind::ReasonAlreadyProvided,
            ..
        })
    ));
}

#[test]
fn test_reason_for_in_range_action_is_rejected() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();
    let attendance_id: i64 = seed_check_in(&mut persistence, &engine, "officer-7", 10.0);

    let result = submit_reason(
        &mut persistence,
        engine.ctx(),
        attendance_id,
        &reason(AttendanceAction::CheckIn, "just in case"),
        &create_test_officer("officer-7"),
        &create_test_cause(),
        morning(),
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation {
            rule: ErrorKind::ReasonNotRequired,
            ..
        })
    ));
}

#[test]
fn test_reason_for_unknown_attendance_is_not_found() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();

    let result = submit_reason(
        &mut persistence,
        engine.ctx(),
        999,
        &reason(AttendanceAction::CheckIn, "stuck in traffic"),
        &create_test_officer("officer-7"),
        &create_test_cause(),
        morning(),
    );
    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound {
            kind: ErrorKind::AttendanceNotFound,
            ..
        })
    ));
}

#[test]
fn test_check_in_at_unknown_or_inactive_office() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();
    let officer = create_test_officer("officer-7");

    let unknown = check_in(
        &mut persistence,
        engine.ctx(),
        &check_in_request("officer-7", "nowhere", 10.0),
        &officer,
        &create_test_cause(),
        morning(),
    );
    assert!(matches!(
        unknown,
        Err(ApiError::ResourceNotFound {
            kind: ErrorKind::OfficeNotFound,
            ..
        })
    ));

    let inactive = check_in(
        &mut persistence,
        engine.ctx(),
        &check_in_request("officer-7", "closed", 10.0),
        &officer,
        &create_test_cause(),
        morning(),
    );
    assert!(matches!(
        inactive,
        Err(ApiError::DomainRuleViolation {
            rule: ErrorKind::OfficeInactive,
            ..
        })
    ));
    assert!(engine.sink.events().is_empty());
}

#[test]
fn test_invalid_coordinate_is_bad_input() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();
    let mut request: CheckInRequest = check_in_request("officer-7", "jakarta-hq", 10.0);
    request.latitude = 91.0;

    let result = check_in(
        &mut persistence,
        engine.ctx(),
        &request,
        &create_test_officer("officer-7"),
        &create_test_cause(),
        morning(),
    );
    match result {
        Err(ApiError::InvalidInput { kind, field, .. }) => {
            assert_eq!(kind, ErrorKind::InvalidCoordinate);
            assert_eq!(field, "location");
        }
        other => panic!("expected invalid input, got {other:?}"),
    }
}

#[test]
fn test_oversized_photo_is_bad_input() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::with_timezone("UTC");
    let mut request: CheckInRequest = check_in_request("officer-7", "jakarta-hq", 10.0);
    request.photo = "x".repeat(2048);

    let result = check_in(
        &mut persistence,
        engine.ctx(),
        &request,
        &create_test_officer("officer-7"),
        &create_test_cause(),
        morning(),
    );
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput {
            kind: ErrorKind::InvalidPhoto,
            ..
        })
    ));
}

#[test]
fn test_day_boundary_follows_configured_timezone() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::with_timezone("Asia/Jakarta");
    let officer = create_test_officer("officer-7");

    // 08:00 UTC is 15:00 on the 10th in Jakarta; 20:00 UTC is 03:00 on the 11th.
    let afternoon: AttendanceResponse = check_in(
        &mut persistence,
        engine.ctx(),
        &check_in_request("officer-7", "jakarta-hq", 10.0),
        &officer,
        &create_test_cause(),
        morning(),
    )
    .unwrap();
    let next_day: AttendanceResponse = check_in(
        &mut persistence,
        engine.ctx(),
        &check_in_request("officer-7", "jakarta-hq", 10.0),
        &officer,
        &create_test_cause(),
        datetime!(2026-03-10 20:00 UTC),
    )
    .unwrap();

    assert_eq!(afternoon.attendance.work_date, "2026-03-10");
    assert_eq!(next_day.attendance.work_date, "2026-03-11");
    assert_ne!(
        afternoon.attendance.attendance_id,
        next_day.attendance.attendance_id
    );
}

#[test]
fn test_missing_timestamp_uses_server_clock() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();
    let mut request: CheckInRequest = check_in_request("officer-7", "jakarta-hq", 10.0);
    request.timestamp = None;

    let response: AttendanceResponse = check_in(
        &mut persistence,
        engine.ctx(),
        &request,
        &create_test_officer("officer-7"),
        &create_test_cause(),
        datetime!(2026-04-01 09:15 UTC),
    )
    .unwrap();

    assert_eq!(response.attendance.work_date, "2026-04-01");
    assert_eq!(
        response.attendance.checkin.time,
        datetime!(2026-04-01 09:15 UTC)
    );
}

#[test]
fn test_device_time_cannot_pick_the_work_day() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();
    let mut future: CheckInRequest = check_in_request("officer-7", "jakarta-hq", 10.0);
    future.timestamp = Some(datetime!(2026-03-13 08:00 UTC));

    let result = check_in(
        &mut persistence,
        engine.ctx(),
        &future,
        &create_test_officer("officer-7"),
        &create_test_cause(),
        morning(),
    );
    match result {
        Err(ApiError::InvalidInput { kind, field, .. }) => {
            assert_eq!(kind, ErrorKind::ClockSkew);
            assert_eq!(field, "timestamp");
        }
        other => panic!("expected clock skew, got {other:?}"),
    }
    assert!(engine.sink.events().is_empty());

    // Nothing was opened, so today's check-in goes through exactly once.
    let today: AttendanceResponse = check_in(
        &mut persistence,
        engine.ctx(),
        &check_in_request("officer-7", "jakarta-hq", 10.0),
        &create_test_officer("officer-7"),
        &create_test_cause(),
        morning(),
    )
    .unwrap();
    assert_eq!(today.attendance.work_date, "2026-03-10");
}

#[test]
fn test_small_device_drift_is_recorded_at_server_time() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();
    let mut request: CheckInRequest = check_in_request("officer-7", "jakarta-hq", 10.0);
    request.timestamp = Some(morning() + MAX_DEVICE_CLOCK_SKEW);

    let response: AttendanceResponse = check_in(
        &mut persistence,
        engine.ctx(),
        &request,
        &create_test_officer("officer-7"),
        &create_test_cause(),
        morning(),
    )
    .unwrap();

    assert_eq!(response.attendance.checkin.time, morning());
}

#[test]
fn test_device_time_cannot_inflate_hours() {
    let mut persistence: Persistence = setup_test_persistence();
    let engine: TestEngine = TestEngine::new();
    let attendance_id: i64 = seed_approved_check_in(&mut persistence, &engine, "officer-7");
    let published: usize = engine.sink.events().len();
    let server_time = datetime!(2026-03-10 10:00 UTC);

    let mut late: CheckOutRequest = check_out_request("officer-7", 10.0);
    late.timestamp = Some(datetime!(2026-03-10 23:59 UTC));
    let result = check_out(
        &mut persistence,
        engine.ctx(),
        &late,
        &create_test_officer("officer-7"),
        &create_test_cause(),
        server_time,
    );
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput {
            kind: ErrorKind::ClockSkew,
            ..
        })
    ));
    assert_eq!(engine.sink.events().len(), published);

    let mut honest: CheckOutRequest = check_out_request("officer-7", 10.0);
    honest.timestamp = Some(server_time + time::Duration::seconds(30));
    check_out(
        &mut persistence,
        engine.ctx(),
        &honest,
        &create_test_officer("officer-7"),
        &create_test_cause(),
        server_time,
    )
    .unwrap();
    let approved: AttendanceResponse = supervisor_decides(
        &mut persistence,
        &engine,
        attendance_id,
        &approve(AttendanceAction::CheckOut),
    );

    assert_eq!(approved.attendance.total_hours, Some(2.0));
}
