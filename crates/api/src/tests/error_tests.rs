// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldcheck::{CoreError, ErrorKind};
use fieldcheck_domain::{AttendanceAction, DomainError};
use fieldcheck_persistence::PersistenceError;

use crate::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};

#[test]
fn test_domain_errors_keep_their_kind() {
    let err: ApiError = translate_domain_error(DomainError::ReasonRequired {
        attendance_id: 4,
        action: AttendanceAction::CheckOut,
    });
    assert_eq!(err.kind(), ErrorKind::ReasonRequired);
    assert!(matches!(err, ApiError::DomainRuleViolation { .. }));
    assert!(err.to_string().contains("ReasonRequired"));
}

#[test]
fn test_identifier_errors_name_the_field() {
    let err: ApiError = translate_domain_error(DomainError::InvalidIdentifier {
        field: "officer_id",
        reason: String::from("must not be empty"),
    });
    match err {
        ApiError::InvalidInput { kind, field, .. } => {
            assert_eq!(kind, ErrorKind::InvalidIdentifier);
            assert_eq!(field, "officer_id");
        }
        other => panic!("expected invalid input, got {other:?}"),
    }
}

#[test]
fn test_duplicate_action_is_a_conflict() {
    let err: ApiError = translate_domain_error(DomainError::DuplicateAction {
        officer_id: String::from("officer-7"),
        work_date: time::macros::date!(2026-03-10),
    });
    assert!(matches!(
        err,
        ApiError::Conflict {
            kind: ErrorKind::DuplicateAction,
            ..
        }
    ));
}

#[test]
fn test_core_conflict_translation() {
    let err: ApiError = translate_core_error(CoreError::Conflict { attendance_id: 9 });
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(err.to_string().contains('9'));
}

#[test]
fn test_persistence_translation() {
    assert_eq!(
        translate_persistence_error(PersistenceError::VersionConflict { attendance_id: 3 }).kind(),
        ErrorKind::Conflict
    );
    assert_eq!(
        translate_persistence_error(PersistenceError::DuplicateRecord {
            officer_id: String::from("officer-7"),
            work_date: String::from("2026-03-10"),
        })
        .kind(),
        ErrorKind::DuplicateAction
    );
    assert_eq!(
        translate_persistence_error(PersistenceError::OfficeNotFound(String::from("ghost")))
            .kind(),
        ErrorKind::OfficeNotFound
    );
    assert!(matches!(
        translate_persistence_error(PersistenceError::QueryFailed(String::from("disk I/O"))),
        ApiError::Internal { .. }
    ));
}

#[test]
fn test_auth_errors_convert() {
    let err: ApiError = AuthError::Unauthorized {
        action: String::from("decide"),
        required_role: String::from("Supervisor"),
    }
    .into();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(
        err.to_string(),
        "Unauthorized: 'decide' requires Supervisor role"
    );
}
