// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldcheck_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use fieldcheck_domain::{
    ActionRecord, AttendanceAction, AttendanceRecord, Decision, DomainError, GeoPoint, Office,
    OfficeId, OfficerId, PhotoRef, Validity, validate_check_out_allowed, validate_decision,
    validate_reason_allowed, validate_reason_text,
};
use time::OffsetDateTime;

use crate::command::Command;
use crate::config::EngineConfig;
use crate::error::CoreError;
use crate::notify::EventKind;
use crate::state::{Outcome, TransitionResult};

/// Applies a command to the current attendance record.
///
/// The caller resolves the inputs before calling:
/// - `current` is the officer's record for the submission day for
///   `CheckIn`/`CheckOut`, or the record named by `attendance_id` otherwise.
/// - `office` is the target office for `CheckIn`; it is ignored elsewhere
///   because later actions measure against the record's geofence snapshot.
///
/// # Errors
///
/// Returns `CoreError::DomainViolation` for any rule violation. The input
/// record is never modified.
#[allow(clippy::too_many_lines)]
pub fn apply(
    config: &EngineConfig,
    current: Option<&AttendanceRecord>,
    office: Option<&Office>,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<Outcome, CoreError> {
    let name: String = command.name();
    match command {
        Command::CheckIn {
            officer_id,
            office_id,
            location,
            photo,
            at,
        } => check_in(
            config,
            current,
            office,
            CheckInInput {
                officer_id,
                office_id,
                location,
                photo,
                at,
            },
            Audit { name, actor, cause },
        ),
        Command::CheckOut {
            officer_id,
            location,
            photo,
            at,
        } => {
            let work_date: time::Date = config.work_date(at)?;
            let record: &AttendanceRecord = current
                .filter(|r| r.officer_id == officer_id && r.work_date == work_date)
                .ok_or_else(|| DomainError::NoActiveCheckIn {
                    officer_id: officer_id.value().to_string(),
                    work_date,
                })?;
            validate_check_out_allowed(record, at)?;
            let photo: PhotoRef = PhotoRef::new(photo, config.max_photo_bytes)?;

            let reading = record.geofence.measure(&location);
            let mut new_record: AttendanceRecord = record.clone();
            new_record.checkout = Some(ActionRecord::pending(at, location, reading, photo));

            let details: String = format!(
                "distance={}m within_radius={}",
                fieldcheck_domain::display_distance(reading.distance_m),
                reading.within_radius
            );
            Ok(commit(
                Some(record),
                new_record,
                AttendanceAction::CheckOut,
                EventKind::CheckedOut,
                !reading.within_radius,
                Audit { name, actor, cause }.event(
                    Some(record),
                    record.office_id.clone(),
                    at,
                    details,
                ),
            ))
        }
        Command::SubmitReason {
            attendance_id,
            action,
            reason,
            photo,
            at,
        } => {
            let record: &AttendanceRecord = find_record(current, attendance_id)?;
            record.require_action(action)?;
            let reason: String = validate_reason_text(&reason)?;
            validate_reason_allowed(record, action)?;
            let reason_photo: Option<PhotoRef> = photo
                .map(|p| PhotoRef::new(p, config.max_photo_bytes))
                .transpose()?;

            let mut new_record: AttendanceRecord = record.clone();
            let target: &mut ActionRecord = new_record.action_mut(action).ok_or(
                DomainError::ActionNotRecorded {
                    attendance_id,
                    action,
                },
            )?;
            let details: String = format!("{action} reason: {reason}");
            target.reason = Some(reason);
            target.reason_photo = reason_photo;
            target.reason_submitted_at = Some(at);

            Ok(commit(
                Some(record),
                new_record,
                action,
                EventKind::ReasonSubmitted,
                false,
                Audit { name, actor, cause }.event(
                    Some(record),
                    record.office_id.clone(),
                    at,
                    details,
                ),
            ))
        }
        Command::Decide {
            attendance_id,
            action,
            decision,
            rejection_reason,
            at,
        } => {
            let record: &AttendanceRecord = find_record(current, attendance_id)?;
            let rejection_reason: Option<String> =
                validate_decision(record, action, decision, rejection_reason.as_deref())?;
            let previous = record.require_action(action)?.status;

            let Some(new_status) = previous.after(decision) else {
                return Ok(Outcome::Unchanged(record.clone()));
            };

            let mut new_record: AttendanceRecord = record.clone();
            let target: &mut ActionRecord = new_record.action_mut(action).ok_or(
                DomainError::ActionNotRecorded {
                    attendance_id,
                    action,
                },
            )?;
            let details: String = match (&decision, &rejection_reason) {
                (Decision::Reject, Some(reason)) => {
                    format!("{action} {previous} -> {new_status}: {reason}")
                }
                _ => format!("{action} {previous} -> {new_status}"),
            };
            target.status = new_status;
            target.rejection_reason = rejection_reason;
            target.decided_by = Some(actor.id.clone());
            target.decided_at = Some(at);

            let needs_reason: bool = target.needs_reason();
            Ok(commit(
                Some(record),
                new_record,
                action,
                EventKind::Decided,
                needs_reason,
                Audit { name, actor, cause }.event(
                    Some(record),
                    record.office_id.clone(),
                    at,
                    details,
                ),
            ))
        }
    }
}

struct CheckInInput {
    officer_id: OfficerId,
    office_id: OfficeId,
    location: GeoPoint,
    photo: String,
    at: OffsetDateTime,
}

fn check_in(
    config: &EngineConfig,
    current: Option<&AttendanceRecord>,
    office: Option<&Office>,
    input: CheckInInput,
    audit: Audit,
) -> Result<Outcome, CoreError> {
    let work_date: time::Date = config.work_date(input.at)?;
    if let Some(existing) = current {
        return Err(DomainError::DuplicateAction {
            officer_id: input.officer_id.value().to_string(),
            work_date: existing.work_date,
        }
        .into());
    }

    let office: &Office = office
        .filter(|o| o.office_id == input.office_id)
        .ok_or_else(|| DomainError::OfficeNotFound {
            office_id: input.office_id.value().to_string(),
        })?;
    if !office.is_active {
        return Err(DomainError::OfficeInactive {
            office_id: input.office_id.value().to_string(),
        }
        .into());
    }
    let photo: PhotoRef = PhotoRef::new(input.photo, config.max_photo_bytes)?;

    let reading = office.geofence.measure(&input.location);
    let checkin: ActionRecord = ActionRecord::pending(input.at, input.location, reading, photo);
    let record: AttendanceRecord = AttendanceRecord::new(
        input.officer_id,
        input.office_id,
        work_date,
        office.geofence,
        checkin,
    );

    let details: String = format!(
        "distance={}m within_radius={}",
        fieldcheck_domain::display_distance(reading.distance_m),
        reading.within_radius
    );
    let needs_reason: bool = record.overall_validity() == Validity::Invalid;
    let audit_event: AuditEvent = audit.event(None, record.office_id.clone(), input.at, details);
    Ok(commit(
        None,
        record,
        AttendanceAction::CheckIn,
        EventKind::CheckedIn,
        needs_reason,
        audit_event,
    ))
}

fn find_record(
    current: Option<&AttendanceRecord>,
    attendance_id: i64,
) -> Result<&AttendanceRecord, DomainError> {
    current
        .filter(|r| r.attendance_id == Some(attendance_id))
        .ok_or(DomainError::AttendanceNotFound(attendance_id))
}

/// Bumps the version and finalizes the audit snapshot.
fn commit(
    before: Option<&AttendanceRecord>,
    mut new_record: AttendanceRecord,
    action: AttendanceAction,
    kind: EventKind,
    needs_reason: bool,
    mut audit_event: AuditEvent,
) -> Outcome {
    let expected_version: Option<i64> = before.map(|r| r.version);
    new_record.version = expected_version.unwrap_or_default() + 1;
    audit_event.after = StateSnapshot::of_record(&new_record);

    Outcome::Applied(Box::new(TransitionResult {
        new_record,
        expected_version,
        audit_event,
        action,
        kind,
        needs_reason,
    }))
}

struct Audit {
    name: String,
    actor: Actor,
    cause: Cause,
}

impl Audit {
    /// Builds the event; the after-snapshot is filled in by `commit`.
    fn event(
        self,
        before: Option<&AttendanceRecord>,
        office_id: OfficeId,
        at: OffsetDateTime,
        details: String,
    ) -> AuditEvent {
        let before_snapshot: StateSnapshot =
            before.map_or_else(StateSnapshot::empty, StateSnapshot::of_record);
        AuditEvent::new(
            before.and_then(|r| r.attendance_id),
            office_id,
            at,
            self.actor,
            self.cause,
            Action::new(self.name, Some(details)),
            before_snapshot,
            StateSnapshot::empty(),
        )
    }
}
