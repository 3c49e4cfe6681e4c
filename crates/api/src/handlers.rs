// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance operations at the API boundary.
//!
//! Every write follows the same shape: authorize, read the current record,
//! [`apply`] the command, commit with a compare-and-swap on the record
//! version, then publish. A lost race re-reads and re-applies up to
//! `conflict_retries` times before surfacing as a conflict.

use fieldcheck::{
    AttendanceEvent, BulkItem, BulkOutcome, Command, EngineConfig, ErrorKind, EventSink,
    ItemError, Outcome, apply, fan_out,
};
use fieldcheck_audit::{AuditEvent, Cause};
use fieldcheck_domain::{
    AttendanceAction, AttendanceRecord, Decision, DomainError, GeoPoint, HoursSummary, Office,
    OfficeId, OfficerId, summarize_hours,
};
use fieldcheck_persistence::{PersistedTransition, Persistence, PersistenceError};
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{debug, info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    AttendanceResponse, AttendanceView, AuditEventView, AuditTimelineResponse,
    BulkDecisionRequest, CheckInRequest, CheckOutRequest, DecisionRequest, HoursQuery,
    HoursSummaryResponse, ListOfficesResponse, OfficeView, PendingApprovalsQuery,
    PendingApprovalsResponse, SubmitReasonRequest,
};

/// Engine settings and the event sink shared by every write.
#[derive(Clone, Copy)]
pub struct EngineContext<'a> {
    /// Deployment-wide engine settings.
    pub config: &'a EngineConfig,
    /// Receives an event after each committed transition.
    pub sink: &'a dyn EventSink,
}

impl<'a> EngineContext<'a> {
    /// Creates a context.
    #[must_use]
    pub const fn new(config: &'a EngineConfig, sink: &'a dyn EventSink) -> Self {
        Self { config, sink }
    }
}

/// A transition as seen by the caller after commit.
pub(crate) struct Committed {
    pub(crate) record: AttendanceRecord,
    pub(crate) needs_reason: bool,
    pub(crate) event_id: Option<i64>,
}

impl Committed {
    fn into_response(self, message: String) -> AttendanceResponse {
        AttendanceResponse {
            attendance: AttendanceView::from(&self.record),
            needs_reason: self.needs_reason,
            changed: self.event_id.is_some(),
            event_id: self.event_id,
            message,
        }
    }
}

/// Runs `attempt` and commits its outcome, retrying on version conflicts.
///
/// `attempt` must re-read everything it depends on, since it runs again
/// after a conflict. Unchanged outcomes are neither written nor published.
pub(crate) fn run_transition<F>(
    persistence: &mut Persistence,
    ctx: EngineContext<'_>,
    operation: &str,
    mut attempt: F,
) -> Result<Committed, ApiError>
where
    F: FnMut(&mut Persistence) -> Result<Outcome, ApiError>,
{
    let mut conflicts: u32 = 0;
    loop {
        let outcome: Outcome = attempt(persistence).inspect_err(|err| {
            warn!(operation, kind = %err.kind(), error = %err, "Transition rejected");
        })?;

        let result = match outcome {
            Outcome::Unchanged(record) => {
                debug!(
                    operation,
                    attendance_id = record.id(),
                    "Decision already in effect, nothing to commit"
                );
                return Ok(Committed {
                    record,
                    needs_reason: false,
                    event_id: None,
                });
            }
            Outcome::Applied(result) => result,
        };

        match persistence.persist_transition(&result) {
            Ok(PersistedTransition { record, event_id }) => {
                info!(
                    operation,
                    attendance_id = record.id(),
                    action = %result.action,
                    status = %record.action(result.action).map_or("none", |a| a.status.as_str()),
                    event_id,
                    "Committed attendance transition"
                );
                if let Some(event) =
                    AttendanceEvent::from_record(result.kind, result.action, &record)
                {
                    ctx.sink.publish(event);
                }
                return Ok(Committed {
                    record,
                    needs_reason: result.needs_reason,
                    event_id: Some(event_id),
                });
            }
            Err(PersistenceError::VersionConflict { attendance_id })
                if conflicts < ctx.config.conflict_retries =>
            {
                conflicts += 1;
                warn!(
                    operation,
                    attendance_id,
                    attempt = conflicts,
                    "Attendance changed concurrently, retrying"
                );
            }
            Err(err) => {
                let api_err: ApiError = translate_persistence_error(err);
                warn!(
                    operation,
                    kind = %api_err.kind(),
                    error = %api_err,
                    "Transition not committed"
                );
                return Err(api_err);
            }
        }
    }
}

/// Largest accepted gap between a device's capture time and the server clock.
pub const MAX_DEVICE_CLOCK_SKEW: time::Duration = time::Duration::minutes(5);

/// The instant a check-in or check-out is recorded at.
///
/// The server clock decides both the time and the work day. A device
/// capture time is only checked against it.
fn submission_time(
    device_time: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> Result<OffsetDateTime, ApiError> {
    if let Some(device_time) = device_time {
        let skew: time::Duration = (device_time - now).abs();
        if skew > MAX_DEVICE_CLOCK_SKEW {
            return Err(ApiError::invalid_input(
                ErrorKind::ClockSkew,
                "timestamp",
                format!(
                    "device time is {} seconds away from the server clock, at most {} allowed",
                    skew.whole_seconds(),
                    MAX_DEVICE_CLOCK_SKEW.whole_seconds()
                ),
            ));
        }
    }
    Ok(now)
}

fn parse_officer_id(value: &str) -> Result<OfficerId, ApiError> {
    OfficerId::new(value).map_err(translate_domain_error)
}

fn parse_office_id(value: &str) -> Result<OfficeId, ApiError> {
    OfficeId::new(value).map_err(translate_domain_error)
}

fn parse_date(field: &str, value: &str) -> Result<time::Date, ApiError> {
    time::Date::parse(value, format_description!("[year]-[month]-[day]")).map_err(|e| {
        ApiError::invalid_input(
            ErrorKind::InvalidQuery,
            field,
            format!("expected YYYY-MM-DD, got '{value}': {e}"),
        )
    })
}

fn load_record(
    persistence: &mut Persistence,
    attendance_id: i64,
) -> Result<AttendanceRecord, ApiError> {
    persistence
        .get_attendance(attendance_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::AttendanceNotFound(attendance_id)))
}

fn load_office(
    persistence: &mut Persistence,
    office_id: &OfficeId,
) -> Result<Option<Office>, ApiError> {
    persistence
        .get_office(office_id)
        .map_err(translate_persistence_error)
}

/// Records an officer's arrival at an office.
///
/// The response's `needs_reason` is true when the officer was outside the
/// geofence and must justify the check-in before it can be approved.
///
/// # Errors
///
/// Returns an error if:
/// - The actor may not act for the officer
/// - Any field fails validation
/// - The office is unknown or inactive
/// - The officer already has a record for the day
pub fn check_in(
    persistence: &mut Persistence,
    ctx: EngineContext<'_>,
    request: &CheckInRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: &Cause,
    now: OffsetDateTime,
) -> Result<AttendanceResponse, ApiError> {
    let officer_id: OfficerId = parse_officer_id(&request.officer_id)?;
    AuthorizationService::authorize_officer_action(authenticated_actor, "check_in", &officer_id)?;
    let office_id: OfficeId = parse_office_id(&request.office_id)?;
    let location: GeoPoint =
        GeoPoint::new(request.latitude, request.longitude).map_err(translate_domain_error)?;
    let at: OffsetDateTime = submission_time(request.timestamp, now)?;
    let work_date: time::Date = ctx.config.work_date(at).map_err(translate_domain_error)?;

    let committed: Committed = run_transition(persistence, ctx, "check_in", |persistence| {
        let office: Option<Office> = load_office(persistence, &office_id)?;
        let current: Option<AttendanceRecord> = persistence
            .find_attendance_for_day(&officer_id, work_date)
            .map_err(translate_persistence_error)?;
        let command: Command = Command::CheckIn {
            officer_id: officer_id.clone(),
            office_id: office_id.clone(),
            location,
            photo: request.photo.clone(),
            at,
        };
        apply(
            ctx.config,
            current.as_ref(),
            office.as_ref(),
            command,
            authenticated_actor.to_audit_actor(),
            cause.clone(),
        )
        .map_err(translate_core_error)
    })?;

    let message: String = format!("Officer '{officer_id}' checked in at '{office_id}'");
    Ok(committed.into_response(message))
}

/// Records an officer's departure.
///
/// # Errors
///
/// Returns an error if:
/// - The actor may not act for the officer
/// - Any field fails validation
/// - The officer has no record for the day
/// - The check-in is not approved or a check-out already exists
pub fn check_out(
    persistence: &mut Persistence,
    ctx: EngineContext<'_>,
    request: &CheckOutRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: &Cause,
    now: OffsetDateTime,
) -> Result<AttendanceResponse, ApiError> {
    let officer_id: OfficerId = parse_officer_id(&request.officer_id)?;
    AuthorizationService::authorize_officer_action(authenticated_actor, "check_out", &officer_id)?;
    let location: GeoPoint =
        GeoPoint::new(request.latitude, request.longitude).map_err(translate_domain_error)?;
    let at: OffsetDateTime = submission_time(request.timestamp, now)?;
    let work_date: time::Date = ctx.config.work_date(at).map_err(translate_domain_error)?;

    let committed: Committed = run_transition(persistence, ctx, "check_out", |persistence| {
        let current: Option<AttendanceRecord> = persistence
            .find_attendance_for_day(&officer_id, work_date)
            .map_err(translate_persistence_error)?;
        let command: Command = Command::CheckOut {
            officer_id: officer_id.clone(),
            location,
            photo: request.photo.clone(),
            at,
        };
        apply(
            ctx.config,
            current.as_ref(),
            None,
            command,
            authenticated_actor.to_audit_actor(),
            cause.clone(),
        )
        .map_err(translate_core_error)
    })?;

    let message: String = format!("Officer '{officer_id}' checked out");
    Ok(committed.into_response(message))
}

/// Attaches an officer's justification to an out-of-range action.
///
/// # Errors
///
/// Returns an error if:
/// - The record does not exist or belongs to another officer
/// - The action is within range or already has a reason
/// - The reason is blank or too long
pub fn submit_reason(
    persistence: &mut Persistence,
    ctx: EngineContext<'_>,
    attendance_id: i64,
    request: &SubmitReasonRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: &Cause,
    now: OffsetDateTime,
) -> Result<AttendanceResponse, ApiError> {
    let committed: Committed = run_transition(persistence, ctx, "submit_reason", |persistence| {
        let record: AttendanceRecord = load_record(persistence, attendance_id)?;
        AuthorizationService::authorize_officer_action(
            authenticated_actor,
            "submit_reason",
            &record.officer_id,
        )?;
        let command: Command = Command::SubmitReason {
            attendance_id,
            action: request.action,
            reason: request.reason.clone(),
            photo: request.photo.clone(),
            at: now,
        };
        apply(
            ctx.config,
            Some(&record),
            None,
            command,
            authenticated_actor.to_audit_actor(),
            cause.clone(),
        )
        .map_err(translate_core_error)
    })?;

    let message: String = format!(
        "Reason recorded for attendance {attendance_id} {}",
        request.action
    );
    Ok(committed.into_response(message))
}

/// One supervisor decision, shared by the single and bulk paths.
struct DecisionInput {
    attendance_id: i64,
    action: AttendanceAction,
    decision: Decision,
    rejection_reason: Option<String>,
    at: OffsetDateTime,
}

fn decide_record(
    persistence: &mut Persistence,
    ctx: EngineContext<'_>,
    input: &DecisionInput,
    authenticated_actor: &AuthenticatedActor,
    cause: &Cause,
) -> Result<Committed, ApiError> {
    run_transition(persistence, ctx, "decide", |persistence| {
        let record: AttendanceRecord = load_record(persistence, input.attendance_id)?;
        let office: Option<Office> = load_office(persistence, &record.office_id)?;
        AuthorizationService::authorize_office_decision(authenticated_actor, office.as_ref())?;
        let command: Command = Command::Decide {
            attendance_id: input.attendance_id,
            action: input.action,
            decision: input.decision,
            rejection_reason: input.rejection_reason.clone(),
            at: input.at,
        };
        apply(
            ctx.config,
            Some(&record),
            None,
            command,
            authenticated_actor.to_audit_actor(),
            cause.clone(),
        )
        .map_err(translate_core_error)
    })
}

/// Approves or rejects one action of one record.
///
/// Repeating a decision already in effect succeeds with `changed = false`
/// and writes nothing.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not a supervisor of the record's office or an admin
/// - The record or action does not exist
/// - An out-of-range action without a reason is approved
/// - A rejection has no rejection reason
/// - The record keeps changing concurrently
pub fn decide(
    persistence: &mut Persistence,
    ctx: EngineContext<'_>,
    attendance_id: i64,
    request: &DecisionRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: &Cause,
    now: OffsetDateTime,
) -> Result<AttendanceResponse, ApiError> {
    AuthorizationService::authorize_decide(authenticated_actor)?;
    let input: DecisionInput = DecisionInput {
        attendance_id,
        action: request.action,
        decision: request.decision,
        rejection_reason: request.rejection_reason.clone(),
        at: now,
    };
    let committed: Committed =
        decide_record(persistence, ctx, &input, authenticated_actor, cause)?;

    let message: String = if committed.event_id.is_some() {
        format!(
            "{} {} for attendance {attendance_id}",
            request.decision.as_str(),
            request.action
        )
    } else {
        format!(
            "Attendance {attendance_id} {} already {}",
            request.action,
            committed
                .record
                .action(request.action)
                .map_or("decided", |a| a.status.as_str())
        )
    };
    Ok(committed.into_response(message))
}

/// Applies one decision to many explicitly tagged actions.
///
/// Each item is processed and committed on its own. A failing item is
/// reported and leaves its record untouched; it never rolls back or blocks
/// the others.
///
/// # Errors
///
/// Returns an error only if the actor may not make decisions at all.
/// Per-item failures are reported in the outcome.
pub fn decide_bulk(
    persistence: &mut Persistence,
    ctx: EngineContext<'_>,
    request: &BulkDecisionRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: &Cause,
    now: OffsetDateTime,
) -> Result<BulkOutcome, ApiError> {
    AuthorizationService::authorize_decide(authenticated_actor)?;

    let outcome: BulkOutcome = fan_out(&request.items, |item: BulkItem| {
        let input: DecisionInput = DecisionInput {
            attendance_id: item.attendance_id,
            action: item.action,
            decision: request.decision,
            rejection_reason: request.rejection_reason.clone(),
            at: now,
        };
        decide_record(persistence, ctx, &input, authenticated_actor, cause)
            .map(|_| ())
            .map_err(|err| ItemError::new(err.kind(), err.to_string()))
    });

    info!(
        decision = request.decision.as_str(),
        success_count = outcome.success_count,
        failure_count = outcome.failure_count,
        "Bulk decision processed"
    );
    Ok(outcome)
}

/// Lists records with at least one pending action, for one office or for
/// every office a supervisor is assigned to.
///
/// # Errors
///
/// Returns an error if neither or both selectors are given, the office is
/// unknown, or the actor may not view the queue.
pub fn get_pending_approvals(
    persistence: &mut Persistence,
    query: &PendingApprovalsQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<PendingApprovalsResponse, ApiError> {
    let office_ids: Vec<OfficeId> = match (&query.office_id, &query.supervisor_id) {
        (Some(office_id), None) => {
            let office_id: OfficeId = parse_office_id(office_id)?;
            let office: Office = load_office(persistence, &office_id)?.ok_or_else(|| {
                translate_domain_error(DomainError::OfficeNotFound {
                    office_id: office_id.value().to_string(),
                })
            })?;
            AuthorizationService::authorize_pending_view(authenticated_actor, Some(&office), None)?;
            vec![office.office_id]
        }
        (None, Some(supervisor_id)) => {
            AuthorizationService::authorize_pending_view(
                authenticated_actor,
                None,
                Some(supervisor_id.as_str()),
            )?;
            persistence
                .offices_supervised_by(supervisor_id)
                .map_err(translate_persistence_error)?
        }
        _ => {
            return Err(ApiError::invalid_input(
                ErrorKind::InvalidQuery,
                "office_id",
                String::from("exactly one of office_id or supervisor_id is required"),
            ));
        }
    };

    let records: Vec<AttendanceRecord> = persistence
        .list_pending(&office_ids)
        .map_err(translate_persistence_error)?;
    Ok(PendingApprovalsResponse {
        records: records.iter().map(AttendanceView::from).collect(),
    })
}

/// Returns one attendance record.
///
/// # Errors
///
/// Returns an error if the record does not exist or is outside the actor's scope.
pub fn get_attendance(
    persistence: &mut Persistence,
    attendance_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<AttendanceView, ApiError> {
    let record: AttendanceRecord =
        load_visible_record(persistence, attendance_id, authenticated_actor)?;
    Ok(AttendanceView::from(&record))
}

fn load_visible_record(
    persistence: &mut Persistence,
    attendance_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<AttendanceRecord, ApiError> {
    let record: AttendanceRecord = load_record(persistence, attendance_id)?;
    let office: Option<Office> = load_office(persistence, &record.office_id)?;
    AuthorizationService::authorize_view_record(authenticated_actor, &record, office.as_ref())?;
    Ok(record)
}

/// Sums an officer's worked hours over an inclusive day range.
///
/// Only records with both actions approved contribute; records with a
/// rejected action are counted as excluded.
///
/// # Errors
///
/// Returns an error if the dates are malformed or reversed, or an officer
/// asks for someone else's hours.
pub fn hours_summary(
    persistence: &mut Persistence,
    officer_id: &str,
    query: &HoursQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<HoursSummaryResponse, ApiError> {
    let officer_id: OfficerId = parse_officer_id(officer_id)?;
    AuthorizationService::authorize_view_hours(authenticated_actor, &officer_id)?;
    let from: time::Date = parse_date("from", &query.from)?;
    let to: time::Date = parse_date("to", &query.to)?;
    if from > to {
        return Err(ApiError::invalid_input(
            ErrorKind::InvalidQuery,
            "from",
            format!("range start {from} is after range end {to}"),
        ));
    }

    let records: Vec<AttendanceRecord> = persistence
        .list_for_officer(&officer_id, from, to)
        .map_err(translate_persistence_error)?;
    let summary: HoursSummary = summarize_hours(&records);

    Ok(HoursSummaryResponse {
        officer_id: officer_id.value().to_string(),
        from: from.to_string(),
        to: to.to_string(),
        summary,
    })
}

/// Returns the audit trail of one attendance record, oldest first.
///
/// # Errors
///
/// Returns an error if the record does not exist or is outside the actor's scope.
pub fn audit_timeline(
    persistence: &mut Persistence,
    attendance_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<AuditTimelineResponse, ApiError> {
    load_visible_record(persistence, attendance_id, authenticated_actor)?;
    let events: Vec<AuditEvent> = persistence
        .audit_timeline(attendance_id)
        .map_err(translate_persistence_error)?;
    Ok(AuditTimelineResponse {
        attendance_id,
        events: events.iter().map(AuditEventView::from).collect(),
    })
}

/// Lists every office.
///
/// # Errors
///
/// Returns an error if the office directory cannot be read.
pub fn list_offices(persistence: &mut Persistence) -> Result<ListOfficesResponse, ApiError> {
    let offices: Vec<Office> = persistence
        .list_offices()
        .map_err(translate_persistence_error)?;
    Ok(ListOfficesResponse {
        offices: offices.iter().map(OfficeView::from).collect(),
    })
}
