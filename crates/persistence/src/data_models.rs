// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion to and from domain values.

use diesel::prelude::*;
use fieldcheck_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use fieldcheck_domain::{
    ActionRecord, AttendanceRecord, Geofence, Office, OfficeId, OfficerId,
};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::diesel_schema::{attendance_records, audit_events, offices};
use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Formats a calendar day as `YYYY-MM-DD`, which sorts lexically.
pub fn format_work_date(date: time::Date) -> Result<String, PersistenceError> {
    Ok(date.format(format_description!("[year]-[month]-[day]"))?)
}

fn parse_work_date(value: &str) -> Result<time::Date, PersistenceError> {
    Ok(time::Date::parse(
        value,
        format_description!("[year]-[month]-[day]"),
    )?)
}

fn identifier_error(err: &fieldcheck_domain::DomainError) -> PersistenceError {
    PersistenceError::SerializationError(format!("stored identifier is invalid: {err}"))
}

// ============================================================================
// Offices
// ============================================================================

#[derive(Queryable, Selectable)]
#[diesel(table_name = offices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OfficeRow {
    pub office_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
    pub is_active: bool,
    pub supervisor_ids_json: String,
}

#[derive(Insertable)]
#[diesel(table_name = offices)]
pub struct NewOfficeRow<'a> {
    pub office_id: &'a str,
    pub name: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
    pub is_active: bool,
    pub supervisor_ids_json: String,
}

impl<'a> NewOfficeRow<'a> {
    pub fn from_office(office: &'a Office) -> Result<Self, PersistenceError> {
        let center = office.geofence.center();
        Ok(Self {
            office_id: office.office_id.value(),
            name: &office.name,
            latitude: center.lat(),
            longitude: center.lng(),
            radius_m: office.geofence.radius_m(),
            is_active: office.is_active,
            supervisor_ids_json: serde_json::to_string(&office.supervisor_ids)?,
        })
    }
}

impl TryFrom<OfficeRow> for Office {
    type Error = PersistenceError;

    fn try_from(row: OfficeRow) -> Result<Self, Self::Error> {
        let office_id: OfficeId =
            OfficeId::new(&row.office_id).map_err(|e| identifier_error(&e))?;
        let supervisor_ids: Vec<String> = serde_json::from_str(&row.supervisor_ids_json)?;
        Self::new(
            office_id,
            row.name,
            (row.latitude, row.longitude),
            row.radius_m,
            row.is_active,
            supervisor_ids,
        )
        .map_err(|e| PersistenceError::SerializationError(format!("stored office is invalid: {e}")))
    }
}

// ============================================================================
// Attendance records
// ============================================================================

#[derive(Queryable, Selectable)]
#[diesel(table_name = attendance_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AttendanceRow {
    pub attendance_id: i64,
    pub officer_id: String,
    pub office_id: String,
    pub work_date: String,
    pub geofence_json: String,
    pub checkin_json: String,
    pub checkout_json: Option<String>,
    pub has_pending: bool,
    pub version: i64,
    pub updated_at: String,
}

/// Column values for inserting or updating an attendance record.
#[derive(Insertable)]
#[diesel(table_name = attendance_records)]
pub struct AttendanceValues {
    pub officer_id: String,
    pub office_id: String,
    pub work_date: String,
    pub geofence_json: String,
    pub checkin_json: String,
    pub checkout_json: Option<String>,
    pub has_pending: bool,
    pub version: i64,
    pub updated_at: String,
}

impl AttendanceValues {
    pub fn from_record(
        record: &AttendanceRecord,
        updated_at: time::OffsetDateTime,
    ) -> Result<Self, PersistenceError> {
        Ok(Self {
            officer_id: record.officer_id.value().to_string(),
            office_id: record.office_id.value().to_string(),
            work_date: format_work_date(record.work_date)?,
            geofence_json: serde_json::to_string(&record.geofence)?,
            checkin_json: serde_json::to_string(&record.checkin)?,
            checkout_json: record
                .checkout
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
            has_pending: record.has_pending(),
            version: record.version,
            updated_at: updated_at.format(&Rfc3339)?,
        })
    }
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = PersistenceError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let geofence: Geofence = serde_json::from_str(&row.geofence_json)?;
        let checkin: ActionRecord = serde_json::from_str(&row.checkin_json)?;
        let checkout: Option<ActionRecord> = row
            .checkout_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(Self {
            attendance_id: Some(row.attendance_id),
            officer_id: OfficerId::new(&row.officer_id).map_err(|e| identifier_error(&e))?,
            office_id: OfficeId::new(&row.office_id).map_err(|e| identifier_error(&e))?,
            work_date: parse_work_date(&row.work_date)?,
            geofence,
            checkin,
            checkout,
            version: row.version,
        })
    }
}

// ============================================================================
// Audit events
// ============================================================================

#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AuditEventRow {
    pub event_id: i64,
    pub attendance_id: i64,
    pub office_id: String,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub created_at: String,
}

#[derive(Insertable)]
#[diesel(table_name = audit_events)]
pub struct NewAuditEventRow {
    pub attendance_id: i64,
    pub office_id: String,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub created_at: String,
}

impl NewAuditEventRow {
    pub fn from_event(event: &AuditEvent, attendance_id: i64) -> Result<Self, PersistenceError> {
        let actor: ActorData = ActorData {
            id: event.actor.id.clone(),
            actor_type: event.actor.actor_type.clone(),
        };
        let cause: CauseData = CauseData {
            id: event.cause.id.clone(),
            description: event.cause.description.clone(),
        };
        let action: ActionData = ActionData {
            name: event.action.name.clone(),
            details: event.action.details.clone(),
        };
        Ok(Self {
            attendance_id,
            office_id: event.office_id.value().to_string(),
            actor_json: serde_json::to_string(&actor)?,
            cause_json: serde_json::to_string(&cause)?,
            action_json: serde_json::to_string(&action)?,
            before_snapshot_json: serde_json::to_string(&event.before.data)?,
            after_snapshot_json: serde_json::to_string(&event.after.data)?,
            created_at: event.created_at.format(&Rfc3339)?,
        })
    }
}

impl TryFrom<AuditEventRow> for AuditEvent {
    type Error = PersistenceError;

    fn try_from(row: AuditEventRow) -> Result<Self, Self::Error> {
        let actor: ActorData = serde_json::from_str(&row.actor_json)?;
        let cause: CauseData = serde_json::from_str(&row.cause_json)?;
        let action: ActionData = serde_json::from_str(&row.action_json)?;
        let before: String = serde_json::from_str(&row.before_snapshot_json)?;
        let after: String = serde_json::from_str(&row.after_snapshot_json)?;

        let mut event: Self = Self::new(
            Some(row.attendance_id),
            OfficeId::new(&row.office_id).map_err(|e| identifier_error(&e))?,
            time::OffsetDateTime::parse(&row.created_at, &Rfc3339)?,
            Actor::new(actor.id, actor.actor_type),
            Cause::new(cause.id, cause.description),
            Action::new(action.name, action.details),
            StateSnapshot::new(before),
            StateSnapshot::new(after),
        );
        event.event_id = Some(row.event_id);
        Ok(event)
    }
}
