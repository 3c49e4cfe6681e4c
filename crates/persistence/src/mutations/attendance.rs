// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use fieldcheck::TransitionResult;
use fieldcheck_domain::AttendanceRecord;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::AttendanceValues;
use crate::diesel_schema::attendance_records;
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;

/// A transition as it was committed.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTransition {
    /// The record as stored, with its canonical id.
    pub record: AttendanceRecord,
    /// The id of the audit event written with it.
    pub event_id: i64,
}

/// Writes a transition's record and audit event in one transaction.
///
/// A new record is inserted; the `(officer_id, work_date)` unique index turns
/// a concurrent duplicate into `DuplicateRecord`. An existing record is
/// updated only if its stored version still equals `expected_version`;
/// otherwise nothing is written and `VersionConflict` is returned.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<PersistedTransition, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let mut record: AttendanceRecord = result.new_record.clone();
        let values: AttendanceValues =
            AttendanceValues::from_record(&record, result.audit_event.created_at)?;

        let attendance_id: i64 = match result.expected_version {
            None => insert_record(conn, &values)?,
            Some(expected_version) => {
                let attendance_id: i64 = record.attendance_id.ok_or_else(|| {
                    PersistenceError::NotFound(String::from("attendance record has no id"))
                })?;
                update_record(conn, attendance_id, expected_version, &values)?;
                attendance_id
            }
        };
        record.attendance_id = Some(attendance_id);

        let event_id: i64 = persist_audit_event(conn, &result.audit_event, attendance_id)?;
        debug!(attendance_id, version = record.version, "Persisted attendance record");
        Ok(PersistedTransition { record, event_id })
    })
}

fn insert_record(
    conn: &mut SqliteConnection,
    values: &AttendanceValues,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(attendance_records::table)
        .values(values)
        .execute(conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                PersistenceError::DuplicateRecord {
                    officer_id: values.officer_id.clone(),
                    work_date: values.work_date.clone(),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                PersistenceError::OfficeNotFound(values.office_id.clone())
            }
            other => other.into(),
        })?;
    get_last_insert_rowid(conn)
}

fn update_record(
    conn: &mut SqliteConnection,
    attendance_id: i64,
    expected_version: i64,
    values: &AttendanceValues,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        attendance_records::table
            .filter(attendance_records::attendance_id.eq(attendance_id))
            .filter(attendance_records::version.eq(expected_version)),
    )
    .set((
        attendance_records::checkin_json.eq(&values.checkin_json),
        attendance_records::checkout_json.eq(values.checkout_json.as_deref()),
        attendance_records::has_pending.eq(values.has_pending),
        attendance_records::version.eq(values.version),
        attendance_records::updated_at.eq(&values.updated_at),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::VersionConflict { attendance_id });
    }
    Ok(())
}
