// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldcheck_domain::{AttendanceRecord, OfficeId, OfficerId};

use crate::data_models::{AttendanceRow, format_work_date};
use crate::diesel_schema::attendance_records;
use crate::error::PersistenceError;

fn into_records(rows: Vec<AttendanceRow>) -> Result<Vec<AttendanceRecord>, PersistenceError> {
    rows.into_iter().map(AttendanceRecord::try_from).collect()
}

/// Looks up a record by id.
pub fn get_attendance(
    conn: &mut SqliteConnection,
    attendance_id: i64,
) -> Result<Option<AttendanceRecord>, PersistenceError> {
    attendance_records::table
        .find(attendance_id)
        .select(AttendanceRow::as_select())
        .first::<AttendanceRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_attendance: {e}")))?
        .map(AttendanceRecord::try_from)
        .transpose()
}

/// Looks up the officer's record for a calendar day.
pub fn find_attendance_for_day(
    conn: &mut SqliteConnection,
    officer_id: &OfficerId,
    work_date: time::Date,
) -> Result<Option<AttendanceRecord>, PersistenceError> {
    let work_date: String = format_work_date(work_date)?;
    attendance_records::table
        .filter(attendance_records::officer_id.eq(officer_id.value()))
        .filter(attendance_records::work_date.eq(work_date))
        .select(AttendanceRow::as_select())
        .first::<AttendanceRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_attendance_for_day: {e}")))?
        .map(AttendanceRecord::try_from)
        .transpose()
}

/// Records at the given offices with at least one pending action.
pub fn list_pending(
    conn: &mut SqliteConnection,
    office_ids: &[OfficeId],
) -> Result<Vec<AttendanceRecord>, PersistenceError> {
    let ids: Vec<&str> = office_ids.iter().map(OfficeId::value).collect();
    let rows: Vec<AttendanceRow> = attendance_records::table
        .filter(attendance_records::office_id.eq_any(ids))
        .filter(attendance_records::has_pending.eq(true))
        .order((
            attendance_records::work_date.asc(),
            attendance_records::attendance_id.asc(),
        ))
        .select(AttendanceRow::as_select())
        .load::<AttendanceRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_pending: {e}")))?;
    into_records(rows)
}

/// The officer's records between two days, inclusive.
pub fn list_for_officer(
    conn: &mut SqliteConnection,
    officer_id: &OfficerId,
    from: time::Date,
    to: time::Date,
) -> Result<Vec<AttendanceRecord>, PersistenceError> {
    let from: String = format_work_date(from)?;
    let to: String = format_work_date(to)?;
    let rows: Vec<AttendanceRow> = attendance_records::table
        .filter(attendance_records::officer_id.eq(officer_id.value()))
        .filter(attendance_records::work_date.between(from, to))
        .order(attendance_records::work_date.asc())
        .select(AttendanceRow::as_select())
        .load::<AttendanceRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_for_officer: {e}")))?;
    into_records(rows)
}
