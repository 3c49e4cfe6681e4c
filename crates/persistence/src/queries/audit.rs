// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldcheck_audit::AuditEvent;

use crate::data_models::AuditEventRow;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Retrieves an audit event by ID.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<AuditEvent, PersistenceError> {
    let row: AuditEventRow = audit_events::table
        .find(event_id)
        .select(AuditEventRow::as_select())
        .first::<AuditEventRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_audit_event: {e}")))?
        .ok_or_else(|| PersistenceError::NotFound(format!("audit event {event_id}")))?;
    AuditEvent::try_from(row)
}

/// Every event for an attendance record, oldest first.
pub fn audit_timeline(
    conn: &mut SqliteConnection,
    attendance_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    audit_events::table
        .filter(audit_events::attendance_id.eq(attendance_id))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load::<AuditEventRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("audit_timeline: {e}")))?
        .into_iter()
        .map(AuditEvent::try_from)
        .collect()
}
