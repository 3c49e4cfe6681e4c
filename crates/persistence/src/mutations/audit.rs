// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldcheck_audit::AuditEvent;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewAuditEventRow;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Persists an audit event for `attendance_id` and returns its event ID.
pub fn persist_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
    attendance_id: i64,
) -> Result<i64, PersistenceError> {
    let row: NewAuditEventRow = NewAuditEventRow::from_event(event, attendance_id)?;
    diesel::insert_into(audit_events::table)
        .values(&row)
        .execute(conn)?;
    let event_id: i64 = get_last_insert_rowid(conn)?;
    debug!(event_id, attendance_id, action = %event.action.name, "Persisted audit event");
    Ok(event_id)
}
