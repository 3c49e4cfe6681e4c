// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;
use fieldcheck_domain::Office;
use tracing::debug;

use crate::data_models::NewOfficeRow;
use crate::diesel_schema::offices;
use crate::error::PersistenceError;

/// Inserts an office or replaces the stored copy.
///
/// Existing attendance records keep the geofence they snapshotted at
/// check-in, so replacing an office never changes their validity.
pub fn upsert_office(conn: &mut SqliteConnection, office: &Office) -> Result<(), PersistenceError> {
    let row: NewOfficeRow<'_> = NewOfficeRow::from_office(office)?;
    diesel::insert_into(offices::table)
        .values(&row)
        .on_conflict(offices::office_id)
        .do_update()
        .set((
            offices::name.eq(excluded(offices::name)),
            offices::latitude.eq(excluded(offices::latitude)),
            offices::longitude.eq(excluded(offices::longitude)),
            offices::radius_m.eq(excluded(offices::radius_m)),
            offices::is_active.eq(excluded(offices::is_active)),
            offices::supervisor_ids_json.eq(excluded(offices::supervisor_ids_json)),
        ))
        .execute(conn)?;
    debug!(office_id = %office.office_id, "Upserted office");
    Ok(())
}
