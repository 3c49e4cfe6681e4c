// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldcheck_domain::{Office, OfficeId};

use crate::data_models::OfficeRow;
use crate::diesel_schema::offices;
use crate::error::PersistenceError;

/// Looks up one office.
pub fn get_office(
    conn: &mut SqliteConnection,
    office_id: &OfficeId,
) -> Result<Option<Office>, PersistenceError> {
    offices::table
        .filter(offices::office_id.eq(office_id.value()))
        .select(OfficeRow::as_select())
        .first::<OfficeRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_office: {e}")))?
        .map(Office::try_from)
        .transpose()
}

/// All offices ordered by id.
pub fn list_offices(conn: &mut SqliteConnection) -> Result<Vec<Office>, PersistenceError> {
    offices::table
        .order(offices::office_id.asc())
        .select(OfficeRow::as_select())
        .load::<OfficeRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_offices: {e}")))?
        .into_iter()
        .map(Office::try_from)
        .collect()
}

/// Offices the supervisor is responsible for.
pub fn offices_supervised_by(
    conn: &mut SqliteConnection,
    supervisor_id: &str,
) -> Result<Vec<OfficeId>, PersistenceError> {
    Ok(list_offices(conn)?
        .into_iter()
        .filter(|office| office.is_supervised_by(supervisor_id))
        .map(|office| office.office_id)
        .collect())
}
