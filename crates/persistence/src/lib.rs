// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the `FieldCheck` attendance engine.
//!
//! Built on Diesel with the `SQLite` backend. File databases run in WAL mode;
//! tests use isolated shared-cache in-memory databases.
//!
//! ## Concurrency
//!
//! Every attendance write is a compare-and-swap on `(attendance_id, version)`
//! and is committed together with its audit event in one transaction. A lost
//! race surfaces as [`PersistenceError::VersionConflict`] and nothing is
//! written. Same-day duplicate check-ins are caught by the
//! `(officer_id, work_date)` unique index.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use fieldcheck::TransitionResult;
use fieldcheck_audit::AuditEvent;
use fieldcheck_domain::{AttendanceRecord, Office, OfficeId, OfficerId};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use mutations::PersistedTransition;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for offices, attendance records and audit events.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives its own database instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:fieldcheck_mem_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Offices
    // ========================================================================

    /// Inserts or replaces an office.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_office(&mut self, office: &Office) -> Result<(), PersistenceError> {
        mutations::offices::upsert_office(&mut self.conn, office)
    }

    /// Looks up an office.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is corrupt.
    pub fn get_office(&mut self, office_id: &OfficeId) -> Result<Option<Office>, PersistenceError> {
        queries::offices::get_office(&mut self.conn, office_id)
    }

    /// Lists every office.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is corrupt.
    pub fn list_offices(&mut self) -> Result<Vec<Office>, PersistenceError> {
        queries::offices::list_offices(&mut self.conn)
    }

    /// Lists the offices a supervisor is responsible for.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn offices_supervised_by(
        &mut self,
        supervisor_id: &str,
    ) -> Result<Vec<OfficeId>, PersistenceError> {
        queries::offices::offices_supervised_by(&mut self.conn, supervisor_id)
    }

    // ========================================================================
    // Attendance
    // ========================================================================

    /// Looks up an attendance record by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is corrupt.
    pub fn get_attendance(
        &mut self,
        attendance_id: i64,
    ) -> Result<Option<AttendanceRecord>, PersistenceError> {
        queries::attendance::get_attendance(&mut self.conn, attendance_id)
    }

    /// Looks up the officer's record for a calendar day.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is corrupt.
    pub fn find_attendance_for_day(
        &mut self,
        officer_id: &OfficerId,
        work_date: time::Date,
    ) -> Result<Option<AttendanceRecord>, PersistenceError> {
        queries::attendance::find_attendance_for_day(&mut self.conn, officer_id, work_date)
    }

    /// Lists records with a pending action at any of the given offices.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is corrupt.
    pub fn list_pending(
        &mut self,
        office_ids: &[OfficeId],
    ) -> Result<Vec<AttendanceRecord>, PersistenceError> {
        queries::attendance::list_pending(&mut self.conn, office_ids)
    }

    /// Lists an officer's records between two days, inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is corrupt.
    pub fn list_for_officer(
        &mut self,
        officer_id: &OfficerId,
        from: time::Date,
        to: time::Date,
    ) -> Result<Vec<AttendanceRecord>, PersistenceError> {
        queries::attendance::list_for_officer(&mut self.conn, officer_id, from, to)
    }

    /// Commits a transition: the record write and its audit event, atomically.
    ///
    /// # Errors
    ///
    /// Returns `VersionConflict` if the record changed since it was read,
    /// `DuplicateRecord` if a same-day record already exists, or another
    /// error if the write fails. Nothing is written on error.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<PersistedTransition, PersistenceError> {
        mutations::persist_transition(&mut self.conn, result)
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not found or cannot be deserialized.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, event_id)
    }

    /// Every audit event of an attendance record, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is corrupt.
    pub fn audit_timeline(&mut self, attendance_id: i64) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::audit_timeline(&mut self.conn, attendance_id)
    }
}
