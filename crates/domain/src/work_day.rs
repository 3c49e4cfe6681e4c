// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar-day boundaries for attendance.
//!
//! Every deployment declares one authoritative IANA timezone. An instant is
//! assigned to the calendar day it falls on in that timezone, regardless of
//! where the officer or the server happens to be.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use time::OffsetDateTime;

use crate::error::DomainError;

/// Maps instants onto work days in a fixed timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkDayClock {
    tz: Tz,
}

impl WorkDayClock {
    /// Creates a clock for the named IANA timezone (e.g. `"Asia/Jakarta"`).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if the name is not recognised.
    pub fn new(timezone: &str) -> Result<Self, DomainError> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self { tz })
    }

    /// A clock for UTC.
    #[must_use]
    pub const fn utc() -> Self {
        Self { tz: Tz::UTC }
    }

    /// The timezone name.
    #[must_use]
    pub fn timezone(&self) -> &'static str {
        self.tz.name()
    }

    /// Returns the calendar day `at` falls on in this clock's timezone.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateConversion` if the instant cannot be represented.
    pub fn work_date(&self, at: OffsetDateTime) -> Result<time::Date, DomainError> {
        let utc: DateTime<Utc> = DateTime::from_timestamp(at.unix_timestamp(), at.nanosecond())
            .ok_or_else(|| DomainError::DateConversion {
                reason: format!("{at} is outside the supported range"),
            })?;
        let local: chrono::NaiveDate = utc.with_timezone(&self.tz).date_naive();

        let month: time::Month = u8::try_from(local.month())
            .ok()
            .and_then(|m| time::Month::try_from(m).ok())
            .ok_or_else(|| DomainError::DateConversion {
                reason: format!("invalid month in {local}"),
            })?;
        let day: u8 = u8::try_from(local.day()).map_err(|e| DomainError::DateConversion {
            reason: format!("invalid day in {local}: {e}"),
        })?;

        time::Date::from_calendar_date(local.year(), month, day).map_err(|e| {
            DomainError::DateConversion {
                reason: format!("{local}: {e}"),
            }
        })
    }
}

impl Default for WorkDayClock {
    fn default() -> Self {
        Self::utc()
    }
}
