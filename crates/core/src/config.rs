// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fieldcheck_domain::{DomainError, WorkDayClock};

/// Default upper bound on a photo payload: 5 MiB.
pub const DEFAULT_MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Default number of re-read/re-apply attempts after a version conflict.
pub const DEFAULT_CONFLICT_RETRIES: u32 = 3;

/// Deployment-wide engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maps submission instants onto calendar days.
    pub clock: WorkDayClock,
    /// Largest accepted photo payload, in bytes.
    pub max_photo_bytes: usize,
    /// How many times a conflicting write is retried before giving up.
    pub conflict_retries: u32,
}

impl EngineConfig {
    /// Builds a configuration for the named IANA timezone.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if the timezone is unknown.
    pub fn new(
        timezone: &str,
        max_photo_bytes: usize,
        conflict_retries: u32,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            clock: WorkDayClock::new(timezone)?,
            max_photo_bytes,
            conflict_retries,
        })
    }

    /// The calendar day `at` falls on.
    ///
    /// # Errors
    ///
    /// Returns an error if the instant cannot be mapped onto a date.
    pub fn work_date(&self, at: time::OffsetDateTime) -> Result<time::Date, DomainError> {
        self.clock.work_date(at)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            clock: WorkDayClock::utc(),
            max_photo_bytes: DEFAULT_MAX_PHOTO_BYTES,
            conflict_retries: DEFAULT_CONFLICT_RETRIES,
        }
    }
}
