// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

//! The attendance lifecycle and approval engine.
//!
//! [`apply`] is a pure function: given the current record, the office and a
//! [`Command`], it returns the next record and the audit event describing the
//! change, or a typed error. Storage, retries and notification delivery are
//! the caller's concern.

mod apply;
mod bulk;
mod command;
mod config;
mod error;
mod notify;
mod state;

#[cfg(test)]
mod tests;

pub use apply::apply;
pub use bulk::{BulkItem, BulkItemFailure, BulkOutcome, ItemError, fan_out};
pub use command::Command;
pub use config::{DEFAULT_CONFLICT_RETRIES, DEFAULT_MAX_PHOTO_BYTES, EngineConfig};
pub use error::{CoreError, ErrorKind};
pub use notify::{AttendanceEvent, CollectingSink, EventKind, EventSink};
pub use state::{Outcome, TransitionResult};
