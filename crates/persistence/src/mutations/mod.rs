// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `offices`: office directory upserts
//! - `attendance`: record writes guarded by the version check
//! - `audit`: audit event inserts

pub mod attendance;
pub mod audit;
pub mod offices;

pub use attendance::{PersistedTransition, persist_transition};
