// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `offices`: office directory lookups
//! - `attendance`: attendance record lookups and read views
//! - `audit`: audit timeline

pub mod attendance;
pub mod audit;
pub mod offices;
