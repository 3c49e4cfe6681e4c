// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::geo::{GeoPoint, Geofence};

fn validate_identifier(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidIdentifier {
            field,
            reason: String::from("must not be empty"),
        });
    }
    if trimmed.len() > 64 {
        return Err(DomainError::InvalidIdentifier {
            field,
            reason: format!("must be at most 64 characters, got {}", trimmed.len()),
        });
    }
    Ok(trimmed.to_string())
}

/// Identifies a field officer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfficerId(String);

impl OfficerId {
    /// Creates an officer identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is blank or longer than 64 characters.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        validate_identifier("officer_id", value).map(Self)
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OfficerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies an office and its geofence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfficeId(String);

impl OfficeId {
    /// Creates an office identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is blank or longer than 64 characters.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        validate_identifier("office_id", value).map(Self)
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OfficeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque photo payload or storage reference produced by the capture layer.
///
/// The engine never decodes it; it only enforces that it is present and bounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl PhotoRef {
    /// Creates a photo reference no larger than `max_bytes`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPhoto` if the payload is empty or too large.
    pub fn new(value: String, max_bytes: usize) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::InvalidPhoto {
                reason: String::from("photo payload is empty"),
            });
        }
        if value.len() > max_bytes {
            return Err(DomainError::InvalidPhoto {
                reason: format!(
                    "photo payload is {} bytes, limit is {max_bytes}",
                    value.len()
                ),
            });
        }
        Ok(Self(value))
    }

    /// Returns the raw payload or reference.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// An office and its geofence. Read-only input to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Office {
    /// The office identifier.
    pub office_id: OfficeId,
    /// Display name.
    pub name: String,
    /// The check-in zone.
    pub geofence: Geofence,
    /// Whether the office currently accepts check-ins.
    pub is_active: bool,
    /// Supervisors responsible for approving attendance at this office.
    pub supervisor_ids: Vec<String>,
}

impl Office {
    /// Creates an office.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate or radius is invalid.
    pub fn new(
        office_id: OfficeId,
        name: String,
        location: (f64, f64),
        radius_m: f64,
        is_active: bool,
        supervisor_ids: Vec<String>,
    ) -> Result<Self, DomainError> {
        let center: GeoPoint = GeoPoint::new(location.0, location.1)?;
        let geofence: Geofence = Geofence::new(center, radius_m)?;
        Ok(Self {
            office_id,
            name,
            geofence,
            is_active,
            supervisor_ids,
        })
    }

    /// Returns true if the given supervisor is responsible for this office.
    #[must_use]
    pub fn is_supervised_by(&self, supervisor_id: &str) -> bool {
        self.supervisor_ids.iter().any(|s| s == supervisor_id)
    }
}
