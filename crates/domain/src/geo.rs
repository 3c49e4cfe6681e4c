// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Great-circle distance and geofence checks.
//!
//! Distances are computed with the haversine formula on a spherical Earth.
//! Comparisons against a geofence radius always use the full-precision
//! distance; the rounded value exists for display only.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A validated WGS-84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

/// Unchecked wire form of [`GeoPoint`].
#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = DomainError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

impl GeoPoint {
    /// Creates a coordinate, rejecting NaN and out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinate` if latitude is outside
    /// `[-90, 90]`, longitude is outside `[-180, 180]`, or either is not finite.
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::InvalidCoordinate {
                reason: format!("latitude {lat} is outside [-90, 90]"),
            });
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(DomainError::InvalidCoordinate {
                reason: format!("longitude {lng} is outside [-180, 180]"),
            });
        }
        Ok(Self { lat, lng })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance to another point, in meters.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        haversine_m(self.lat, self.lng, other.lat, other.lng)
    }
}

fn haversine_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1: f64 = lat1.to_radians();
    let phi2: f64 = lat2.to_radians();
    let d_phi: f64 = (lat2 - lat1).to_radians();
    let d_lambda: f64 = (lng2 - lng1).to_radians();

    let a: f64 = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Clamp guards against rounding pushing `a` just above 1 for antipodes.
    let c: f64 = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// Computes the haversine distance between two raw coordinates.
///
/// # Errors
///
/// Returns `DomainError::InvalidCoordinate` if any coordinate is invalid.
pub fn distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Result<f64, DomainError> {
    let a: GeoPoint = GeoPoint::new(lat1, lng1)?;
    let b: GeoPoint = GeoPoint::new(lat2, lng2)?;
    Ok(a.distance_to(&b))
}

/// Returns true when `distance` is inside or exactly on the geofence boundary.
#[must_use]
pub fn is_within_radius(distance: f64, radius: f64) -> bool {
    distance <= radius
}

/// Rounds a distance to one decimal meter for display.
#[must_use]
pub fn display_distance(distance: f64) -> f64 {
    (distance * 10.0).round() / 10.0
}

/// A circular zone around an office.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeofence")]
pub struct Geofence {
    center: GeoPoint,
    radius_m: f64,
}

/// Unchecked wire form of [`Geofence`]; the centre validates itself.
#[derive(Deserialize)]
struct RawGeofence {
    center: GeoPoint,
    radius_m: f64,
}

impl TryFrom<RawGeofence> for Geofence {
    type Error = DomainError;

    fn try_from(raw: RawGeofence) -> Result<Self, Self::Error> {
        Self::new(raw.center, raw.radius_m)
    }
}

impl Geofence {
    /// Creates a geofence.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRadius` if the radius is not a positive finite number.
    pub fn new(center: GeoPoint, radius_m: f64) -> Result<Self, DomainError> {
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(DomainError::InvalidRadius {
                reason: format!("{radius_m} must be a positive number of meters"),
            });
        }
        Ok(Self { center, radius_m })
    }

    /// The centre of the zone.
    #[must_use]
    pub const fn center(&self) -> GeoPoint {
        self.center
    }

    /// The radius in meters.
    #[must_use]
    pub const fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Measures a location against this zone.
    #[must_use]
    pub fn measure(&self, location: &GeoPoint) -> GeofenceReading {
        let distance_m: f64 = self.center.distance_to(location);
        GeofenceReading {
            distance_m,
            within_radius: is_within_radius(distance_m, self.radius_m),
        }
    }
}

/// The outcome of measuring a location against a geofence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceReading {
    /// Full-precision distance from the centre, in meters.
    pub distance_m: f64,
    /// Whether the location is inside the radius.
    pub within_radius: bool,
}
