// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinates and great-circle distance.
//!
//! Coordinates travel to the backend as fixed 7-decimal-place strings
//! (sub-centimeter precision, stable wire format); distance math parses
//! them back to degrees on demand.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius in meters, for the haversine formula.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in the backend wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: String,
    pub longitude: String,
}

/// Coordinate string did not parse back to a number.
#[derive(Debug, Error)]
#[error("unparsable coordinate: {0}")]
pub struct GeoParseError(String);

impl Coordinates {
    /// Build from decimal degrees, formatting to 7 decimal places.
    pub fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: format!("{latitude:.7}"),
            longitude: format!("{longitude:.7}"),
        }
    }

    /// Parse back to decimal degrees.
    pub fn to_degrees(&self) -> Result<(f64, f64), GeoParseError> {
        let lat = self
            .latitude
            .parse::<f64>()
            .map_err(|_| GeoParseError(self.latitude.clone()))?;
        let lon = self
            .longitude
            .parse::<f64>()
            .map_err(|_| GeoParseError(self.longitude.clone()))?;
        Ok((lat, lon))
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// One captured device position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSample {
    pub coordinates: Coordinates,
    pub captured_at_ms: u64,
}

/// Great-circle distance between two positions, in meters.
///
/// Returns an error if either coordinate string is unparsable (should
/// only happen with hand-edited persisted data).
pub fn haversine_meters(a: &Coordinates, b: &Coordinates) -> Result<f64, GeoParseError> {
    let (lat1, lon1) = a.to_degrees()?;
    let (lat2, lon2) = b.to_degrees()?;

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    Ok(EARTH_RADIUS_M * c)
}

#[cfg(test)]
#[path = "geo_tests.rs"]
mod tests;
