//! Latitude / longitude / height positions on a reference ellipsoid.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A geodetic position. Angles are in radians, height in meters above the
/// ellipsoid surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Geodetic {
    /// Latitude in radians. Range: \[-π/2, π/2\]. Positive = north.
    pub lat: f64,
    /// Longitude in radians. Range: (-π, π\]. Positive = east.
    pub lon: f64,
    /// Height above the ellipsoid in meters. Negative means below it.
    pub height: f64,
}

impl Geodetic {
    /// Create a geodetic position from radians and meters.
    pub fn new(lat: f64, lon: f64, height: f64) -> Self {
        Self { lat, lon, height }
    }

    /// Create a geodetic position from degrees and meters.
    pub fn from_degrees(lat_deg: f64, lon_deg: f64, height: f64) -> Self {
        Self::new(lat_deg.to_radians(), lon_deg.to_radians(), height)
    }

    /// Return `(lat_deg, lon_deg, height)`.
    pub fn to_degrees(&self) -> (f64, f64, f64) {
        (self.lat.to_degrees(), self.lon.to_degrees(), self.height)
    }

    /// True if all three components are finite.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite() && self.height.is_finite()
    }

    /// Great-circle distance to another position on a sphere of `radius`
    /// meters (haversine). Heights are ignored.
    pub fn surface_distance_to(&self, other: &Geodetic, radius: f64) -> f64 {
        let dlat = other.lat - self.lat;
        let dlon = other.lon - self.lon;

        let a = (dlat / 2.0).sin().powi(2)
            + self.lat.cos() * other.lat.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().min(1.0).asin();

        radius * c
    }
}

impl fmt::Display for Geodetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lat, lon, height) = self.to_degrees();
        let lat_dir = if lat >= 0.0 { "N" } else { "S" };
        let lon_dir = if lon >= 0.0 { "E" } else { "W" };
        write!(
            f,
            "{:.4}\u{00B0}{}, {:.4}\u{00B0}{}, {:.0}m",
            lat.abs(),
            lat_dir,
            lon.abs(),
            lon_dir,
            height,
        )
    }
}
