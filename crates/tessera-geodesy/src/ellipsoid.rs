//! Reference ellipsoid and geodetic <-> ECEF conversion.

use glam::DVec3;

use crate::{GeodesyError, Geodetic};

/// Iteration cap for [`Ellipsoid::ecef_to_geodetic`].
pub const MAX_ITERATIONS: u32 = 20;

/// Latitude change (radians) below which the iteration is considered settled.
const LATITUDE_TOLERANCE: f64 = 1e-12;

/// An oblate ellipsoid of revolution around the ECEF Z axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    /// Equatorial radius `a` in meters.
    pub semi_major_axis: f64,
    /// Flattening `f = (a - b) / a`.
    pub flattening: f64,
}

impl Ellipsoid {
    /// The WGS84 ellipsoid.
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major_axis: 6_378_137.0,
        flattening: 1.0 / 298.257_223_563,
    };

    /// A WGS84-shaped ellipsoid with a different equatorial radius.
    pub fn scaled(semi_major_axis: f64) -> Self {
        Self {
            semi_major_axis,
            flattening: Self::WGS84.flattening,
        }
    }

    /// A perfect sphere.
    pub fn sphere(radius: f64) -> Self {
        Self {
            semi_major_axis: radius,
            flattening: 0.0,
        }
    }

    /// Polar radius `b`.
    #[inline]
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.flattening)
    }

    /// First eccentricity squared, `e² = 2f − f²`.
    #[inline]
    pub fn eccentricity_squared(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    /// Radius of curvature in the prime vertical, `N(lat) = a / sqrt(1 − e²·sin²(lat))`.
    #[inline]
    pub fn prime_vertical_radius(&self, lat: f64) -> f64 {
        let sin_lat = lat.sin();
        self.semi_major_axis / (1.0 - self.eccentricity_squared() * sin_lat * sin_lat).sqrt()
    }

    /// Convert a geodetic position to ECEF meters.
    pub fn geodetic_to_ecef(&self, g: &Geodetic) -> DVec3 {
        let (sin_lat, cos_lat) = g.lat.sin_cos();
        let (sin_lon, cos_lon) = g.lon.sin_cos();
        let n = self.prime_vertical_radius(g.lat);
        let e2 = self.eccentricity_squared();

        DVec3::new(
            (n + g.height) * cos_lat * cos_lon,
            (n + g.height) * cos_lat * sin_lon,
            (n * (1.0 - e2) + g.height) * sin_lat,
        )
    }

    /// Convert an ECEF position to geodetic coordinates.
    ///
    /// Latitude is refined by fixed-point iteration on
    /// `lat = atan2(z + e²·N(lat)·sin(lat), p)` until successive values differ
    /// by less than 1e-12 rad. Fails with [`GeodesyError::NumericDivergence`]
    /// if that takes more than [`MAX_ITERATIONS`] steps or the input is not finite.
    pub fn ecef_to_geodetic(&self, point: DVec3) -> Result<Geodetic, GeodesyError> {
        self.ecef_to_geodetic_capped(point, MAX_ITERATIONS)
    }

    fn ecef_to_geodetic_capped(
        &self,
        point: DVec3,
        max_iterations: u32,
    ) -> Result<Geodetic, GeodesyError> {
        if !point.is_finite() {
            return Err(GeodesyError::NumericDivergence {
                iterations: 0,
                residual: f64::NAN,
            });
        }

        let e2 = self.eccentricity_squared();
        let p = point.x.hypot(point.y);
        let lon = point.y.atan2(point.x);

        // Exact for points on the surface; the loop only corrects for height.
        let mut lat = point.z.atan2(p * (1.0 - e2));
        let mut residual = f64::NAN;

        for _ in 0..max_iterations {
            let n = self.prime_vertical_radius(lat);
            let next = (point.z + e2 * n * lat.sin()).atan2(p);
            residual = (next - lat).abs();
            lat = next;

            if residual < LATITUDE_TOLERANCE {
                let height = self.height_at(lat, p, point.z);
                return Ok(Geodetic::new(lat, lon, height));
            }
        }

        Err(GeodesyError::NumericDivergence {
            iterations: max_iterations,
            residual,
        })
    }

    /// Height above the ellipsoid for a settled latitude.
    fn height_at(&self, lat: f64, p: f64, z: f64) -> f64 {
        let n = self.prime_vertical_radius(lat);
        let (sin_lat, cos_lat) = lat.sin_cos();
        // Divide by the larger of sin/cos to stay well-conditioned near the poles.
        if cos_lat.abs() >= std::f64::consts::FRAC_1_SQRT_2 {
            p / cos_lat - n
        } else {
            z / sin_lat - n * (1.0 - self.eccentricity_squared())
        }
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

/// [`Ellipsoid::geodetic_to_ecef`] on WGS84.
pub fn geodetic_to_ecef(g: &Geodetic) -> DVec3 {
    Ellipsoid::WGS84.geodetic_to_ecef(g)
}

/// [`Ellipsoid::ecef_to_geodetic`] on WGS84.
pub fn ecef_to_geodetic(point: DVec3) -> Result<Geodetic, GeodesyError> {
    Ellipsoid::WGS84.ecef_to_geodetic(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const WGS84_A: f64 = 6_378_137.0;

    #[test]
    fn test_equator_prime_meridian() {
        let ecef = geodetic_to_ecef(&Geodetic::new(0.0, 0.0, 0.0));
        assert!((ecef.x - WGS84_A).abs() < 1e-6);
        assert!(ecef.y.abs() < 1e-6);
        assert!(ecef.z.abs() < 1e-6);
    }

    #[test]
    fn test_north_pole_is_semi_minor_axis() {
        let ecef = geodetic_to_ecef(&Geodetic::new(FRAC_PI_2, 0.0, 0.0));
        let b = Ellipsoid::WGS84.semi_minor_axis();
        assert!(ecef.x.abs() < 1e-6);
        assert!(ecef.y.abs() < 1e-6);
        assert!((ecef.z - b).abs() < 1e-6, "z={} b={b}", ecef.z);
    }

    #[test]
    fn test_known_point_london() {
        let ecef = geodetic_to_ecef(&Geodetic::from_degrees(51.5074, -0.1278, 0.0));
        assert!((ecef.x - 3_978_000.0).abs() < 1000.0);
        assert!((ecef.y + 8_700.0).abs() < 1000.0);
        assert!((ecef.z - 4_968_000.0).abs() < 1000.0);
    }

    #[test]
    fn test_height_adds_along_normal_at_equator() {
        let ground = geodetic_to_ecef(&Geodetic::new(0.0, 0.0, 0.0));
        let high = geodetic_to_ecef(&Geodetic::new(0.0, 0.0, 1000.0));
        assert!((high.x - ground.x - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_geodetic_ecef_roundtrip() {
        let eps = 1e-3;
        let lat_steps = 24;
        let lon_steps = 16;
        for i in 0..=lat_steps {
            let lat = -FRAC_PI_2 + eps + (PI - 2.0 * eps) * (i as f64 / lat_steps as f64);
            for j in 0..lon_steps {
                let lon = -PI + 2.0 * PI * ((j as f64 + 0.5) / lon_steps as f64);
                for &height in &[-400.0, 0.0, 8_848.0, 120_000.0] {
                    let g = Geodetic::new(lat, lon, height);
                    let back = ecef_to_geodetic(geodetic_to_ecef(&g)).unwrap();
                    assert!(
                        (back.lat - lat).abs() < 1e-9,
                        "lat mismatch at {g:?}: got {}",
                        back.lat
                    );
                    assert!(
                        (back.lon - lon).abs() < 1e-9,
                        "lon mismatch at {g:?}: got {}",
                        back.lon
                    );
                    assert!(
                        (back.height - height).abs() < 1e-6,
                        "height mismatch at {g:?}: got {}",
                        back.height
                    );
                }
            }
        }
    }

    #[test]
    fn test_pole_converges() {
        let b = Ellipsoid::WGS84.semi_minor_axis();
        let g = ecef_to_geodetic(DVec3::new(0.0, 0.0, b + 500.0)).unwrap();
        assert!((g.lat - FRAC_PI_2).abs() < 1e-12);
        assert!((g.height - 500.0).abs() < 1e-6, "height={}", g.height);
    }

    #[test]
    fn test_orbital_altitude_converges() {
        let g = Geodetic::from_degrees(37.0, -122.0, 2_000_000.0);
        let back = ecef_to_geodetic(geodetic_to_ecef(&g)).unwrap();
        assert!((back.lat - g.lat).abs() < 1e-9);
        assert!((back.height - g.height).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_input_is_divergence() {
        for p in [
            DVec3::new(f64::NAN, 0.0, 0.0),
            DVec3::new(0.0, f64::INFINITY, 0.0),
        ] {
            let err = ecef_to_geodetic(p).unwrap_err();
            assert!(matches!(err, GeodesyError::NumericDivergence { .. }));
        }
    }

    #[test]
    fn test_iteration_cap_reports_divergence() {
        // High above the surface the first step still moves latitude by far
        // more than the tolerance.
        let point = Ellipsoid::WGS84.geodetic_to_ecef(&Geodetic::from_degrees(45.0, 10.0, 2.0e7));
        let err = Ellipsoid::WGS84
            .ecef_to_geodetic_capped(point, 1)
            .unwrap_err();
        match err {
            GeodesyError::NumericDivergence { iterations, residual } => {
                assert_eq!(iterations, 1);
                assert!(
                    residual >= LATITUDE_TOLERANCE,
                    "residual {residual:e} should be above tolerance"
                );
            }
        }
        assert!(Ellipsoid::WGS84.ecef_to_geodetic_capped(point, MAX_ITERATIONS).is_ok());
    }

    #[test]
    fn test_sphere_matches_spherical_formula() {
        let sphere = Ellipsoid::sphere(1000.0);
        let g = Geodetic::from_degrees(30.0, 60.0, 0.0);
        let p = sphere.geodetic_to_ecef(&g);
        assert!((p.length() - 1000.0).abs() < 1e-9);
        assert!((p.z - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_scaled_keeps_flattening() {
        let e = Ellipsoid::scaled(3_000_000.0);
        assert_eq!(e.flattening, Ellipsoid::WGS84.flattening);
        assert_eq!(e.semi_major_axis, 3_000_000.0);
        assert!(e.semi_minor_axis() < e.semi_major_axis);
    }
}
