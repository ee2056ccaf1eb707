//! Tile bounding volumes for frustum and horizon culling.

use glam::DVec3;
use tessera_geodesy::{Ellipsoid, Geodetic};

use crate::{TileId, face_coord_to_sphere};

/// Scale applied to the farthest corner distance so the sphere also covers
/// the curved surface between corners.
pub const BOUNDS_PADDING: f64 = 1.5;

/// A bounding sphere in ECEF meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    /// Center of the sphere.
    pub center: DVec3,
    /// Radius of the sphere.
    pub radius: f64,
}

/// Place a unit direction from the planet center on the ellipsoid surface.
///
/// The direction is read as latitude `asin(z)` and longitude `atan2(y, x)`.
#[must_use]
pub fn direction_to_surface(dir: DVec3, ellipsoid: &Ellipsoid) -> DVec3 {
    let lat = dir.z.clamp(-1.0, 1.0).asin();
    let lon = dir.y.atan2(dir.x);
    ellipsoid.geodetic_to_ecef(&Geodetic::new(lat, lon, 0.0))
}

impl BoundingSphere {
    /// Compute the bounding sphere for a tile.
    ///
    /// Each of the four corners is projected with the Everitt mapping and
    /// placed on the ellipsoid. The center is their average and the radius is
    /// [`BOUNDS_PADDING`] times the farthest corner. Pure: the same tile and
    /// ellipsoid always give bit-identical output.
    #[must_use]
    pub fn from_tile(tile: &TileId, ellipsoid: &Ellipsoid) -> Self {
        let corners = tile
            .corner_face_coords()
            .map(|fc| direction_to_surface(face_coord_to_sphere(&fc), ellipsoid));

        let center = (corners[0] + corners[1] + corners[2] + corners[3]) * 0.25;

        let max_dist = corners
            .iter()
            .map(|c| c.distance(center))
            .fold(0.0_f64, f64::max);

        Self {
            center,
            radius: max_dist * BOUNDS_PADDING,
        }
    }

    /// Whether `point` lies inside or on the sphere.
    #[inline]
    pub fn contains(&self, point: DVec3) -> bool {
        point.distance_squared(self.center) <= self.radius * self.radius
    }

    /// Distance from `point` to the sphere surface, zero when inside.
    #[inline]
    pub fn surface_distance(&self, point: DVec3) -> f64 {
        (point.distance(self.center) - self.radius).max(0.0)
    }
}
