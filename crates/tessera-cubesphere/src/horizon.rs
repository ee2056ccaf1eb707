//! Horizon culling for a planet centred on the ECEF origin.
//!
//! A tile is hidden when the central angle between the camera and the tile,
//! minus the tile's own angular radius, exceeds the horizon angle seen from
//! the planet center.

use glam::DVec3;

use crate::BoundingSphere;

/// Horizon terms precomputed once per camera position.
#[derive(Clone, Debug)]
pub struct HorizonCuller {
    camera_pos: DVec3,
    radius: f64,
    camera_distance: f64,
    /// Central angle from the sub-camera point to the horizon, `acos(r / d)`.
    /// `None` when the camera is on or inside the planet.
    horizon_angle: Option<f64>,
}

impl HorizonCuller {
    /// Create a culler for a camera at `camera_pos` (ECEF) above a sphere of `radius`.
    pub fn new(camera_pos: DVec3, radius: f64) -> Self {
        let camera_distance = camera_pos.length();
        let horizon_angle =
            (camera_distance > radius).then(|| (radius / camera_distance).clamp(-1.0, 1.0).acos());

        Self {
            camera_pos,
            radius,
            camera_distance,
            horizon_angle,
        }
    }

    /// Returns `true` only when the whole sphere is beyond the horizon.
    ///
    /// Never culls when the camera is on or inside the planet, or when the
    /// sphere reaches the planet center.
    pub fn is_below_horizon(&self, sphere: &BoundingSphere) -> bool {
        let Some(horizon_angle) = self.horizon_angle else {
            return false;
        };

        let sphere_distance = sphere.center.length();
        if sphere.radius >= sphere_distance {
            return false;
        }
        let margin = (sphere.radius / sphere_distance).asin();

        let cos_angle =
            sphere.center.dot(self.camera_pos) / (sphere_distance * self.camera_distance);
        let angle = cos_angle.clamp(-1.0, 1.0).acos();

        angle - margin > horizon_angle
    }

    /// Straight-line distance from the camera to the horizon tangent point.
    pub fn horizon_distance(&self) -> f64 {
        if self.camera_distance <= self.radius {
            return 0.0;
        }
        (self.camera_distance * self.camera_distance - self.radius * self.radius).sqrt()
    }

    /// Camera height above the sphere surface.
    pub fn camera_altitude(&self) -> f64 {
        (self.camera_distance - self.radius).max(0.0)
    }
}

/// One-shot form of [`HorizonCuller::is_below_horizon`].
pub fn is_below_horizon(camera_pos: DVec3, sphere: &BoundingSphere, planet_radius: f64) -> bool {
    HorizonCuller::new(camera_pos, planet_radius).is_below_horizon(sphere)
}
