//! East-North-Up local tangent frames.
//!
//! The ENU frame at an anchor has its origin at the anchor's ECEF position,
//! `+x` pointing east, `+y` north and `+z` along the ellipsoid normal.

use glam::{DMat3, DVec3};

use crate::{Ellipsoid, Geodetic};

/// Rotation taking ENU vectors to ECEF vectors at `anchor`.
///
/// The columns are the East, North and Up unit vectors expressed in ECEF.
/// The transpose takes ECEF deltas to ENU.
pub fn enu_rotation(anchor: &Geodetic) -> DMat3 {
    let (sin_lat, cos_lat) = anchor.lat.sin_cos();
    let (sin_lon, cos_lon) = anchor.lon.sin_cos();

    let east = DVec3::new(-sin_lon, cos_lon, 0.0);
    let north = DVec3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
    let up = DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);

    DMat3::from_cols(east, north, up)
}

impl Ellipsoid {
    /// Express an ECEF point in the ENU frame of `anchor`.
    pub fn ecef_to_enu(&self, point: DVec3, anchor: &Geodetic) -> DVec3 {
        let origin = self.geodetic_to_ecef(anchor);
        enu_rotation(anchor).transpose() * (point - origin)
    }

    /// Inverse of [`Ellipsoid::ecef_to_enu`].
    pub fn enu_to_ecef(&self, enu: DVec3, anchor: &Geodetic) -> DVec3 {
        let origin = self.geodetic_to_ecef(anchor);
        origin + enu_rotation(anchor) * enu
    }
}

/// [`Ellipsoid::ecef_to_enu`] on WGS84.
pub fn ecef_to_enu(point: DVec3, anchor: &Geodetic) -> DVec3 {
    Ellipsoid::WGS84.ecef_to_enu(point, anchor)
}

/// [`Ellipsoid::enu_to_ecef`] on WGS84.
pub fn enu_to_ecef(enu: DVec3, anchor: &Geodetic) -> DVec3 {
    Ellipsoid::WGS84.enu_to_ecef(enu, anchor)
}
