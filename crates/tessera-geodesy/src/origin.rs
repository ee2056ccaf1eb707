//! Floating-origin anchor for single-precision consumers.
//!
//! Far from the coordinate origin `f32` positions lose precision. A
//! [`FloatingOrigin`] keeps a geodetic anchor near the tracked position and
//! expresses everything in the anchor's ENU frame, so the magnitudes handed to
//! the GPU stay bounded by the recenter threshold wherever the camera is on
//! the planet.

use glam::{DVec3, Vec3};
use tessera_config::OriginConfig;

use crate::{Ellipsoid, GeodesyError, Geodetic};

/// Recenter distance used when no config is supplied.
pub const DEFAULT_RECENTER_THRESHOLD_M: f64 = 10_000.0;

/// A geodetic anchor that defines the local ENU frame.
///
/// Owned by the integration layer (camera or player controller) and passed
/// explicitly to whoever needs local coordinates. After a recenter every
/// previously computed local coordinate is stale; callers must recompute them.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatingOrigin {
    anchor: Geodetic,
    ellipsoid: Ellipsoid,
    recenter_threshold_m: f64,
}

impl FloatingOrigin {
    /// Create an anchor on the WGS84 ellipsoid.
    pub fn new(anchor: Geodetic) -> Self {
        Self::with_ellipsoid(anchor, Ellipsoid::WGS84)
    }

    /// Create an anchor on a custom ellipsoid.
    pub fn with_ellipsoid(anchor: Geodetic, ellipsoid: Ellipsoid) -> Self {
        Self {
            anchor,
            ellipsoid,
            recenter_threshold_m: DEFAULT_RECENTER_THRESHOLD_M,
        }
    }

    /// Anchor at the configured start position on WGS84, using the configured
    /// recenter threshold.
    pub fn from_config(config: &OriginConfig) -> Self {
        let (lat, lon, height) = config.start_anchor();
        Self {
            recenter_threshold_m: config.recenter_threshold_m,
            ..Self::new(Geodetic::new(lat, lon, height))
        }
    }

    /// Distance from the anchor (meters) beyond which [`Self::recenter`] moves it.
    pub fn recenter_threshold(&self) -> f64 {
        self.recenter_threshold_m
    }

    /// Change the distance used by [`Self::recenter`].
    pub fn set_recenter_threshold(&mut self, threshold_m: f64) {
        self.recenter_threshold_m = threshold_m;
    }

    /// The current anchor.
    pub fn anchor(&self) -> Geodetic {
        self.anchor
    }

    /// Force the anchor, e.g. at startup or after a teleport.
    pub fn set_anchor(&mut self, anchor: Geodetic) {
        self.anchor = anchor;
    }

    /// The reference ellipsoid.
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// The anchor's ECEF position.
    pub fn anchor_ecef(&self) -> DVec3 {
        self.ellipsoid.geodetic_to_ecef(&self.anchor)
    }

    /// Geodetic position to anchor-relative ENU meters.
    pub fn to_local(&self, g: &Geodetic) -> DVec3 {
        let ecef = self.ellipsoid.geodetic_to_ecef(g);
        self.ellipsoid.ecef_to_enu(ecef, &self.anchor)
    }

    /// Anchor-relative ENU meters back to a geodetic position.
    pub fn to_geodetic(&self, local: DVec3) -> Result<Geodetic, GeodesyError> {
        let ecef = self.ellipsoid.enu_to_ecef(local, &self.anchor);
        self.ellipsoid.ecef_to_geodetic(ecef)
    }

    /// [`Self::to_local`] narrowed to `f32` for the GPU.
    ///
    /// This is the only place positions leave double precision.
    pub fn to_local_f32(&self, g: &Geodetic) -> Vec3 {
        self.to_local(g).as_vec3()
    }

    /// Move the anchor to `local` if it is farther than `threshold_m` meters away.
    ///
    /// Returns the new anchor when a recenter happened. On a conversion error
    /// the anchor is left unchanged.
    pub fn recenter_if_needed(
        &mut self,
        local: DVec3,
        threshold_m: f64,
    ) -> Result<Option<Geodetic>, GeodesyError> {
        if local.length() <= threshold_m {
            return Ok(None);
        }

        let new_anchor = self.to_geodetic(local)?;
        tracing::debug!(
            from = %self.anchor,
            to = %new_anchor,
            offset_m = local.length(),
            "floating origin recentered"
        );
        self.anchor = new_anchor;
        Ok(Some(new_anchor))
    }
}

impl FloatingOrigin {
    /// [`Self::recenter_if_needed`] with the stored threshold.
    pub fn recenter(&mut self, local: DVec3) -> Result<Option<Geodetic>, GeodesyError> {
        self.recenter_if_needed(local, self.recenter_threshold_m)
    }
}

impl Default for FloatingOrigin {
    fn default() -> Self {
        Self::new(Geodetic::default())
    }
}
