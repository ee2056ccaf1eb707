//! Per-frame camera input to the refinement manager.

use glam::{DMat4, DVec3};

use crate::{FrustumPlanes, LodError};

/// Camera state for one LOD update.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraState {
    /// Camera position in ECEF meters.
    pub position: DVec3,
    /// Viewport height in pixels, used to project geometric error.
    pub screen_height: f64,
    /// View frustum in ECEF.
    pub frustum: FrustumPlanes,
}

impl CameraState {
    /// Build a camera state, extracting the frustum from an ECEF view-projection matrix.
    pub fn from_view_projection(
        position: DVec3,
        screen_height: f64,
        view_projection: &DMat4,
    ) -> Self {
        Self {
            position,
            screen_height,
            frustum: FrustumPlanes::from_matrix(view_projection),
        }
    }

    /// Reject input that would poison distance or error computations.
    pub fn validate(&self) -> Result<(), LodError> {
        if !self.position.is_finite() {
            return Err(LodError::InvalidCamera(format!(
                "position must be finite, got {}",
                self.position
            )));
        }
        if !self.screen_height.is_finite() || self.screen_height <= 0.0 {
            return Err(LodError::InvalidCamera(format!(
                "screen_height must be positive and finite, got {}",
                self.screen_height
            )));
        }
        if !self.frustum.is_finite() {
            return Err(LodError::InvalidCamera(
                "frustum planes must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
