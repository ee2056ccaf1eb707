//! 2D parametric coordinates on a cube face.

use crate::CubeFace;

/// A point on a cube face. `u` and `v` are in \[0, 1\], with `(0, 0)` at the
/// corner reached by moving against the face tangent and bitangent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceCoord {
    /// Which cube face this coordinate lies on.
    pub face: CubeFace,
    /// Parameter along [`CubeFace::tangent`].
    pub u: f64,
    /// Parameter along [`CubeFace::bitangent`].
    pub v: f64,
}

impl FaceCoord {
    /// Construct a `FaceCoord`, clamping `u` and `v` to \[0, 1\].
    #[must_use]
    pub fn new(face: CubeFace, u: f64, v: f64) -> Self {
        Self {
            face,
            u: u.clamp(0.0, 1.0),
            v: v.clamp(0.0, 1.0),
        }
    }
}
