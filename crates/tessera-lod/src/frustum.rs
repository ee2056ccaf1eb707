//! View-frustum planes in double precision.
//!
//! Planes are extracted from the combined view-projection matrix with the
//! Gribb-Hartmann method. The matrix is expected to use zero-to-one clip
//! depth (as produced by `DMat4::perspective_rh`), so the near plane is
//! `row2` and the far plane is `row3 - row2`.

use glam::{DMat4, DVec3, DVec4};

/// Identifies one of the six frustum planes. The discriminant is the plane's
/// index in [`FrustumPlanes::planes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrustumSide {
    Left = 0,
    Right = 1,
    Bottom = 2,
    Top = 3,
    Near = 4,
    Far = 5,
}

impl FrustumSide {
    /// All sides in storage order.
    pub const ALL: [FrustumSide; 6] = [
        FrustumSide::Left,
        FrustumSide::Right,
        FrustumSide::Bottom,
        FrustumSide::Top,
        FrustumSide::Near,
        FrustumSide::Far,
    ];
}

/// A plane `normal · p + d = 0` whose normal points into the frustum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Inward unit normal.
    pub normal: DVec3,
    /// Offset term.
    pub d: f64,
}

impl Plane {
    /// Build a plane from raw coefficients, normalizing the normal.
    ///
    /// A zero normal is left as-is.
    pub fn new(normal: DVec3, d: f64) -> Self {
        Self { normal, d }.normalized()
    }

    fn from_row(row: DVec4) -> Self {
        Self::new(row.truncate(), row.w)
    }

    fn normalized(self) -> Self {
        let len = self.normal.length();
        if len > 0.0 {
            Self {
                normal: self.normal / len,
                d: self.d / len,
            }
        } else {
            self
        }
    }

    /// Signed distance from the plane; positive on the inside.
    #[inline]
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) + self.d
    }

    /// Whether every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.normal.is_finite() && self.d.is_finite()
    }
}

/// The six inward-facing frustum planes in `[Left, Right, Bottom, Top, Near, Far]` order.
#[derive(Clone, Debug, PartialEq)]
pub struct FrustumPlanes {
    planes: [Plane; 6],
}

impl FrustumPlanes {
    /// Extract planes from a combined view-projection matrix.
    pub fn from_matrix(view_projection: &DMat4) -> Self {
        let rows = [
            view_projection.row(0),
            view_projection.row(1),
            view_projection.row(2),
            view_projection.row(3),
        ];

        Self {
            planes: [
                Plane::from_row(rows[3] + rows[0]),
                Plane::from_row(rows[3] - rows[0]),
                Plane::from_row(rows[3] + rows[1]),
                Plane::from_row(rows[3] - rows[1]),
                Plane::from_row(rows[2]),
                Plane::from_row(rows[3] - rows[2]),
            ],
        }
    }

    /// Re-extract in place, reusing this value across frames.
    pub fn update_from_matrix(&mut self, view_projection: &DMat4) {
        *self = Self::from_matrix(view_projection);
    }

    /// Build from explicit planes in `[Left, Right, Bottom, Top, Near, Far]`
    /// order, normalizing each one.
    pub fn from_planes(planes: [Plane; 6]) -> Self {
        Self {
            planes: planes.map(Plane::normalized),
        }
    }

    /// All six planes.
    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    /// The plane on one side.
    pub fn plane(&self, side: FrustumSide) -> &Plane {
        &self.planes[side as usize]
    }

    /// Conservative sphere test: `false` only when the sphere lies entirely
    /// behind at least one plane.
    pub fn intersects_sphere(&self, center: DVec3, radius: f64) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance(center) >= -radius)
    }

    /// Whether `point` is inside or on every plane.
    pub fn contains_point(&self, point: DVec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance(point) >= 0.0)
    }

    /// Whether every plane is finite.
    pub fn is_finite(&self) -> bool {
        self.planes.iter().all(Plane::is_finite)
    }
}
