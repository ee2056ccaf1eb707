//! The six cube faces and their orientation in ECEF.

use std::fmt;

use glam::DVec3;

use crate::TileError;

/// One face of the cube that is inflated into the planet sphere.
///
/// The discriminant is the face index used in tile keys. Axes are ECEF, so
/// `PosZ` is the north-pole face and `PosX` is centred on (0°N, 0°E).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CubeFace {
    /// +X face
    PosX = 0,
    /// −X face
    NegX = 1,
    /// +Y face
    PosY = 2,
    /// −Y face
    NegY = 3,
    /// +Z face (north pole)
    PosZ = 4,
    /// −Z face (south pole)
    NegZ = 5,
}

impl CubeFace {
    /// All six faces in index order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    /// Face index in `0..6`.
    #[inline]
    #[must_use]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// The face on the other side of the planet.
    #[must_use]
    pub fn opposite(self) -> CubeFace {
        match self {
            CubeFace::PosX => CubeFace::NegX,
            CubeFace::NegX => CubeFace::PosX,
            CubeFace::PosY => CubeFace::NegY,
            CubeFace::NegY => CubeFace::PosY,
            CubeFace::PosZ => CubeFace::NegZ,
            CubeFace::NegZ => CubeFace::PosZ,
        }
    }

    /// Outward unit normal.
    #[must_use]
    pub fn normal(self) -> DVec3 {
        match self {
            CubeFace::PosX => DVec3::X,
            CubeFace::NegX => DVec3::NEG_X,
            CubeFace::PosY => DVec3::Y,
            CubeFace::NegY => DVec3::NEG_Y,
            CubeFace::PosZ => DVec3::Z,
            CubeFace::NegZ => DVec3::NEG_Z,
        }
    }

    /// Direction of increasing `u` (tile `x`).
    #[must_use]
    pub fn tangent(self) -> DVec3 {
        match self {
            CubeFace::PosX => DVec3::Y,
            CubeFace::NegX => DVec3::NEG_Y,
            CubeFace::PosY => DVec3::NEG_X,
            CubeFace::NegY => DVec3::X,
            CubeFace::PosZ => DVec3::Y,
            CubeFace::NegZ => DVec3::Y,
        }
    }

    /// Direction of increasing `v` (tile `y`).
    ///
    /// Equatorial faces have `v` pointing north.
    #[must_use]
    pub fn bitangent(self) -> DVec3 {
        match self {
            CubeFace::PosX => DVec3::Z,
            CubeFace::NegX => DVec3::Z,
            CubeFace::PosY => DVec3::Z,
            CubeFace::NegY => DVec3::Z,
            CubeFace::PosZ => DVec3::NEG_X,
            CubeFace::NegZ => DVec3::X,
        }
    }
}

impl TryFrom<u8> for CubeFace {
    type Error = TileError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        CubeFace::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(TileError::InvalidTileIdentity {
                face: i64::from(index),
                level: 0,
                x: 0,
                y: 0,
                reason: "face index must be in 0..6",
            })
    }
}

impl fmt::Display for CubeFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}
