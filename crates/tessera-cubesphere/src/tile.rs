//! Hierarchical tile identities on the cube-sphere quadtree.

use std::fmt;

use crate::{CubeFace, FaceCoord, TileError, morton_code};

/// Identifies one quadtree node on one cube face.
///
/// - `face`: which of the 6 cube faces the tile belongs to.
/// - `level`: depth in the quadtree. Level 0 is the whole face; each level
///   splits every tile into four.
/// - `x`, `y`: grid position at this level, both in `0..2^level`.
///
/// Fields are private so every value in circulation has passed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId {
    face: CubeFace,
    level: u8,
    x: u32,
    y: u32,
}

/// Packed, injective integer form of a [`TileId`].
///
/// Layout from the most significant bit: face (3 bits), level (5), x (28),
/// y (28). Ordering by key sorts by face, then level, then x, then y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey(pub u64);

const COORD_BITS: u32 = 28;
const COORD_MASK: u64 = (1 << COORD_BITS) - 1;
const LEVEL_SHIFT: u32 = 2 * COORD_BITS;
const FACE_SHIFT: u32 = LEVEL_SHIFT + 5;

impl TileId {
    /// Deepest level whose coordinates fit in a [`TileKey`].
    pub const MAX_LEVEL: u8 = COORD_BITS as u8;

    /// Number of tiles along one axis of a face at `level`.
    #[inline]
    #[must_use]
    pub fn grid_size(level: u8) -> u64 {
        1u64 << level
    }

    /// Build a tile from a face index.
    ///
    /// Fails with [`TileError::InvalidTileIdentity`] when `face >= 6`,
    /// `level > MAX_LEVEL`, or `x`/`y` fall outside `0..2^level`.
    pub fn new(face: u8, level: u8, x: u32, y: u32) -> Result<Self, TileError> {
        let face = CubeFace::try_from(face).map_err(|_| TileError::InvalidTileIdentity {
            face: i64::from(face),
            level: i64::from(level),
            x: i64::from(x),
            y: i64::from(y),
            reason: "face index must be in 0..6",
        })?;
        Self::from_face(face, level, x, y)
    }

    /// Build a tile on a known face.
    pub fn from_face(face: CubeFace, level: u8, x: u32, y: u32) -> Result<Self, TileError> {
        let invalid = |reason| TileError::InvalidTileIdentity {
            face: i64::from(face.index()),
            level: i64::from(level),
            x: i64::from(x),
            y: i64::from(y),
            reason,
        };

        if level > Self::MAX_LEVEL {
            return Err(invalid("level exceeds the maximum supported level"));
        }
        let size = Self::grid_size(level);
        if u64::from(x) >= size {
            return Err(invalid("x must be below 2^level"));
        }
        if u64::from(y) >= size {
            return Err(invalid("y must be below 2^level"));
        }
        Ok(Self { face, level, x, y })
    }

    /// The six level-0 tiles, in face index order.
    #[must_use]
    pub fn root_faces() -> [TileId; 6] {
        CubeFace::ALL.map(|face| TileId {
            face,
            level: 0,
            x: 0,
            y: 0,
        })
    }

    /// The cube face.
    #[inline]
    pub fn face(&self) -> CubeFace {
        self.face
    }

    /// Quadtree depth.
    #[inline]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Grid column.
    #[inline]
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Grid row.
    #[inline]
    pub fn y(&self) -> u32 {
        self.y
    }

    /// The enclosing tile one level up, or `None` for a root face.
    #[must_use]
    pub fn parent(&self) -> Option<TileId> {
        if self.level == 0 {
            return None;
        }
        Some(TileId {
            face: self.face,
            level: self.level - 1,
            x: self.x >> 1,
            y: self.y >> 1,
        })
    }

    /// The four quadrants one level down, ordered
    /// `(2x, 2y), (2x+1, 2y), (2x, 2y+1), (2x+1, 2y+1)`.
    ///
    /// Returns `None` at [`Self::MAX_LEVEL`].
    #[must_use]
    pub fn children(&self) -> Option<[TileId; 4]> {
        if self.level >= Self::MAX_LEVEL {
            return None;
        }
        let level = self.level + 1;
        let (cx, cy) = (self.x << 1, self.y << 1);
        let child = |x, y| TileId {
            face: self.face,
            level,
            x,
            y,
        };
        Some([
            child(cx, cy),
            child(cx + 1, cy),
            child(cx, cy + 1),
            child(cx + 1, cy + 1),
        ])
    }

    /// The ancestor (or self) at `level`, or `None` if `level` is deeper than this tile.
    #[must_use]
    pub fn ancestor_at(&self, level: u8) -> Option<TileId> {
        let shift = self.level.checked_sub(level)?;
        Some(TileId {
            face: self.face,
            level,
            x: self.x >> shift,
            y: self.y >> shift,
        })
    }

    /// The packed key.
    #[inline]
    #[must_use]
    pub fn key(&self) -> TileKey {
        TileKey(
            (u64::from(self.face.index()) << FACE_SHIFT)
                | (u64::from(self.level) << LEVEL_SHIFT)
                | (u64::from(self.x) << COORD_BITS)
                | u64::from(self.y),
        )
    }

    /// Decode a key produced by [`Self::key`], validating it.
    pub fn from_key(key: TileKey) -> Result<Self, TileError> {
        let face = (key.0 >> FACE_SHIFT) as u8;
        let level = ((key.0 >> LEVEL_SHIFT) & 0x1F) as u8;
        let x = ((key.0 >> COORD_BITS) & COORD_MASK) as u32;
        let y = (key.0 & COORD_MASK) as u32;
        Self::new(face, level, x, y)
    }

    /// Morton code of the low 16 bits of `x` and `y`.
    #[must_use]
    pub fn morton(&self) -> u32 {
        morton_code((self.x & 0xFFFF) as u16, (self.y & 0xFFFF) as u16)
    }

    /// UV extent on the face as `(u_min, v_min, u_max, v_max)`, all in \[0, 1\].
    #[must_use]
    pub fn uv_bounds(&self) -> (f64, f64, f64, f64) {
        let size = Self::grid_size(self.level) as f64;
        let u_min = f64::from(self.x) / size;
        let v_min = f64::from(self.y) / size;
        let u_max = f64::from(self.x + 1) / size;
        let v_max = f64::from(self.y + 1) / size;
        (u_min, v_min, u_max, v_max)
    }

    /// The four corners in child order: `(u_min, v_min), (u_max, v_min),
    /// (u_min, v_max), (u_max, v_max)`.
    #[must_use]
    pub fn corner_face_coords(&self) -> [FaceCoord; 4] {
        let (u_min, v_min, u_max, v_max) = self.uv_bounds();
        [
            FaceCoord::new(self.face, u_min, v_min),
            FaceCoord::new(self.face, u_max, v_min),
            FaceCoord::new(self.face, u_min, v_max),
            FaceCoord::new(self.face, u_max, v_max),
        ]
    }

    /// The face coordinate at the tile center.
    #[must_use]
    pub fn center_face_coord(&self) -> FaceCoord {
        let (u_min, v_min, u_max, v_max) = self.uv_bounds();
        FaceCoord::new(self.face, (u_min + u_max) * 0.5, (v_min + v_max) * 0.5)
    }
}

impl TryFrom<[i64; 4]> for TileId {
    type Error = TileError;

    /// Validate signed `[face, level, x, y]` input, rejecting negatives.
    fn try_from([face, level, x, y]: [i64; 4]) -> Result<Self, Self::Error> {
        let invalid = |reason| TileError::InvalidTileIdentity {
            face,
            level,
            x,
            y,
            reason,
        };
        let face = u8::try_from(face).map_err(|_| invalid("face index must be in 0..6"))?;
        let level = u8::try_from(level).map_err(|_| invalid("level must be non-negative"))?;
        let x = u32::try_from(x).map_err(|_| invalid("x must be below 2^level"))?;
        let y = u32::try_from(y).map_err(|_| invalid("y must be below 2^level"))?;
        Self::new(face, level, x, y)
    }
}

impl fmt::Display for TileId {
    /// Canonical string key `face/level/x/y`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}/{}", self.face, self.level, self.x, self.y)
    }
}
