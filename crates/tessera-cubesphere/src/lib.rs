//! Cube-sphere tiling: faces, quadtree tile identities, tile bounds, and the
//! horizon / screen-space-error tests used to refine them.

mod bounds;
mod cube_face;
mod error;
mod face_coord;
mod horizon;
mod morton;
mod projection;
mod sse;
mod tile;

pub use bounds::{BOUNDS_PADDING, BoundingSphere, direction_to_surface};
pub use cube_face::CubeFace;
pub use error::TileError;
pub use face_coord::FaceCoord;
pub use horizon::{HorizonCuller, is_below_horizon};
pub use morton::{morton_code, morton_decode};
pub use projection::{cube_to_sphere_everitt, face_coord_to_cube_point, face_coord_to_sphere};
pub use sse::{compute_sse, geometric_error};
pub use tile::{TileId, TileKey};
