//! Level-of-detail selection for the cube-sphere planet: frustum extraction,
//! camera input, and the screen-space-error quadtree manager.

mod camera;
mod error;
mod frustum;
mod manager;

pub use camera::CameraState;
pub use error::LodError;
pub use frustum::{FrustumPlanes, FrustumSide, Plane};
pub use manager::{LodStats, LodUpdate, QuadtreeManager};
pub use tessera_config::QuadtreeConfig;
