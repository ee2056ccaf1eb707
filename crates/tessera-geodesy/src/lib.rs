//! Geodetic, ECEF and ENU coordinate math plus a floating-origin anchor.
//!
//! Everything here is `f64`. Positions are only narrowed to `f32` at the
//! hand-off to a single-precision consumer, see [`FloatingOrigin::to_local_f32`].

mod ellipsoid;
mod enu;
mod error;
mod geodetic;
mod origin;

pub use ellipsoid::{Ellipsoid, MAX_ITERATIONS, ecef_to_geodetic, geodetic_to_ecef};
pub use enu::{ecef_to_enu, enu_rotation, enu_to_ecef};
pub use error::GeodesyError;
pub use geodetic::Geodetic;
pub use origin::{DEFAULT_RECENTER_THRESHOLD_M, FloatingOrigin};
