//! Screen-space error metric used to drive refinement.

use std::f64::consts::PI;

/// Geometric error of a tile at `level`: a quarter of the face arc at level
/// 0, halving with each level.
#[inline]
#[must_use]
pub fn geometric_error(level: u8, planet_radius: f64) -> f64 {
    PI * planet_radius / 2f64.powi(i32::from(level) + 1)
}

/// Project `geometric_error` at `distance` onto a screen `screen_height` pixels tall.
#[inline]
#[must_use]
pub fn compute_sse(geometric_error: f64, distance: f64, screen_height: f64) -> f64 {
    geometric_error / distance * screen_height
}
