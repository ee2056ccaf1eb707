//! Geodesy error types.

/// Errors produced by the coordinate conversions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeodesyError {
    /// The latitude iteration did not settle within the iteration cap.
    #[error("ECEF to geodetic did not converge after {iterations} iterations (residual {residual:e} rad)")]
    NumericDivergence {
        /// Iterations performed.
        iterations: u32,
        /// Last latitude change in radians (NaN for non-finite input).
        residual: f64,
    },
}
