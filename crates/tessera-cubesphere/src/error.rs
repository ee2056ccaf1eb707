//! Tile error types.

/// Errors raised when building tile identities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TileError {
    /// Face, level or grid coordinates are out of range. Values are never clamped.
    #[error("invalid tile identity (face {face}, level {level}, x {x}, y {y}): {reason}")]
    InvalidTileIdentity {
        /// Face index as given.
        face: i64,
        /// Level as given.
        level: i64,
        /// Grid column as given.
        x: i64,
        /// Grid row as given.
        y: i64,
        /// Which constraint failed.
        reason: &'static str,
    },
}
