//! LOD manager error types.

use tessera_config::ConfigError;

/// Errors returned by [`crate::QuadtreeManager`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LodError {
    /// The quadtree configuration is out of range.
    #[error("invalid quadtree config: {0}")]
    InvalidConfig(String),

    /// The camera state cannot be used for refinement.
    #[error("invalid camera state: {0}")]
    InvalidCamera(String),
}

impl From<ConfigError> for LodError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(msg) => LodError::InvalidConfig(msg),
            other => LodError::InvalidConfig(other.to_string()),
        }
    }
}
