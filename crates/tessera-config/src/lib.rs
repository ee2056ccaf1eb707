//! Configuration for the Tessera terrain LOD core.
//!
//! Settings persist to disk as RON files. Every section falls back to its
//! defaults when missing, so old config files keep loading as fields are added.

mod config;
mod error;

pub use config::{
    CONFIG_FILE_NAME, Config, DebugConfig, OriginConfig, QuadtreeConfig, default_config_dir,
};
pub use error::ConfigError;
