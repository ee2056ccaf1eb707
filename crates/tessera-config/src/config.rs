//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Quadtree refinement settings.
    pub quadtree: QuadtreeConfig,
    /// Floating-origin settings.
    pub origin: OriginConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Settings for the cube-sphere quadtree refinement.
///
/// Immutable for the life of a refinement manager: build a new manager to
/// apply a changed config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuadtreeConfig {
    /// Equatorial planet radius in meters.
    pub planet_radius: f64,
    /// Deepest level the traversal may reach.
    pub max_level: u8,
    /// Every visible region is subdivided at least this deep.
    pub min_level: u8,
    /// Screen-space error (pixels) above which a tile is refined.
    pub sse_threshold: f64,
    /// Also prune tiles that lie entirely beyond the planet horizon.
    pub horizon_culling: bool,
}

/// Floating-origin settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OriginConfig {
    /// Local distance (meters) from the anchor that triggers a recenter.
    pub recenter_threshold_m: f64,
    /// Starting anchor latitude in degrees.
    pub start_latitude_deg: f64,
    /// Starting anchor longitude in degrees.
    pub start_longitude_deg: f64,
    /// Starting anchor height above the ellipsoid in meters.
    pub start_height_m: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl QuadtreeConfig {
    /// Deepest level a tile key can encode.
    pub const MAX_SUPPORTED_LEVEL: u8 = 28;

    /// Check the ranges the refinement manager relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.planet_radius.is_finite() || self.planet_radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "planet_radius must be positive and finite, got {}",
                self.planet_radius
            )));
        }
        if !self.sse_threshold.is_finite() || self.sse_threshold <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "sse_threshold must be positive and finite, got {}",
                self.sse_threshold
            )));
        }
        if self.max_level > Self::MAX_SUPPORTED_LEVEL {
            return Err(ConfigError::Invalid(format!(
                "max_level {} exceeds {}",
                self.max_level,
                Self::MAX_SUPPORTED_LEVEL
            )));
        }
        if self.min_level > self.max_level {
            return Err(ConfigError::Invalid(format!(
                "min_level {} is greater than max_level {}",
                self.min_level, self.max_level
            )));
        }
        Ok(())
    }
}

impl OriginConfig {
    /// Starting anchor as `(lat, lon, height)` with angles in radians.
    pub fn start_anchor(&self) -> (f64, f64, f64) {
        (
            self.start_latitude_deg.to_radians(),
            self.start_longitude_deg.to_radians(),
            self.start_height_m,
        )
    }
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            planet_radius: 6_378_137.0,
            max_level: 14,
            min_level: 1,
            sse_threshold: 8.0,
            horizon_culling: false,
        }
    }
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            recenter_threshold_m: 10_000.0,
            start_latitude_deg: 0.0,
            start_longitude_deg: 0.0,
            start_height_m: 0.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for Tessera, e.g. `~/.config/tessera` on Linux.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tessera"))
}

/// File name used inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

impl Config {
    /// Load `config.ron` from `config_dir`, writing the defaults there first
    /// if the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", path.display());
            return Ok(config);
        }

        let config = Self::read_validated(&path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write this config to `config_dir/config.ron`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let text = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE_NAME), text).map_err(ConfigError::WriteError)
    }

    /// Re-read the file. Returns `Some` only when its contents differ from `self`.
    ///
    /// A new quadtree section only takes effect in a newly built manager.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = Self::read_validated(&config_dir.join(CONFIG_FILE_NAME))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Config reloaded with changes");
        Ok(Some(fresh))
    }

    fn read_validated(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = ron::from_str(&text).map_err(ConfigError::ParseError)?;
        config.quadtree.validate()?;
        Ok(config)
    }
}
