use std::env;
use std::fs;
use std::path::Path;

use foundation::Coordinate;
use geometry::RingRadius;
use serde::{Deserialize, Serialize};

use crate::collaborators::{DrawToolOptions, PositionOptions, TileLayerConfig};
use crate::style::StylePalette;

/// Center used when the device position is unavailable (Delhi).
pub const FALLBACK_CENTER: Coordinate = Coordinate::new(28.7041, 77.1025);

pub const DEFAULT_INSTRUCTIONS: &str = "Draw squares or polygons encompassing a benzene ring vertex";

/// Path to a JSON config file.
pub const CONFIG_PATH_ENV: &str = "ANNOTATOR_CONFIG";
/// Tile provider access token; overrides the file value.
pub const TILE_TOKEN_ENV: &str = "ANNOTATOR_MAPBOX_TOKEN";

/// What to do when a draw event names a shape the store disagrees about.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyPolicy {
    /// Surface the violation as an error from the event handler.
    Strict,
    /// Log a warning and skip the offending shape.
    Lenient,
}

impl Default for ConsistencyPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ConsistencyPolicy::Strict
        } else {
            ConsistencyPolicy::Lenient
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    pub radius: RingRadius,
    pub vertex_count: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            radius: RingRadius::Kilometers(10.0),
            vertex_count: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub fallback_center: Coordinate,
    pub zoom: u8,
    pub ring: RingConfig,
    pub center_marker_radius_m: f64,
    pub tile_layer: TileLayerConfig,
    pub geolocation: PositionOptions,
    pub styles: StylePalette,
    pub draw_tool: DrawToolOptions,
    pub consistency: ConsistencyPolicy,
    /// Shown once the reference ring is on the map. `None` skips the alert.
    pub instructions: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fallback_center: FALLBACK_CENTER,
            zoom: 11,
            ring: RingConfig::default(),
            center_marker_radius_m: 500.0,
            tile_layer: TileLayerConfig::default(),
            geolocation: PositionOptions::default(),
            styles: StylePalette::default(),
            draw_tool: DrawToolOptions::default(),
            consistency: ConsistencyPolicy::default(),
            instructions: Some(DEFAULT_INSTRUCTIONS.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config read error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "config parse error: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl SessionConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(payload).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let payload =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(format!("{path:?}: {e}")))?;
        Self::from_json_str(&payload)
    }

    /// Defaults, overlaid with the file named by `ANNOTATOR_CONFIG` and the
    /// token in `ANNOTATOR_MAPBOX_TOKEN` when those are set.
    ///
    /// Entry point for embedders; `annotate_replay` loads its config this way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        if let Ok(token) = env::var(TILE_TOKEN_ENV) {
            cfg.tile_layer.access_token = Some(token);
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fallback_center
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("fallback_center: {e}")))?;
        if self.ring.vertex_count < geometry::MIN_RING_VERTICES {
            return Err(ConfigError::Invalid(format!(
                "ring.vertex_count must be at least {}",
                geometry::MIN_RING_VERTICES
            )));
        }
        let radius = match self.ring.radius {
            RingRadius::Degrees(r) | RingRadius::Kilometers(r) => r,
        };
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::Invalid("ring.radius must be positive".to_string()));
        }
        Ok(())
    }
}
