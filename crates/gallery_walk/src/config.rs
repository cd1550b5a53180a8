use core::time::Duration;
use std::path::Path;

use bevy::math::IVec2;
use bevy::prelude::Resource;
use serde::Deserialize;
use thiserror::Error;

use crate::grid::Footprint;

/// Edge of one tile in logical pixels. 11 tiles fit the 360 px card.
pub const TILE_SIZE: f32 = 32.0;
pub const GRID_WIDTH: i32 = 11;
pub const START_TILE: IVec2 = IVec2::new(5, 3);

/// Viewports at or below this width count as mobile.
pub const MOBILE_BREAKPOINT: f32 = 768.0;
pub const MOBILE_ANCHOR: f32 = 0.5;
pub const DESKTOP_ANCHOR: f32 = 0.7;

/// Period of the re-emitted direction while a pad button is held.
pub const REPEAT_PERIOD_MS: u64 = 150;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Tile size must be positive, got {0}")]
    InvalidTileSize(f32),

    #[error("Grid width must be positive, got {0}")]
    InvalidGridWidth(i32),

    #[error("Footprint must be at least one tile, got {width}x{height}")]
    InvalidFootprint { width: i32, height: i32 },

    #[error("{name} anchor must lie in (0, 1), got {value}")]
    AnchorOutOfRange { name: &'static str, value: f32 },

    #[error("Repeat period must be non zero")]
    ZeroRepeatPeriod,

    #[error("Scroll smoothing must be positive, got {0}")]
    InvalidScrollSmoothing(f32),
}

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub tile_size: f32,
    pub grid_width: i32,
    pub footprint: Footprint,
    pub start: IVec2,
    /// Empty rows rendered below the last photo.
    pub extra_bottom_rows: i32,
    pub mobile_breakpoint: f32,
    pub mobile_anchor: f32,
    pub desktop_anchor: f32,
    pub repeat_period_ms: u64,
    /// Rate, per second, at which the camera closes the gap to its scroll target.
    pub scroll_smoothing: f32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            grid_width: GRID_WIDTH,
            footprint: Footprint::PHOTO,
            start: START_TILE,
            extra_bottom_rows: 3,
            mobile_breakpoint: MOBILE_BREAKPOINT,
            mobile_anchor: MOBILE_ANCHOR,
            desktop_anchor: DESKTOP_ANCHOR,
            repeat_period_ms: REPEAT_PERIOD_MS,
            scroll_smoothing: 12.0,
        }
    }
}

impl GalleryConfig {
    /// Parses a JSON override. Missing fields keep their default.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(ConfigError::InvalidTileSize(self.tile_size));
        }
        if self.grid_width <= 0 {
            return Err(ConfigError::InvalidGridWidth(self.grid_width));
        }
        if self.footprint.width <= 0 || self.footprint.height <= 0 {
            return Err(ConfigError::InvalidFootprint {
                width: self.footprint.width,
                height: self.footprint.height,
            });
        }
        for (name, value) in [
            ("Mobile", self.mobile_anchor),
            ("Desktop", self.desktop_anchor),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::AnchorOutOfRange { name, value });
            }
        }
        if self.repeat_period_ms == 0 {
            return Err(ConfigError::ZeroRepeatPeriod);
        }
        if !(self.scroll_smoothing.is_finite() && self.scroll_smoothing > 0.0) {
            return Err(ConfigError::InvalidScrollSmoothing(self.scroll_smoothing));
        }
        Ok(())
    }

    pub const fn repeat_period(&self) -> Duration {
        Duration::from_millis(self.repeat_period_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GalleryConfig::default().validate().is_ok(), "defaults must validate");
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = GalleryConfig::from_json(r#"{ "tile_size": 36.0, "start": [5, 10] }"#)
            .expect("override should parse");

        assert_eq!(config.tile_size, 36.0, "tile size overridden");
        assert_eq!(config.start, IVec2::new(5, 10), "start overridden");
        assert_eq!(config.footprint, Footprint::PHOTO, "footprint kept");
        assert_eq!(config.repeat_period(), Duration::from_millis(150), "period kept");
    }

    #[test]
    fn test_rejects_anchor_outside_viewport() {
        let err = GalleryConfig::from_json(r#"{ "desktop_anchor": 1.5 }"#)
            .expect_err("anchor above 1 is invalid");
        assert!(
            matches!(err, ConfigError::AnchorOutOfRange { name: "Desktop", .. }),
            "unexpected error {err}"
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = GalleryConfig::from_json(r#"{ "tile_size": 0.0 }"#).expect_err("zero tile");
        assert!(matches!(err, ConfigError::InvalidTileSize(_)), "got {err}");

        let err = GalleryConfig::from_json(r#"{ "repeat_period_ms": 0 }"#).expect_err("zero period");
        assert!(matches!(err, ConfigError::ZeroRepeatPeriod), "got {err}");

        let err = GalleryConfig::from_json("{ not json").expect_err("malformed");
        assert!(matches!(err, ConfigError::Parse(_)), "got {err}");
    }
}
