//! Simulation tunables
//!
//! Validated once when a [`WorldFactory`](super::WorldFactory) is built so that
//! height generation can never produce negative or degenerate obstacles.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a [`SimConfig`] is rejected
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("world height {height} leaves no room for obstacles (top range [{min}, {max}] is empty)")]
    EmptyHeightRange { height: f64, min: u32, max: u32 },
    #[error("gap size {gap} too large for world height {height} (max {max})")]
    GapTooLarge { gap: f64, height: f64, max: f64 },
    #[error("pipe width {pipe_width} must be smaller than world width {width}")]
    PipeTooWide { pipe_width: f64, width: f64 },
    #[error("scroll speed must be finite and non-negative, got {0}")]
    BadScrollSpeed(f64),
    #[error("scroll of {per_tick} units per tick must stay below {max} (pitch minus pipe width)")]
    ScrollTooFast { per_tick: f64, max: f64 },
    #[error("air friction must be in [0, 1), got {0}")]
    BadAirFriction(f64),
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },
    #[error("invalid config json: {0}")]
    Json(String),
}

/// Game tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world_width: f64,
    pub world_height: f64,
    pub gap_size: f64,
    pub pipe_width: f64,
    /// Obstacle scroll speed (units/s)
    pub scroll_speed: f64,
    /// Vertical velocity a tap sets (negative is up)
    pub flap_velocity: f64,
    /// Ticks per second
    pub tick_rate: f64,
    /// Downward acceleration (units/s²)
    pub gravity: f64,
    /// Fraction of velocity lost per tick
    pub air_friction: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            gap_size: GAP_SIZE,
            pipe_width: PIPE_WIDTH,
            scroll_speed: SCROLL_SPEED,
            flap_velocity: FLAP_VELOCITY,
            tick_rate: TICK_RATE,
            gravity: GRAVITY,
            air_friction: AIR_FRICTION,
        }
    }
}

impl SimConfig {
    /// Fixed timestep in seconds
    pub fn dt(&self) -> f64 {
        1.0 / self.tick_rate
    }

    /// Horizontal distance between consecutive obstacle pairs
    pub fn pitch(&self) -> f64 {
        self.world_width
    }

    /// Inclusive range the top obstacle height is drawn from
    pub fn top_height_range(&self) -> (u32, u32) {
        let max = (self.world_height / 2.0).floor() as i64 - MIN_PIPE_HEIGHT as i64;
        (MIN_PIPE_HEIGHT, max.max(0) as u32)
    }

    /// Check every invariant the world factory relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("gap_size", self.gap_size),
            ("pipe_width", self.pipe_width),
            ("tick_rate", self.tick_rate),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        for (name, value) in [
            ("flap_velocity", self.flap_velocity),
            ("gravity", self.gravity),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name, value });
            }
        }

        let (min, max) = self.top_height_range();
        if max < min {
            return Err(ConfigError::EmptyHeightRange {
                height: self.world_height,
                min,
                max,
            });
        }

        // Tallest possible top half must still leave MIN_PIPE_HEIGHT for the bottom
        let max_gap = self.world_height - MIN_PIPE_HEIGHT as f64 - max as f64;
        if self.gap_size > max_gap {
            return Err(ConfigError::GapTooLarge {
                gap: self.gap_size,
                height: self.world_height,
                max: max_gap,
            });
        }

        if self.pipe_width >= self.world_width {
            return Err(ConfigError::PipeTooWide {
                pipe_width: self.pipe_width,
                width: self.world_width,
            });
        }
        if !self.scroll_speed.is_finite() || self.scroll_speed < 0.0 {
            return Err(ConfigError::BadScrollSpeed(self.scroll_speed));
        }
        // A pair may only pass the recycle boundary while the other is still on screen
        let per_tick = self.scroll_speed * self.dt();
        let max = self.pitch() - self.pipe_width;
        if per_tick >= max {
            return Err(ConfigError::ScrollTooFast { per_tick, max });
        }
        if !(0.0..1.0).contains(&self.air_friction) {
            return Err(ConfigError::BadAirFriction(self.air_friction));
        }
        Ok(())
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }
}
