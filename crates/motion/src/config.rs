//! Movement tuning.
//!
//! Units are world units (pixels of the source tilemap) and seconds, with
//! the y axis pointing down. Timers are whole milliseconds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Errors from invalid movement tuning.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be non-negative and finite, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("charged jump range is empty: min {min} > max {max}")]
    ChargeRange { min: f32, max: f32 },
    #[error("{field} must be at least 1 ms")]
    ZeroDuration { field: &'static str },
    #[error("jump speed {speed} exceeds max vertical velocity {max_velocity_y}")]
    JumpExceedsClamp { speed: f32, max_velocity_y: f32 },
}

/// How a jump is triggered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JumpModel {
    /// Grounded jump edge sets the vertical speed immediately.
    Instant { speed: f32 },
    /// Holding jump charges the speed from `min_speed` towards `max_speed`
    /// by `increment` every `cadence_ms`; releasing while grounded jumps.
    Charged {
        min_speed: f32,
        max_speed: f32,
        increment: f32,
        cadence_ms: u32,
    },
}

impl JumpModel {
    /// Reference charged jump: 0 to 240 in steps of 20 every 100 ms.
    pub fn charged() -> Self {
        Self::Charged {
            min_speed: 0.0,
            max_speed: 240.0,
            increment: 20.0,
            cadence_ms: 100,
        }
    }

    /// Largest speed this model can ever launch with.
    pub fn peak_speed(&self) -> f32 {
        match self {
            Self::Instant { speed } => *speed,
            Self::Charged { max_speed, .. } => *max_speed,
        }
    }
}

impl Default for JumpModel {
    fn default() -> Self {
        Self::Instant { speed: 120.0 }
    }
}

/// Shift sub-mode tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftConfig {
    pub enabled: bool,
    /// Maximum time the sub-mode lasts before expiring on its own.
    pub duration_ms: u32,
    /// Reach offset (relative to the player's top-left) with no direction held.
    pub reach_neutral: Vec2,
    pub reach_left: Vec2,
    pub reach_right: Vec2,
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 1500,
            reach_neutral: Vec2::new(2.0, 6.0),
            reach_left: Vec2::new(-4.0, 6.0),
            reach_right: Vec2::new(8.0, 6.0),
        }
    }
}

/// Configuration for player motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Size of the player's collision rectangle.
    pub player_size: Vec2,
    /// Horizontal acceleration and deceleration (units/s²).
    pub acceleration: f32,
    /// Horizontal speed cap (units/s).
    pub max_velocity_x: f32,
    /// Downward acceleration (units/s²).
    pub gravity: f32,
    /// Vertical speed cap in either direction (units/s).
    pub max_velocity_y: f32,
    pub jump: JumpModel,
    pub shift: ShiftConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            player_size: Vec2::new(8.0, 12.0),
            acceleration: 200.0,
            max_velocity_x: 80.0,
            gravity: 300.0,
            max_velocity_y: 400.0,
            jump: JumpModel::default(),
            shift: ShiftConfig::default(),
        }
    }
}

impl MotionConfig {
    /// Reject tuning the controller cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("player_size.x", self.player_size.x)?;
        positive("player_size.y", self.player_size.y)?;
        positive("acceleration", self.acceleration)?;
        positive("max_velocity_x", self.max_velocity_x)?;
        non_negative("gravity", self.gravity)?;
        positive("max_velocity_y", self.max_velocity_y)?;

        match &self.jump {
            JumpModel::Instant { speed } => positive("jump.speed", *speed)?,
            JumpModel::Charged {
                min_speed,
                max_speed,
                increment,
                cadence_ms,
            } => {
                non_negative("jump.min_speed", *min_speed)?;
                positive("jump.max_speed", *max_speed)?;
                positive("jump.increment", *increment)?;
                if min_speed > max_speed {
                    return Err(ConfigError::ChargeRange {
                        min: *min_speed,
                        max: *max_speed,
                    });
                }
                if *cadence_ms == 0 {
                    return Err(ConfigError::ZeroDuration {
                        field: "jump.cadence_ms",
                    });
                }
            }
        }
        let peak = self.jump.peak_speed();
        if peak > self.max_velocity_y {
            return Err(ConfigError::JumpExceedsClamp {
                speed: peak,
                max_velocity_y: self.max_velocity_y,
            });
        }

        if self.shift.enabled && self.shift.duration_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "shift.duration_ms",
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
