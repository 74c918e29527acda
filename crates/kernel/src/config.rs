use chrono_motion::{ConfigError, MotionConfig};
use serde::{Deserialize, Serialize};

use crate::level::LevelError;

/// Errors that prevent a session from starting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("invalid motion config: {0}")]
    Motion(#[from] ConfigError),
    #[error("invalid level: {0}")]
    Level(#[from] LevelError),
    #[error("checkpoint radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
}

/// Temporal mode switching tuning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Minimum time between two accepted toggles. 0 disables the cooldown.
    pub toggle_cooldown_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Distance from the player position at which a checkpoint is claimed.
    pub radius: f32,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self { radius: 35.0 }
    }
}

/// All tuning for one play session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub motion: MotionConfig,
    pub temporal: TemporalConfig,
    pub checkpoints: CheckpointConfig,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), SessionError> {
        self.motion.validate()?;
        let radius = self.checkpoints.radius;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SessionError::InvalidRadius(radius));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = SessionConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.checkpoints.radius, 35.0);
        assert_eq!(cfg.temporal.toggle_cooldown_ms, 0);
    }

    #[test]
    fn rejects_zero_radius() {
        let cfg = SessionConfig {
            checkpoints: CheckpointConfig { radius: 0.0 },
            ..SessionConfig::default()
        };
        assert_eq!(cfg.validate(), Err(SessionError::InvalidRadius(0.0)));
    }

    #[test]
    fn motion_errors_are_wrapped() {
        let mut cfg = SessionConfig::default();
        cfg.motion.gravity = -1.0;
        assert!(matches!(cfg.validate(), Err(SessionError::Motion(_))));
    }

    #[test]
    fn nested_partial_config() {
        let cfg: SessionConfig = serde_json::from_str(
            r#"{ "temporal": { "toggle_cooldown_ms": 250 }, "motion": { "gravity": 500.0 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.temporal.toggle_cooldown_ms, 250);
        assert_eq!(cfg.motion.gravity, 500.0);
        assert_eq!(cfg.motion.max_velocity_x, 80.0);
    }
}
