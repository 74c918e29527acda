use chrono_common::Rect;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::MotionConfig;
use crate::jump::JumpState;
use crate::shift::ShiftState;

/// Horizontal speed below which a grounded player counts as standing still.
const IDLE_SPEED_EPSILON: f32 = 1e-3;

/// Derived motion state, used by hosts to pick animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionState {
    Idle,
    Walk,
    Airborne,
    Shift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    #[default]
    Right,
    Left,
}

/// Everything the motion controller mutates each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Top-left corner of the collision rectangle.
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    pub grounded: bool,
    pub facing: Facing,
    pub jump: JumpState,
    pub shift: ShiftState,
}

impl PlayerState {
    pub fn new(position: Vec2, config: &MotionConfig) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size: config.player_size,
            grounded: false,
            facing: Facing::default(),
            jump: JumpState::new(&config.jump),
            shift: ShiftState::new(&config.shift),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    pub fn motion_state(&self) -> MotionState {
        if self.shift.is_active() {
            MotionState::Shift
        } else if !self.grounded {
            MotionState::Airborne
        } else if self.velocity.x.abs() > IDLE_SPEED_EPSILON {
            MotionState::Walk
        } else {
            MotionState::Idle
        }
    }
}
