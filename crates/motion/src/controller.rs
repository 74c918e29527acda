//! Player movement controller.
//!
//! Per tick: sub-state timers, horizontal acceleration, gravity, jump,
//! velocity clamp, then collision resolution against the active layers.

use chrono_collision::{CollisionWorld, ContactFlags, LayerSelection};
use chrono_common::Rect;
use chrono_input::InputFrame;
use glam::Vec2;

use crate::config::MotionConfig;
use crate::state::{Facing, PlayerState};

/// Player movement controller.
///
/// Owns the [`PlayerState`] for the lifetime of a level. The only way to move
/// the player other than [`PlayerController::update`] is
/// [`PlayerController::respawn_at`].
#[derive(Debug, Clone)]
pub struct PlayerController {
    config: MotionConfig,
    state: PlayerState,
}

impl PlayerController {
    pub fn new(config: MotionConfig, spawn: Vec2) -> Self {
        let state = PlayerState::new(spawn, &config);
        Self { config, state }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn rect(&self) -> Rect {
        self.state.rect()
    }

    /// Advance the player by one tick of `dt_ms` milliseconds.
    pub fn update(
        &mut self,
        input: &InputFrame,
        dt_ms: u32,
        world: &CollisionWorld,
        selection: &LayerSelection,
    ) -> ContactFlags {
        let dt = dt_ms as f32 / 1000.0;
        let cfg = &self.config;
        let state = &mut self.state;

        state.shift.update(&cfg.shift, input, state.grounded, dt_ms);
        let shifting = state.shift.is_active();

        // While shifting, horizontal input steers the reach offset instead.
        let direction = if shifting { 0 } else { input.horizontal() };
        match direction {
            -1 => state.facing = Facing::Left,
            1 => state.facing = Facing::Right,
            _ => {}
        }
        state.velocity.x = approach(
            state.velocity.x,
            direction,
            cfg.acceleration * dt,
            cfg.max_velocity_x,
        );

        if shifting {
            state.velocity.y = 0.0;
        } else {
            state.velocity.y += cfg.gravity * dt;
        }

        if let Some(speed) = state.jump.update(&cfg.jump, input, state.grounded, dt_ms) {
            tracing::trace!(speed, "jump");
            state.velocity.y = -speed;
        }

        state.velocity.x = state.velocity.x.clamp(-cfg.max_velocity_x, cfg.max_velocity_x);
        state.velocity.y = state.velocity.y.clamp(-cfg.max_velocity_y, cfg.max_velocity_y);

        let resolution = world.resolve_collision(state.rect(), state.velocity, dt, selection);
        state.position = resolution.rect.position;
        state.velocity = resolution.velocity;
        state.grounded = resolution.contacts.down;
        state.jump.touch_ground(state.grounded);

        resolution.contacts
    }

    /// Teleport to `position` with all motion cleared.
    pub fn respawn_at(&mut self, position: Vec2) {
        self.state.position = position;
        self.state.velocity = Vec2::ZERO;
        self.state.grounded = false;
        self.state.jump.reset(&self.config.jump);
        self.state.shift.reset(&self.config.shift);
    }

    /// Replace the position after an out-of-band correction (depenetration).
    pub fn correct_position(&mut self, position: Vec2) {
        self.state.position = position;
    }
}

/// Slack for accumulated rounding in `approach`, in units/s.
const SPEED_SNAP: f32 = 1e-3;

/// Move `v` towards `direction * max` by `step`, or towards zero without
/// overshooting when `direction` is 0. Lands exactly on the target once the
/// remaining gap fits in one step.
fn approach(v: f32, direction: i8, step: f32, max: f32) -> f32 {
    let target = match direction {
        1 => max,
        -1 => -max,
        _ => 0.0,
    };
    let gap = target - v;
    if gap.abs() <= step + SPEED_SNAP {
        target
    } else {
        v + step.copysign(gap)
    }
}
