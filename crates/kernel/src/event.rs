use chrono_common::{LayerId, TemporalMode};
use chrono_motion::{Facing, MotionState};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Something that happened during a tick, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FrameEvent {
    ModeToggled {
        mode: TemporalMode,
    },
    CheckpointReached {
        index: usize,
        position: Vec2,
    },
    /// The player touched a hazard and was moved to the respawn point.
    Respawned {
        position: Vec2,
        layer: LayerId,
        contact: Vec2,
    },
    LevelCompleted,
}

/// Read-only view of the simulation published after each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub position: Vec2,
    pub velocity: Vec2,
    pub mode: TemporalMode,
    pub grounded: bool,
    pub motion_state: MotionState,
    pub facing: Facing,
    pub shift_active: bool,
    pub reach_offset: Vec2,
    /// Current charged-jump speed; 0 for the instant model.
    pub jump_charge: f32,
    pub events: Vec<FrameEvent>,
}

impl FrameSnapshot {
    pub fn has_event(&self, pred: impl Fn(&FrameEvent) -> bool) -> bool {
        self.events.iter().any(pred)
    }

    pub fn respawned(&self) -> bool {
        self.has_event(|e| matches!(e, FrameEvent::Respawned { .. }))
    }
}
