use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A checkpoint of the level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub position: Vec2,
    pub consumed: bool,
}

/// Reference to a checkpoint that was just claimed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckpointRef {
    /// Index in level scan order.
    pub index: usize,
    pub position: Vec2,
}

/// Tracks which checkpoints are pending and which one is the respawn point.
#[derive(Debug, Clone)]
pub struct CheckpointRegistry {
    checkpoints: Vec<Checkpoint>,
    level_start: Vec2,
    radius: f32,
    current: Option<usize>,
    completion_signalled: bool,
}

impl CheckpointRegistry {
    pub fn new(positions: &[Vec2], level_start: Vec2, radius: f32) -> Self {
        Self {
            checkpoints: positions
                .iter()
                .map(|&position| Checkpoint {
                    position,
                    consumed: false,
                })
                .collect(),
            level_start,
            radius,
            current: None,
            completion_signalled: false,
        }
    }

    /// Claim the nearest pending checkpoint within the radius of `player`.
    ///
    /// Ties in distance go to the earlier checkpoint in scan order.
    pub fn check_proximity(&mut self, player: Vec2) -> Option<CheckpointRef> {
        let mut nearest: Option<(usize, f32)> = None;
        for (index, cp) in self.checkpoints.iter().enumerate() {
            if cp.consumed {
                continue;
            }
            let distance = cp.position.distance(player);
            if distance < self.radius && nearest.is_none_or(|(_, d)| distance < d) {
                nearest = Some((index, distance));
            }
        }
        let (index, _) = nearest?;
        self.consume(index);
        Some(CheckpointRef {
            index,
            position: self.checkpoints[index].position,
        })
    }

    /// Returns `true` exactly once: the first call after the pending set empties.
    pub fn take_completion(&mut self) -> bool {
        if self.completion_signalled || self.pending_count() > 0 {
            return false;
        }
        self.completion_signalled = true;
        tracing::info!(checkpoints = self.checkpoints.len(), "level completed");
        true
    }

    /// Most recently claimed checkpoint, or the level start.
    pub fn respawn_point(&self) -> Vec2 {
        self.current
            .map(|i| self.checkpoints[i].position)
            .unwrap_or(self.level_start)
    }

    pub fn current(&self) -> Option<CheckpointRef> {
        self.current.map(|index| CheckpointRef {
            index,
            position: self.checkpoints[index].position,
        })
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn pending_count(&self) -> usize {
        self.checkpoints.iter().filter(|c| !c.consumed).count()
    }

    pub fn consumed_count(&self) -> usize {
        self.checkpoints.len() - self.pending_count()
    }

    pub fn is_complete(&self) -> bool {
        self.completion_signalled
    }

    fn consume(&mut self, index: usize) {
        let cp = &mut self.checkpoints[index];
        if cp.consumed {
            tracing::error!(index, "checkpoint consumed twice");
            debug_assert!(!cp.consumed, "checkpoint {index} consumed twice");
            return;
        }
        cp.consumed = true;
        self.current = Some(index);
        tracing::info!(index, x = cp.position.x, y = cp.position.y, "checkpoint reached");
    }
}
