use chrono_collision::HazardContact;
use chrono_motion::PlayerController;
use glam::Vec2;

use crate::checkpoint::CheckpointRegistry;

/// Outcome of a hazard contact.
#[derive(Debug, Clone, PartialEq)]
pub struct Respawn {
    pub position: Vec2,
    pub hazard: HazardContact,
}

/// Moves the player back to the respawn point after a hazard contact.
#[derive(Debug, Clone, Default)]
pub struct RespawnCoordinator {
    respawns: u64,
}

impl RespawnCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Teleport to the current respawn point and clear all motion.
    pub fn on_hazard_contact(
        &mut self,
        player: &mut PlayerController,
        registry: &CheckpointRegistry,
        hazard: HazardContact,
    ) -> Respawn {
        let position = registry.respawn_point();
        player.respawn_at(position);
        self.respawns += 1;
        tracing::info!(
            layer = %hazard.layer,
            x = position.x,
            y = position.y,
            count = self.respawns,
            "player respawned"
        );
        Respawn { position, hazard }
    }

    pub fn respawn_count(&self) -> u64 {
        self.respawns
    }
}
