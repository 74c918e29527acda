use chrono_collision::LayerSelection;
use chrono_common::TemporalMode;

use crate::config::TemporalConfig;

/// Owns which world is active and the layer set each world uses.
///
/// Both layer sets are fixed at level load; the active one is selected by
/// the mode alone, so flipping the mode publishes the new collidable and
/// hazardous sets together.
#[derive(Debug, Clone)]
pub struct TemporalController {
    mode: TemporalMode,
    present: LayerSelection,
    past: LayerSelection,
    config: TemporalConfig,
    cooldown_remaining_ms: u32,
    toggles: u64,
}

impl TemporalController {
    pub fn new(
        initial: TemporalMode,
        present: LayerSelection,
        past: LayerSelection,
        config: TemporalConfig,
    ) -> Self {
        Self {
            mode: initial,
            present,
            past,
            config,
            cooldown_remaining_ms: 0,
            toggles: 0,
        }
    }

    pub fn mode(&self) -> TemporalMode {
        self.mode
    }

    /// Layer set of the current mode.
    pub fn active_selection(&self) -> &LayerSelection {
        match self.mode {
            TemporalMode::Present => &self.present,
            TemporalMode::Past => &self.past,
        }
    }

    /// Count down the toggle cooldown. Called once at the start of each tick.
    pub fn advance(&mut self, dt_ms: u32) {
        self.cooldown_remaining_ms = self.cooldown_remaining_ms.saturating_sub(dt_ms);
    }

    /// Handle one toggle edge. Returns the new mode, or `None` while cooling down.
    pub fn toggle(&mut self) -> Option<TemporalMode> {
        if self.cooldown_remaining_ms > 0 {
            tracing::debug!(
                remaining_ms = self.cooldown_remaining_ms,
                "mode toggle rejected during cooldown"
            );
            return None;
        }
        self.mode = self.mode.toggled();
        self.cooldown_remaining_ms = self.config.toggle_cooldown_ms;
        self.toggles += 1;
        tracing::debug!(mode = %self.mode, "mode toggled");
        Some(self.mode)
    }

    /// Accepted toggles since level start.
    pub fn toggle_count(&self) -> u64 {
        self.toggles
    }

    pub fn on_cooldown(&self) -> bool {
        self.cooldown_remaining_ms > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_common::LayerId;

    fn controller(cooldown_ms: u32) -> TemporalController {
        TemporalController::new(
            TemporalMode::Present,
            LayerSelection::new([LayerId::from("ground"), LayerId::from("bridge")], []),
            LayerSelection::new([LayerId::from("ground")], [LayerId::from("thorns")]),
            TemporalConfig {
                toggle_cooldown_ms: cooldown_ms,
            },
        )
    }

    #[test]
    fn toggle_swaps_both_sets_together() {
        let mut t = controller(0);
        assert!(t.active_selection().is_collidable(&LayerId::from("bridge")));
        assert!(!t.active_selection().is_hazardous(&LayerId::from("thorns")));

        assert_eq!(t.toggle(), Some(TemporalMode::Past));
        assert!(!t.active_selection().is_collidable(&LayerId::from("bridge")));
        assert!(t.active_selection().is_hazardous(&LayerId::from("thorns")));
    }

    #[test]
    fn every_edge_toggles_without_cooldown() {
        let mut t = controller(0);
        assert_eq!(t.toggle(), Some(TemporalMode::Past));
        assert_eq!(t.toggle(), Some(TemporalMode::Present));
        assert_eq!(t.toggle_count(), 2);
    }

    #[test]
    fn cooldown_rejects_until_elapsed() {
        let mut t = controller(100);
        assert_eq!(t.toggle(), Some(TemporalMode::Past));
        assert_eq!(t.toggle(), None);
        t.advance(60);
        assert_eq!(t.toggle(), None);
        t.advance(40);
        assert!(!t.on_cooldown());
        assert_eq!(t.toggle(), Some(TemporalMode::Present));
    }
}
