//! Level description as handed over by the external loader, and its validation.

use chrono_collision::{CollisionLayer, CollisionWorld, LayerError, LayerSelection};
use chrono_common::{LayerId, Rect, TemporalMode};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What a layer does while a given mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerRole {
    /// Ignored by collision and hazard checks.
    #[default]
    Inactive,
    /// Solid cells block, hazardous cells hurt.
    Solid,
    /// Every occupied cell hurts; nothing blocks.
    Hazard,
}

/// Role of a layer in each mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeRoles {
    pub present: LayerRole,
    pub past: LayerRole,
}

impl ModeRoles {
    pub fn role(&self, mode: TemporalMode) -> LayerRole {
        match mode {
            TemporalMode::Present => self.present,
            TemporalMode::Past => self.past,
        }
    }

    /// Solid in one mode only.
    pub fn only(mode: TemporalMode) -> Self {
        let mut roles = Self::default();
        match mode {
            TemporalMode::Present => roles.present = LayerRole::Solid,
            TemporalMode::Past => roles.past = LayerRole::Solid,
        }
        roles
    }

    /// Solid in both modes.
    pub fn both() -> Self {
        Self {
            present: LayerRole::Solid,
            past: LayerRole::Solid,
        }
    }
}

/// One collision layer of the level data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDef {
    pub id: LayerId,
    pub cell_size: f32,
    #[serde(default)]
    pub offset: Vec2,
    /// Row-major grid rows: `.` empty, `#` solid, `^` hazardous.
    pub rows: Vec<String>,
    #[serde(default)]
    pub roles: ModeRoles,
}

/// Parsed level data: geometry, checkpoints, start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    #[serde(default)]
    pub name: String,
    pub start: Vec2,
    #[serde(default)]
    pub initial_mode: TemporalMode,
    pub layers: Vec<LayerDef>,
    /// Checkpoint positions in scan order.
    pub checkpoints: Vec<Vec2>,
}

/// Errors found while validating level data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LevelError {
    #[error(transparent)]
    Layer(#[from] LayerError),
    #[error("level has no collision layers")]
    NoLayers,
    #[error("no collidable layer in {0} mode")]
    NoCollidableLayers(TemporalMode),
    #[error("level has no checkpoints")]
    NoCheckpoints,
    #[error("checkpoint {index} has a non-finite position")]
    InvalidCheckpoint { index: usize },
    #[error("start position must be finite")]
    InvalidStart,
    #[error("start rectangle overlaps solid geometry in {mode} mode")]
    StartEmbedded { mode: TemporalMode },
}

/// A validated level, ready to run.
#[derive(Debug, Clone)]
pub struct Level {
    name: String,
    world: CollisionWorld,
    present: LayerSelection,
    past: LayerSelection,
    checkpoints: Vec<Vec2>,
    start: Vec2,
    initial_mode: TemporalMode,
}

impl Level {
    /// Validate level data and build the collision world and per-mode layer sets.
    pub fn load(def: LevelDef) -> Result<Self, LevelError> {
        if def.layers.is_empty() {
            return Err(LevelError::NoLayers);
        }
        if !def.start.is_finite() {
            return Err(LevelError::InvalidStart);
        }
        if def.checkpoints.is_empty() {
            return Err(LevelError::NoCheckpoints);
        }
        if let Some(index) = def.checkpoints.iter().position(|c| !c.is_finite()) {
            return Err(LevelError::InvalidCheckpoint { index });
        }

        let mut world = CollisionWorld::new();
        for layer in &def.layers {
            world.insert(CollisionLayer::from_rows(
                layer.id.clone(),
                layer.cell_size,
                layer.offset,
                &layer.rows,
            )?)?;
        }

        let present = selection_for(&def.layers, TemporalMode::Present);
        let past = selection_for(&def.layers, TemporalMode::Past);
        for (mode, selection) in [(TemporalMode::Present, &present), (TemporalMode::Past, &past)] {
            if selection.collidable().is_empty() {
                return Err(LevelError::NoCollidableLayers(mode));
            }
        }

        tracing::debug!(
            name = %def.name,
            layers = world.len(),
            checkpoints = def.checkpoints.len(),
            "level loaded"
        );

        Ok(Self {
            name: def.name,
            world,
            present,
            past,
            checkpoints: def.checkpoints,
            start: def.start,
            initial_mode: def.initial_mode,
        })
    }

    /// Reject a start position whose player rectangle is embedded in the initial mode.
    pub fn check_start(&self, player_size: Vec2) -> Result<(), LevelError> {
        let rect = Rect::new(self.start, player_size);
        if self.world.is_solid(&rect, self.selection(self.initial_mode)) {
            return Err(LevelError::StartEmbedded {
                mode: self.initial_mode,
            });
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn world(&self) -> &CollisionWorld {
        &self.world
    }

    /// Layer set participating in collision while `mode` is active.
    pub fn selection(&self, mode: TemporalMode) -> &LayerSelection {
        match mode {
            TemporalMode::Present => &self.present,
            TemporalMode::Past => &self.past,
        }
    }

    pub fn checkpoints(&self) -> &[Vec2] {
        &self.checkpoints
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn initial_mode(&self) -> TemporalMode {
        self.initial_mode
    }
}

fn selection_for(layers: &[LayerDef], mode: TemporalMode) -> LayerSelection {
    LayerSelection::new(
        ids_with_role(layers, mode, LayerRole::Solid),
        ids_with_role(layers, mode, LayerRole::Hazard),
    )
}

fn ids_with_role(layers: &[LayerDef], mode: TemporalMode, role: LayerRole) -> Vec<LayerId> {
    layers
        .iter()
        .filter(|l| l.roles.role(mode) == role)
        .map(|l| l.id.clone())
        .collect()
}
