use std::collections::{BTreeMap, BTreeSet};

use chrono_common::{LayerId, Rect};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::layer::{Cell, CollisionLayer, LayerError, OVERLAP_EPSILON};

/// How far below the feet a resting rectangle probes for ground.
const GROUND_PROBE: f32 = OVERLAP_EPSILON * 4.0;

/// Upper bound on push-out iterations per direction when depenetrating.
const MAX_PUSH_ITERATIONS: usize = 64;

/// The layers participating in collision and hazard checks for one query.
///
/// Layers in `collidable` block movement with their solid cells and hurt with
/// their hazardous cells. Layers in `hazardous` never block; every occupied
/// cell in them hurts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSelection {
    collidable: BTreeSet<LayerId>,
    hazardous: BTreeSet<LayerId>,
}

impl LayerSelection {
    pub fn new(
        collidable: impl IntoIterator<Item = LayerId>,
        hazardous: impl IntoIterator<Item = LayerId>,
    ) -> Self {
        Self {
            collidable: collidable.into_iter().collect(),
            hazardous: hazardous.into_iter().collect(),
        }
    }

    pub fn collidable(&self) -> &BTreeSet<LayerId> {
        &self.collidable
    }

    pub fn hazardous(&self) -> &BTreeSet<LayerId> {
        &self.hazardous
    }

    pub fn is_collidable(&self, id: &LayerId) -> bool {
        self.collidable.contains(id)
    }

    pub fn is_hazardous(&self, id: &LayerId) -> bool {
        self.hazardous.contains(id)
    }

    /// Whether the layer participates in this selection at all.
    pub fn contains(&self, id: &LayerId) -> bool {
        self.is_collidable(id) || self.is_hazardous(id)
    }
}

/// Which sides of the rectangle were blocked during resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFlags {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Output of [`CollisionWorld::resolve_collision`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub rect: Rect,
    pub velocity: Vec2,
    pub contacts: ContactFlags,
}

/// Overlap between a rectangle and a hazardous cell.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardContact {
    pub layer: LayerId,
    /// Centre of the overlap region in world space.
    pub point: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn unit(self, amount: f32) -> Vec2 {
        match self {
            Self::X => Vec2::new(amount, 0.0),
            Self::Y => Vec2::new(0.0, amount),
        }
    }
}

/// Registry of every collision layer of a level.
///
/// Iteration is in `LayerId` order so queries are deterministic.
#[derive(Debug, Clone, Default)]
pub struct CollisionWorld {
    layers: BTreeMap<LayerId, CollisionLayer>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layer. Ids must be unique.
    pub fn insert(&mut self, layer: CollisionLayer) -> Result<(), LayerError> {
        if self.layers.contains_key(layer.id()) {
            return Err(LayerError::Duplicate(layer.id().clone()));
        }
        self.layers.insert(layer.id().clone(), layer);
        Ok(())
    }

    pub fn get(&self, id: &LayerId) -> Option<&CollisionLayer> {
        self.layers.get(id)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> impl Iterator<Item = &CollisionLayer> {
        self.layers.values()
    }

    /// Whether `rect` penetrates a solid cell of a collidable layer.
    pub fn is_solid(&self, rect: &Rect, selection: &LayerSelection) -> bool {
        !self.solid_cells(rect, selection).is_empty()
    }

    /// Whether `rect` penetrates a hazardous cell of the selection.
    pub fn is_hazardous(&self, rect: &Rect, selection: &LayerSelection) -> bool {
        self.hazard_contact(rect, selection).is_some()
    }

    /// First hazardous overlap, scanning layers in id order.
    pub fn hazard_contact(&self, rect: &Rect, selection: &LayerSelection) -> Option<HazardContact> {
        for layer in self.layers.values() {
            let any_occupied = selection.is_hazardous(layer.id());
            if !any_occupied && !selection.is_collidable(layer.id()) {
                continue;
            }
            let hit = layer
                .occupied_overlapping(rect)
                .into_iter()
                .find(|(_, cell)| any_occupied || *cell == Cell::Hazard);
            if let Some((coord, _)) = hit {
                let cell = layer.cell_rect(coord);
                let min = rect.position.max(cell.position);
                let max = Vec2::new(rect.right().min(cell.right()), rect.bottom().min(cell.bottom()));
                return Some(HazardContact {
                    layer: layer.id().clone(),
                    point: (min + max) * 0.5,
                });
            }
        }
        None
    }

    /// Move `rect` by `velocity * dt_secs`, horizontal axis first, then vertical.
    ///
    /// Movement along each axis is swept in sub-steps no longer than half the
    /// smallest active cell, so fast bodies cannot tunnel. A blocked axis
    /// leaves the rectangle flush against the obstacle and zeroes that
    /// velocity component. A rectangle that starts embedded (e.g. right
    /// after a mode toggle) is pushed out to the nearest free spot first.
    pub fn resolve_collision(
        &self,
        rect: Rect,
        velocity: Vec2,
        dt_secs: f32,
        selection: &LayerSelection,
    ) -> Resolution {
        let mut contacts = ContactFlags::default();
        let mut velocity = velocity;

        let start = match self.depenetrate(rect, selection) {
            Some(free) => free,
            None => {
                tracing::warn!(position = ?rect.position, "no free position found while depenetrating");
                rect
            }
        };

        let (after_x, blocked_x) = self.sweep(start, velocity.x * dt_secs, Axis::X, selection);
        if blocked_x {
            if velocity.x > 0.0 {
                contacts.right = true;
            } else {
                contacts.left = true;
            }
            velocity.x = 0.0;
        }

        let (after_y, blocked_y) = self.sweep(after_x, velocity.y * dt_secs, Axis::Y, selection);
        if blocked_y {
            if velocity.y > 0.0 {
                contacts.down = true;
            } else {
                contacts.up = true;
            }
            velocity.y = 0.0;
        } else if velocity.y >= 0.0
            && self.is_solid(&after_y.translated(Vec2::new(0.0, GROUND_PROBE)), selection)
        {
            contacts.down = true;
        }

        Resolution {
            rect: after_y,
            velocity,
            contacts,
        }
    }

    /// Nearest non-overlapping placement of `rect`, searching straight up,
    /// left, right and down. Ties prefer that order. `None` if every
    /// direction stays blocked.
    pub fn depenetrate(&self, rect: Rect, selection: &LayerSelection) -> Option<Rect> {
        if !self.is_solid(&rect, selection) {
            return Some(rect);
        }
        let directions = [
            Vec2::new(0.0, -1.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        ];
        let mut best: Option<(Rect, f32)> = None;
        for dir in directions {
            if let Some(candidate) = self.push_out(rect, dir, selection) {
                let distance = (candidate.position - rect.position).length();
                if best.is_none_or(|(_, d)| distance < d) {
                    best = Some((candidate, distance));
                }
            }
        }
        best.map(|(r, _)| r)
    }

    fn push_out(&self, rect: Rect, dir: Vec2, selection: &LayerSelection) -> Option<Rect> {
        let mut current = rect;
        for _ in 0..MAX_PUSH_ITERATIONS {
            let cells = self.solid_cells(&current, selection);
            if cells.is_empty() {
                return Some(current);
            }
            if dir.y < 0.0 {
                let top = cells.iter().map(Rect::top).fold(f32::INFINITY, f32::min);
                current.position.y = top - current.size.y;
            } else if dir.y > 0.0 {
                current.position.y = cells.iter().map(Rect::bottom).fold(f32::NEG_INFINITY, f32::max);
            } else if dir.x < 0.0 {
                let left = cells.iter().map(Rect::left).fold(f32::INFINITY, f32::min);
                current.position.x = left - current.size.x;
            } else {
                current.position.x = cells.iter().map(Rect::right).fold(f32::NEG_INFINITY, f32::max);
            }
        }
        None
    }

    fn sweep(&self, rect: Rect, delta: f32, axis: Axis, selection: &LayerSelection) -> (Rect, bool) {
        if delta == 0.0 || !delta.is_finite() {
            return (rect, false);
        }
        let max_step = self.min_cell_size(selection) * 0.5;
        let steps = (delta.abs() / max_step).ceil().max(1.0) as u32;
        let step = delta / steps as f32;

        let mut current = rect;
        for _ in 0..steps {
            let candidate = current.translated(axis.unit(step));
            let cells = self.solid_cells(&candidate, selection);
            if cells.is_empty() {
                current = candidate;
                continue;
            }
            let mut flush = candidate;
            match (axis, step > 0.0) {
                (Axis::X, true) => {
                    let stop = cells.iter().map(Rect::left).fold(f32::INFINITY, f32::min);
                    flush.position.x = stop - flush.size.x;
                }
                (Axis::X, false) => {
                    flush.position.x = cells.iter().map(Rect::right).fold(f32::NEG_INFINITY, f32::max);
                }
                (Axis::Y, true) => {
                    let stop = cells.iter().map(Rect::top).fold(f32::INFINITY, f32::min);
                    flush.position.y = stop - flush.size.y;
                }
                (Axis::Y, false) => {
                    flush.position.y = cells.iter().map(Rect::bottom).fold(f32::NEG_INFINITY, f32::max);
                }
            }
            return (flush, true);
        }
        (current, false)
    }

    /// World rectangles of every solid cell `rect` penetrates.
    fn solid_cells(&self, rect: &Rect, selection: &LayerSelection) -> Vec<Rect> {
        let mut out = Vec::new();
        for layer in self.layers.values() {
            if !selection.is_collidable(layer.id()) {
                continue;
            }
            out.extend(
                layer
                    .occupied_overlapping(rect)
                    .into_iter()
                    .filter(|(_, cell)| *cell == Cell::Solid)
                    .map(|(coord, _)| layer.cell_rect(coord)),
            );
        }
        out
    }

    fn min_cell_size(&self, selection: &LayerSelection) -> f32 {
        self.layers
            .values()
            .filter(|l| selection.is_collidable(l.id()))
            .map(CollisionLayer::cell_size)
            .fold(f32::INFINITY, f32::min)
            .min(f32::MAX)
            .max(OVERLAP_EPSILON * 10.0)
    }
}
