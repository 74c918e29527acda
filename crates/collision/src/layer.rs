use chrono_common::{LayerId, Rect};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Penetration depth below which two shapes count as merely touching.
pub const OVERLAP_EPSILON: f32 = 1e-3;

/// Flag of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Empty,
    Solid,
    Hazard,
}

impl Cell {
    /// Parse the level-data glyph: `.` empty, `#` solid, `^` hazardous.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' | ' ' => Some(Self::Empty),
            '#' => Some(Self::Solid),
            '^' => Some(Self::Hazard),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Solid => '#',
            Self::Hazard => '^',
        }
    }

    pub fn is_occupied(self) -> bool {
        self != Self::Empty
    }
}

/// A cell coordinate inside one layer's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Errors raised while building a layer from level data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayerError {
    #[error("layer {layer}: cell size must be positive and finite, got {cell_size}")]
    InvalidCellSize { layer: LayerId, cell_size: f32 },
    #[error("layer {layer}: offset must be finite")]
    InvalidOffset { layer: LayerId },
    #[error("layer {layer}: grid has no cells")]
    EmptyGrid { layer: LayerId },
    #[error("layer {layer}: row {row} has {actual} cells, expected {expected}")]
    RowLength {
        layer: LayerId,
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("layer {layer}: expected {expected} cells, got {actual}")]
    CellCountMismatch {
        layer: LayerId,
        expected: usize,
        actual: usize,
    },
    #[error("layer {layer}: unknown cell glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph {
        layer: LayerId,
        glyph: char,
        row: usize,
        column: usize,
    },
    #[error("duplicate layer id {0}")]
    Duplicate(LayerId),
}

/// A fixed grid of cell flags placed in world space.
///
/// Cell `(x, y)` covers `[offset.x + x * cell_size, offset.x + (x + 1) * cell_size)`
/// horizontally and the same vertically. Everything outside the grid is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionLayer {
    id: LayerId,
    cell_size: f32,
    offset: Vec2,
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl CollisionLayer {
    /// Build a layer from a row-major cell vector.
    pub fn new(
        id: LayerId,
        cell_size: f32,
        offset: Vec2,
        width: usize,
        height: usize,
        cells: Vec<Cell>,
    ) -> Result<Self, LayerError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(LayerError::InvalidCellSize {
                layer: id,
                cell_size,
            });
        }
        if !offset.is_finite() {
            return Err(LayerError::InvalidOffset { layer: id });
        }
        if width == 0 || height == 0 {
            return Err(LayerError::EmptyGrid { layer: id });
        }
        if cells.len() != width * height {
            return Err(LayerError::CellCountMismatch {
                layer: id,
                expected: width * height,
                actual: cells.len(),
            });
        }
        Ok(Self {
            id,
            cell_size,
            offset,
            width,
            height,
            cells,
        })
    }

    /// Build a layer from text rows using the glyphs of [`Cell::from_glyph`].
    pub fn from_rows<S: AsRef<str>>(
        id: LayerId,
        cell_size: f32,
        offset: Vec2,
        rows: &[S],
    ) -> Result<Self, LayerError> {
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, text) in rows.iter().enumerate() {
            let text = text.as_ref();
            let actual = text.chars().count();
            if actual != width {
                return Err(LayerError::RowLength {
                    layer: id,
                    row,
                    expected: width,
                    actual,
                });
            }
            for (column, glyph) in text.chars().enumerate() {
                let cell = Cell::from_glyph(glyph).ok_or_else(|| LayerError::UnknownGlyph {
                    layer: id.clone(),
                    glyph,
                    row,
                    column,
                })?;
                cells.push(cell);
            }
        }
        Self::new(id, cell_size, offset, width, rows.len(), cells)
    }

    pub fn id(&self) -> &LayerId {
        &self.id
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell flag at `coord`; out-of-grid coordinates are empty.
    pub fn cell(&self, coord: CellCoord) -> Cell {
        if coord.x < 0 || coord.y < 0 {
            return Cell::Empty;
        }
        let (x, y) = (coord.x as usize, coord.y as usize);
        if x >= self.width || y >= self.height {
            return Cell::Empty;
        }
        self.cells[y * self.width + x]
    }

    /// World-space rectangle covered by `coord`.
    pub fn cell_rect(&self, coord: CellCoord) -> Rect {
        Rect::new(
            self.offset + Vec2::new(coord.x as f32, coord.y as f32) * self.cell_size,
            Vec2::splat(self.cell_size),
        )
    }

    /// Convert a world position to the coordinate of the cell containing it.
    pub fn position_to_cell(&self, pos: Vec2) -> CellCoord {
        let local = (pos - self.offset) / self.cell_size;
        CellCoord::new(local.x.floor() as i32, local.y.floor() as i32)
    }

    /// Occupied cells that `rect` penetrates by more than [`OVERLAP_EPSILON`].
    pub fn occupied_overlapping(&self, rect: &Rect) -> Vec<(CellCoord, Cell)> {
        let mut out = Vec::new();
        let Some((min, max)) = self.cell_range(rect) else {
            return out;
        };
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let coord = CellCoord::new(x, y);
                let cell = self.cell(coord);
                if cell.is_occupied() {
                    out.push((coord, cell));
                }
            }
        }
        out
    }

    /// Number of cells carrying the given flag.
    pub fn count(&self, flag: Cell) -> usize {
        self.cells.iter().filter(|c| **c == flag).count()
    }

    /// Inclusive cell range touched by `rect` shrunk by the overlap epsilon,
    /// clipped to the grid. `None` when nothing in the grid is touched.
    fn cell_range(&self, rect: &Rect) -> Option<(CellCoord, CellCoord)> {
        let left = (rect.left() + OVERLAP_EPSILON - self.offset.x) / self.cell_size;
        let right = (rect.right() - OVERLAP_EPSILON - self.offset.x) / self.cell_size;
        let top = (rect.top() + OVERLAP_EPSILON - self.offset.y) / self.cell_size;
        let bottom = (rect.bottom() - OVERLAP_EPSILON - self.offset.y) / self.cell_size;
        if !(left < right && top < bottom) {
            return None;
        }

        let min_x = (left.floor() as i64).max(0);
        let min_y = (top.floor() as i64).max(0);
        let max_x = (right.ceil() as i64 - 1).min(self.width as i64 - 1);
        let max_y = (bottom.ceil() as i64 - 1).min(self.height as i64 - 1);
        if min_x > max_x || min_y > max_y {
            return None;
        }
        Some((
            CellCoord::new(min_x as i32, min_y as i32),
            CellCoord::new(max_x as i32, max_y as i32),
        ))
    }
}
