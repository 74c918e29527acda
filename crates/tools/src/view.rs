//! ASCII rendering of the active world around the player.

use chrono_collision::{Cell, CollisionWorld, LayerSelection};
use chrono_common::Rect;
use chrono_kernel::Session;
use glam::Vec2;

/// Glyph grid centred on the player, `radius` cells in every direction.
///
/// `P` player, `C` pending checkpoint, `c` consumed checkpoint, `#` solid,
/// `^` hazardous, `.` empty. Only the active layers of the current mode are
/// drawn. Cell pitch is the smallest cell size of the level.
pub fn ascii_view(session: &Session, radius: i32) -> String {
    let world = session.level().world();
    let selection = session.active_selection();
    let Some(pitch) = world
        .layers()
        .map(|l| l.cell_size())
        .min_by(|a, b| a.total_cmp(b))
    else {
        return String::new();
    };

    let player = session.player_rect();
    let origin = (player.center() / pitch).floor() * pitch;
    let checkpoints = session.checkpoints().checkpoints();

    let mut out = String::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let cell = Rect::new(
                origin + Vec2::new(dx as f32, dy as f32) * pitch,
                Vec2::splat(pitch),
            );
            let centre = cell.center();
            let glyph = if contains(&player, centre) {
                'P'
            } else if let Some(cp) = checkpoints.iter().find(|c| contains(&cell, c.position)) {
                if cp.consumed { 'c' } else { 'C' }
            } else {
                terrain_glyph(world, selection, centre)
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn terrain_glyph(world: &CollisionWorld, selection: &LayerSelection, point: Vec2) -> char {
    let mut glyph = '.';
    for layer in world.layers() {
        let cell = layer.cell(layer.position_to_cell(point));
        if !cell.is_occupied() {
            continue;
        }
        if selection.is_hazardous(layer.id()) {
            glyph = '^';
        } else if selection.is_collidable(layer.id()) {
            match cell {
                Cell::Solid => return '#',
                Cell::Hazard => glyph = '^',
                Cell::Empty => {}
            }
        }
    }
    glyph
}

fn contains(rect: &Rect, point: Vec2) -> bool {
    point.x >= rect.left() && point.x < rect.right() && point.y >= rect.top() && point.y < rect.bottom()
}
