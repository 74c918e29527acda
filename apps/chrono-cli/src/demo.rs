//! Built-in two-world level and input script for `chrono-cli demo`.

use chrono_common::{LayerId, TemporalMode};
use chrono_kernel::{LayerDef, LayerRole, LevelDef, ModeRoles};
use glam::Vec2;

use crate::script::{Script, ScriptSegment};

const WIDTH: usize = 48;
const HEIGHT: usize = 12;

fn grid(overrides: &[(usize, String)]) -> Vec<String> {
    let mut rows = vec![".".repeat(WIDTH); HEIGHT];
    for (row, text) in overrides {
        rows[*row] = text.clone();
    }
    rows
}

/// Fill `cols` of an otherwise empty row with `glyph`.
fn row_with(cols: std::ops::Range<usize>, glyph: char) -> String {
    (0..WIDTH)
        .map(|x| if cols.contains(&x) { glyph } else { '.' })
        .collect()
}

/// A corridor with a wall that exists only in the past, brambles that only
/// hurt in the present and spikes that hurt in both.
pub fn level() -> LevelDef {
    let floor = "#".repeat(WIDTH);
    let wall: Vec<(usize, String)> = (7..11).map(|row| (row, row_with(12..13, '#'))).collect();

    LevelDef {
        name: "demo".into(),
        start: Vec2::new(16.0, 76.0),
        initial_mode: TemporalMode::Present,
        layers: vec![
            LayerDef {
                id: LayerId::from("ground"),
                cell_size: 8.0,
                offset: Vec2::ZERO,
                rows: grid(&[(10, row_with(34..36, '^')), (11, floor)]),
                roles: ModeRoles::both(),
            },
            LayerDef {
                id: LayerId::from("ruins"),
                cell_size: 8.0,
                offset: Vec2::ZERO,
                rows: grid(&wall),
                roles: ModeRoles::only(TemporalMode::Past),
            },
            LayerDef {
                id: LayerId::from("brambles"),
                cell_size: 8.0,
                offset: Vec2::ZERO,
                rows: grid(&[(10, row_with(22..24, '#'))]),
                roles: ModeRoles {
                    present: LayerRole::Hazard,
                    past: LayerRole::Inactive,
                },
            },
        ],
        checkpoints: vec![Vec2::new(80.0, 76.0), Vec2::new(240.0, 76.0), Vec2::new(360.0, 76.0)],
    }
}

/// Walk right, slip into the past before the brambles, jump, come back to
/// the present and run into the spikes once.
pub fn script() -> Script {
    let right = |ticks| ScriptSegment {
        ticks,
        right: true,
        ..ScriptSegment::default()
    };
    Script::new(vec![
        right(90),
        ScriptSegment {
            toggle: true,
            ..right(1)
        },
        right(60),
        ScriptSegment {
            jump: true,
            ..right(10)
        },
        right(40),
        ScriptSegment {
            toggle: true,
            ..right(1)
        },
        right(120),
        ScriptSegment {
            ticks: 30,
            ..ScriptSegment::default()
        },
    ])
}
