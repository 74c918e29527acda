//! One play session of a level: the fixed-tick loop.

use chrono_collision::LayerSelection;
use chrono_common::{Rect, TemporalMode};
use chrono_input::InputFrame;
use chrono_motion::PlayerController;
use glam::Vec2;

use crate::checkpoint::CheckpointRegistry;
use crate::config::{SessionConfig, SessionError};
use crate::event::{FrameEvent, FrameSnapshot};
use crate::level::{Level, LevelDef};
use crate::respawn::RespawnCoordinator;
use crate::temporal::TemporalController;

/// A running level.
///
/// All mutation goes through [`Session::step`]. Invalid levels and tuning are
/// rejected by [`Session::new`], so a constructed session never fails a tick.
#[derive(Debug, Clone)]
pub struct Session {
    level: Level,
    config: SessionConfig,
    temporal: TemporalController,
    player: PlayerController,
    checkpoints: CheckpointRegistry,
    respawn: RespawnCoordinator,
    tick: u64,
}

impl Session {
    pub fn new(level: Level, config: SessionConfig) -> Result<Self, SessionError> {
        if let Err(err) = config.validate() {
            tracing::warn!(%err, "session config rejected");
            return Err(err);
        }
        if let Err(err) = level.check_start(config.motion.player_size) {
            tracing::warn!(%err, level = level.name(), "level rejected");
            return Err(err.into());
        }

        let temporal = TemporalController::new(
            level.initial_mode(),
            level.selection(TemporalMode::Present).clone(),
            level.selection(TemporalMode::Past).clone(),
            config.temporal.clone(),
        );
        let player = PlayerController::new(config.motion.clone(), level.start());
        let checkpoints =
            CheckpointRegistry::new(level.checkpoints(), level.start(), config.checkpoints.radius);

        tracing::info!(
            level = level.name(),
            mode = %level.initial_mode(),
            checkpoints = level.checkpoints().len(),
            "session started"
        );

        Ok(Self {
            level,
            config,
            temporal,
            player,
            checkpoints,
            respawn: RespawnCoordinator::new(),
            tick: 0,
        })
    }

    /// Validate raw level data and start a session on it.
    pub fn from_def(def: LevelDef, config: SessionConfig) -> Result<Self, SessionError> {
        let level = Level::load(def).inspect_err(|err| {
            tracing::warn!(%err, "level rejected");
        })?;
        Self::new(level, config)
    }

    /// Advance the simulation by one tick of `dt_ms` milliseconds.
    pub fn step(&mut self, input: &InputFrame, dt_ms: u32) -> FrameSnapshot {
        self.tick += 1;
        let span = tracing::debug_span!("step", tick = self.tick);
        let _enter = span.enter();

        let mut events = Vec::new();

        self.temporal.advance(dt_ms);
        for _ in 0..input.mode_toggle_presses {
            if let Some(mode) = self.temporal.toggle() {
                events.push(FrameEvent::ModeToggled { mode });
            }
        }

        let world = self.level.world();
        let selection = self.temporal.active_selection();

        self.player.update(input, dt_ms, world, selection);

        let restored = self.restore_clearance();
        debug_assert!(!restored, "player overlapped solid geometry after resolution");

        let world = self.level.world();
        let selection = self.temporal.active_selection();
        if let Some(hazard) = world.hazard_contact(&self.player.rect(), selection) {
            let respawn =
                self.respawn
                    .on_hazard_contact(&mut self.player, &self.checkpoints, hazard);
            // The respawn point may sit inside geometry of the current mode.
            let rect = self.player.rect();
            match world.depenetrate(rect, selection) {
                Some(free) if free.position != rect.position => {
                    tracing::debug!(position = ?free.position, "respawn point embedded, moved to free spot");
                    self.player.correct_position(free.position);
                }
                Some(_) => {}
                None => tracing::warn!(position = ?rect.position, "respawn point embedded with no free spot"),
            }
            events.push(FrameEvent::Respawned {
                position: self.player.state().position,
                layer: respawn.hazard.layer,
                contact: respawn.hazard.point,
            });
            return self.snapshot(events);
        }

        if let Some(cp) = self.checkpoints.check_proximity(self.player.state().position) {
            events.push(FrameEvent::CheckpointReached {
                index: cp.index,
                position: cp.position,
            });
        }
        if self.checkpoints.take_completion() {
            events.push(FrameEvent::LevelCompleted);
        }

        self.snapshot(events)
    }

    /// Push the player out of active solid geometry if resolution left it
    /// embedded. Returns whether a correction was needed.
    fn restore_clearance(&mut self) -> bool {
        let world = self.level.world();
        let selection = self.temporal.active_selection();
        let rect = self.player.rect();
        if !world.is_solid(&rect, selection) {
            return false;
        }
        tracing::error!(
            x = rect.position.x,
            y = rect.position.y,
            "player overlaps solid geometry after resolution"
        );
        let fixed = world.resolve_collision(rect, Vec2::ZERO, 0.0, selection);
        self.player.correct_position(fixed.rect.position);
        true
    }

    /// Snapshot of the current state with no events attached.
    pub fn current_snapshot(&self) -> FrameSnapshot {
        self.snapshot(Vec::new())
    }

    fn snapshot(&self, events: Vec<FrameEvent>) -> FrameSnapshot {
        let state = self.player.state();
        FrameSnapshot {
            tick: self.tick,
            position: state.position,
            velocity: state.velocity,
            mode: self.temporal.mode(),
            grounded: state.grounded,
            motion_state: state.motion_state(),
            facing: state.facing,
            shift_active: state.shift.is_active(),
            reach_offset: state.shift.reach_offset(),
            jump_charge: state.jump.charge_speed(),
            events,
        }
    }

    /// Deterministic FNV-1a hash of the simulation state.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let state = self.player.state();
        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &[self.temporal.mode() as u8]);
        mix(&mut h, &state.position.x.to_le_bytes());
        mix(&mut h, &state.position.y.to_le_bytes());
        mix(&mut h, &state.velocity.x.to_le_bytes());
        mix(&mut h, &state.velocity.y.to_le_bytes());
        mix(
            &mut h,
            &[
                state.grounded as u8,
                state.facing as u8,
                state.shift.is_active() as u8,
                state.shift.can_enter() as u8,
                state.jump.is_armed() as u8,
            ],
        );
        mix(&mut h, &state.shift.remaining_ms().to_le_bytes());
        mix(&mut h, &state.jump.charge_speed().to_le_bytes());
        for cp in self.checkpoints.checkpoints() {
            mix(&mut h, &[cp.consumed as u8]);
        }
        let current = self.checkpoints.current().map_or(u64::MAX, |c| c.index as u64);
        mix(&mut h, &current.to_le_bytes());
        h
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn mode(&self) -> TemporalMode {
        self.temporal.mode()
    }

    pub fn active_selection(&self) -> &LayerSelection {
        self.temporal.active_selection()
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn player_rect(&self) -> Rect {
        self.player.rect()
    }

    pub fn checkpoints(&self) -> &CheckpointRegistry {
        &self.checkpoints
    }

    pub fn temporal(&self) -> &TemporalController {
        &self.temporal
    }

    pub fn respawn_count(&self) -> u64 {
        self.respawn.respawn_count()
    }

    pub fn is_complete(&self) -> bool {
        self.checkpoints.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_common::LayerId;
    use chrono_input::{HeldKeys, InputLatch};
    use chrono_motion::{JumpModel, MotionConfig, MotionState};

    use crate::config::TemporalConfig;
    use crate::level::{LayerDef, LayerRole, LevelError, ModeRoles};

    const DT_MS: u32 = 20;

    fn rows(width: usize, height: usize, overrides: &[(usize, &str)]) -> Vec<String> {
        let mut out = vec![".".repeat(width); height];
        for &(row, text) in overrides {
            out[row] = text.to_string();
        }
        out
    }

    fn layer(id: &str, offset: Vec2, rows: Vec<String>, roles: ModeRoles) -> LayerDef {
        LayerDef {
            id: LayerId::from(id),
            cell_size: 8.0,
            offset,
            rows,
            roles,
        }
    }

    /// 60×8 grid with a floor whose top is at y = 56. A standing player has y = 44.
    fn flat_level(start: Vec2, checkpoints: Vec<Vec2>) -> LevelDef {
        let floor = "#".repeat(60);
        LevelDef {
            name: "flat".into(),
            start,
            initial_mode: TemporalMode::Present,
            layers: vec![layer(
                "ground",
                Vec2::ZERO,
                rows(60, 8, &[(7, floor.as_str())]),
                ModeRoles::both(),
            )],
            checkpoints,
        }
    }

    fn session(def: LevelDef, config: SessionConfig) -> Session {
        Session::from_def(def, config).unwrap()
    }

    fn count(snapshots: &[FrameSnapshot], pred: impl Fn(&FrameEvent) -> bool) -> usize {
        snapshots
            .iter()
            .flat_map(|s| s.events.iter())
            .filter(|e| pred(e))
            .count()
    }

    fn splitmix64(state: &mut u64) -> u64 {
        *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = *state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Random held keys, changing on average every few ticks.
    fn random_inputs(seed: u64, ticks: usize) -> Vec<(InputFrame, u32)> {
        let mut rng = seed;
        let mut latch = InputLatch::new();
        let mut held = HeldKeys::default();
        let mut out = Vec::with_capacity(ticks);
        for _ in 0..ticks {
            let r = splitmix64(&mut rng);
            if r % 4 == 0 {
                held = HeldKeys {
                    left: r & 0x10 != 0,
                    right: r & 0x20 != 0,
                    jump: r & 0x40 != 0,
                    shift: r & 0x80 != 0,
                    toggle: r & 0x700 == 0,
                };
            }
            let dt_ms = [8, 16, 20, 33][((r >> 16) % 4) as usize];
            out.push((latch.next(held), dt_ms));
        }
        out
    }

    /// Floor top at y = 312 with spikes from x = 544 on the row above it.
    /// The first checkpoint sits on the start position.
    fn spike_level() -> LevelDef {
        let floor = "#".repeat(30);
        let spikes = format!("{}{}", ".".repeat(18), "^".repeat(12));
        LevelDef {
            name: "spikes".into(),
            start: Vec2::new(500.0, 300.0),
            initial_mode: TemporalMode::Present,
            layers: vec![layer(
                "ground",
                Vec2::new(400.0, 200.0),
                rows(30, 16, &[(13, spikes.as_str()), (14, floor.as_str()), (15, floor.as_str())]),
                ModeRoles::both(),
            )],
            checkpoints: vec![Vec2::new(500.0, 300.0), Vec2::new(900.0, 300.0)],
        }
    }

    /// Enclosed room with blocks that exist in one world only, spikes on the
    /// floor and thorns that hurt only in the past.
    fn two_world_level() -> LevelDef {
        const W: usize = 30;
        const H: usize = 16;
        let wall = "#".repeat(W);
        let side = format!("#{}#", ".".repeat(W - 2));
        let spikes = format!("#{}^^^^{}#", ".".repeat(19), ".".repeat(5));
        let mut ground = vec![side; H];
        ground[0] = wall.clone();
        ground[H - 1] = wall;
        ground[H - 2] = spikes;

        LevelDef {
            name: "two-world".into(),
            start: Vec2::new(16.0, 100.0),
            initial_mode: TemporalMode::Present,
            layers: vec![
                layer("ground", Vec2::ZERO, ground, ModeRoles::both()),
                layer(
                    "present_blocks",
                    Vec2::ZERO,
                    rows(
                        W,
                        H,
                        &[
                            (10, "......######.................."),
                            (12, "..............####............"),
                        ],
                    ),
                    ModeRoles::only(TemporalMode::Present),
                ),
                layer(
                    "past_blocks",
                    Vec2::ZERO,
                    rows(
                        W,
                        H,
                        &[
                            (11, ".........######..............."),
                            (13, "....####......................"),
                        ],
                    ),
                    ModeRoles::only(TemporalMode::Past),
                ),
                layer(
                    "past_thorns",
                    Vec2::ZERO,
                    rows(W, H, &[(5, "...................####.......")]),
                    ModeRoles {
                        present: LayerRole::Inactive,
                        past: LayerRole::Hazard,
                    },
                ),
            ],
            checkpoints: vec![Vec2::new(60.0, 100.0), Vec2::new(200.0, 100.0)],
        }
    }

    #[test]
    fn left_hold_reaches_max_speed_and_clamps() {
        let mut s = session(
            flat_level(Vec2::new(200.0, 44.0), vec![Vec2::new(1000.0, 0.0)]),
            SessionConfig::default(),
        );
        // 80 / (200 * 0.02) = 20 ticks.
        for tick in 1..=20 {
            let snap = s.step(&InputFrame::holding_left(), DT_MS);
            if tick == 19 {
                assert_eq!(snap.velocity.x, -76.0);
            }
        }
        assert_eq!(s.player().state().velocity.x, -80.0);
        for _ in 0..10 {
            let snap = s.step(&InputFrame::holding_left(), DT_MS);
            assert_eq!(snap.velocity.x, -80.0);
            assert_eq!(snap.motion_state, MotionState::Walk);
        }
    }

    #[test]
    fn left_hold_reaches_exact_max_speed_at_16ms() {
        let mut s = session(
            flat_level(Vec2::new(300.0, 44.0), vec![Vec2::new(1000.0, 0.0)]),
            SessionConfig::default(),
        );
        // ceil(80 / (200 * 0.016)) = 25 ticks.
        for _ in 0..25 {
            s.step(&InputFrame::holding_left(), 16);
        }
        assert_eq!(s.player().state().velocity.x, -80.0);
        let snap = s.step(&InputFrame::holding_left(), 16);
        assert_eq!(snap.velocity.x, -80.0);
    }

    #[test]
    fn embedded_player_is_pushed_back_out() {
        let mut s = session(
            flat_level(Vec2::new(200.0, 44.0), vec![Vec2::new(1000.0, 0.0)]),
            SessionConfig::default(),
        );
        s.step(&InputFrame::default(), DT_MS);
        s.player.correct_position(Vec2::new(200.0, 52.0));
        assert!(s.level().world().is_solid(&s.player_rect(), s.active_selection()));

        assert!(s.restore_clearance());
        assert!(!s.level().world().is_solid(&s.player_rect(), s.active_selection()));
        assert_eq!(s.player().state().position, Vec2::new(200.0, 44.0));
        assert!(!s.restore_clearance());
    }

    #[test]
    fn instant_jump_sets_full_upward_speed() {
        let mut config = SessionConfig::default();
        config.motion.jump = JumpModel::Instant { speed: 150.0 };
        let mut s = session(
            flat_level(Vec2::new(200.0, 44.0), vec![Vec2::new(1000.0, 0.0)]),
            config,
        );
        assert!(s.step(&InputFrame::default(), DT_MS).grounded);

        let jump = InputFrame {
            jump_held: true,
            jump_pressed: true,
            ..InputFrame::default()
        };
        let snap = s.step(&jump, DT_MS);
        assert_eq!(snap.velocity.y, -150.0);

        let next = s.step(&InputFrame::default(), DT_MS);
        assert!(!next.grounded);
        assert_eq!(next.motion_state, MotionState::Airborne);
    }

    #[test]
    fn charged_jump_releases_accumulated_speed() {
        let mut config = SessionConfig::default();
        config.motion.jump = JumpModel::charged();
        let mut s = session(
            flat_level(Vec2::new(200.0, 44.0), vec![Vec2::new(1000.0, 0.0)]),
            config,
        );
        s.step(&InputFrame::default(), 100);

        let held = InputFrame {
            jump_held: true,
            ..InputFrame::default()
        };
        let first = s.step(&held, 100);
        assert_eq!(first.jump_charge, 20.0);
        for _ in 0..20 {
            s.step(&held, 100);
        }
        assert_eq!(s.current_snapshot().jump_charge, 240.0);

        let release = InputFrame {
            jump_released: true,
            ..InputFrame::default()
        };
        let snap = s.step(&release, 100);
        assert_eq!(snap.velocity.y, -240.0);
        assert_eq!(snap.jump_charge, 0.0);
    }

    #[test]
    fn hazard_contact_respawns_at_last_checkpoint() {
        let mut s = session(spike_level(), SessionConfig::default());

        let first = s.step(&InputFrame::default(), DT_MS);
        assert!(matches!(
            first.events.as_slice(),
            [FrameEvent::CheckpointReached { index: 0, .. }]
        ));

        let mut respawn = None;
        for _ in 0..200 {
            let snap = s.step(&InputFrame::holding_right(), DT_MS);
            if snap.respawned() {
                respawn = Some(snap);
                break;
            }
        }
        let snap = respawn.expect("player never reached the spikes");
        assert_eq!(snap.position, Vec2::new(500.0, 300.0));
        assert_eq!(snap.velocity, Vec2::ZERO);
        assert_eq!(snap.events.len(), 1);
        match &snap.events[0] {
            FrameEvent::Respawned {
                position, layer, ..
            } => {
                assert_eq!(*position, Vec2::new(500.0, 300.0));
                assert_eq!(layer.as_str(), "ground");
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(s.respawn_count(), 1);
    }

    #[test]
    fn only_checkpoint_in_range_is_claimed() {
        let mut s = session(
            flat_level(
                Vec2::new(300.0, 44.0),
                vec![
                    Vec2::new(100.0, 44.0),
                    Vec2::new(300.0, 44.0),
                    Vec2::new(600.0, 44.0),
                ],
            ),
            SessionConfig::default(),
        );
        let mut snaps = vec![s.step(&InputFrame::default(), DT_MS)];
        for _ in 0..10 {
            snaps.push(s.step(&InputFrame::default(), DT_MS));
        }

        assert_eq!(
            count(&snaps, |e| matches!(e, FrameEvent::CheckpointReached { .. })),
            1
        );
        assert!(matches!(
            snaps[0].events.as_slice(),
            [FrameEvent::CheckpointReached { index: 1, .. }]
        ));
        let flags: Vec<bool> = s.checkpoints().checkpoints().iter().map(|c| c.consumed).collect();
        assert_eq!(flags, vec![false, true, false]);
        assert_eq!(s.checkpoints().pending_count(), 2);
    }

    #[test]
    fn random_play_never_leaves_player_in_solid() {
        for seed in [1, 7, 42, 1234] {
            let mut s = session(two_world_level(), SessionConfig::default());
            for (input, dt_ms) in random_inputs(seed, 3000) {
                s.step(&input, dt_ms);
                let rect = s.player_rect();
                assert!(
                    !s.level().world().is_solid(&rect, s.active_selection()),
                    "seed {seed} tick {}: player at {:?} overlaps solid cells in {} mode",
                    s.tick(),
                    rect.position,
                    s.mode(),
                );
            }
        }
    }

    #[test]
    fn replay_is_deterministic() {
        let inputs = random_inputs(99, 1500);
        let mut a = session(two_world_level(), SessionConfig::default());
        let mut b = session(two_world_level(), SessionConfig::default());
        for (input, dt_ms) in &inputs {
            let sa = a.step(input, *dt_ms);
            let sb = b.step(input, *dt_ms);
            assert_eq!(sa, sb);
            assert_eq!(a.state_hash(), b.state_hash());
        }
    }

    #[test]
    fn state_hash_changes_with_state() {
        let mut s = session(two_world_level(), SessionConfig::default());
        let before = s.state_hash();
        s.step(&InputFrame::toggle(), DT_MS);
        assert_ne!(before, s.state_hash());
    }

    #[test]
    fn two_toggle_edges_in_one_tick_toggle_twice() {
        let mut s = session(two_world_level(), SessionConfig::default());
        let input = InputFrame {
            mode_toggle_presses: 2,
            ..InputFrame::default()
        };
        let snap = s.step(&input, DT_MS);
        assert_eq!(
            snap.events,
            vec![
                FrameEvent::ModeToggled {
                    mode: TemporalMode::Past
                },
                FrameEvent::ModeToggled {
                    mode: TemporalMode::Present
                },
            ]
        );
        assert_eq!(snap.mode, TemporalMode::Present);
        assert_eq!(s.temporal().toggle_count(), 2);
    }

    #[test]
    fn toggle_cooldown_drops_extra_edges() {
        let config = SessionConfig {
            temporal: TemporalConfig {
                toggle_cooldown_ms: 100,
            },
            ..SessionConfig::default()
        };
        let mut s = session(two_world_level(), config);
        let input = InputFrame {
            mode_toggle_presses: 2,
            ..InputFrame::default()
        };
        let snap = s.step(&input, DT_MS);
        assert_eq!(snap.events.len(), 1);
        assert_eq!(snap.mode, TemporalMode::Past);

        // 20 ms later the cooldown is still running.
        assert!(s.step(&InputFrame::toggle(), DT_MS).events.is_empty());
        for _ in 0..4 {
            s.step(&InputFrame::default(), DT_MS);
        }
        let snap = s.step(&InputFrame::toggle(), DT_MS);
        assert_eq!(snap.mode, TemporalMode::Present);
    }

    #[test]
    fn toggle_swaps_colliders_before_motion() {
        // Present-only bridge at y = 32, ground floor at y = 56.
        let floor = "#".repeat(60);
        let bridge = format!("{}{}{}", ".".repeat(20), "#".repeat(10), ".".repeat(30));
        let def = LevelDef {
            name: "bridge".into(),
            start: Vec2::new(180.0, 20.0),
            initial_mode: TemporalMode::Present,
            layers: vec![
                layer("ground", Vec2::ZERO, rows(60, 8, &[(7, floor.as_str())]), ModeRoles::both()),
                layer(
                    "bridge",
                    Vec2::ZERO,
                    rows(60, 8, &[(4, bridge.as_str())]),
                    ModeRoles::only(TemporalMode::Present),
                ),
            ],
            checkpoints: vec![Vec2::new(1000.0, 0.0)],
        };
        let mut s = session(def, SessionConfig::default());
        assert!(s.step(&InputFrame::default(), DT_MS).grounded);
        assert_eq!(s.player().state().position.y, 20.0);

        let snap = s.step(&InputFrame::toggle(), DT_MS);
        assert_eq!(snap.mode, TemporalMode::Past);
        assert!(!snap.grounded);
        assert!(snap.position.y > 20.0);
        assert!(!s.active_selection().is_collidable(&LayerId::from("bridge")));
    }

    #[test]
    fn toggle_into_geometry_pushes_player_out() {
        // A past-only block occupies the space the player stands in.
        let floor = "#".repeat(60);
        let block = format!("{}{}{}", ".".repeat(22), "##", ".".repeat(36));
        let def = LevelDef {
            name: "embed".into(),
            start: Vec2::new(180.0, 44.0),
            initial_mode: TemporalMode::Present,
            layers: vec![
                layer("ground", Vec2::ZERO, rows(60, 8, &[(7, floor.as_str())]), ModeRoles::both()),
                layer(
                    "past_block",
                    Vec2::ZERO,
                    rows(60, 8, &[(6, block.as_str())]),
                    ModeRoles::only(TemporalMode::Past),
                ),
            ],
            checkpoints: vec![Vec2::new(1000.0, 0.0)],
        };
        let mut s = session(def, SessionConfig::default());
        s.step(&InputFrame::default(), DT_MS);
        let snap = s.step(&InputFrame::toggle(), DT_MS);
        assert!(!s.level().world().is_solid(&s.player_rect(), s.active_selection()));
        assert!(snap.position.y <= 36.0);
    }

    #[test]
    fn level_completes_exactly_once() {
        let mut s = session(
            flat_level(
                Vec2::new(200.0, 44.0),
                vec![Vec2::new(220.0, 44.0), Vec2::new(260.0, 44.0)],
            ),
            SessionConfig::default(),
        );
        let snaps: Vec<FrameSnapshot> = (0..100)
            .map(|_| s.step(&InputFrame::holding_right(), DT_MS))
            .collect();
        assert_eq!(count(&snaps, |e| *e == FrameEvent::LevelCompleted), 1);

        let done = snaps
            .iter()
            .find(|s| s.has_event(|e| *e == FrameEvent::LevelCompleted))
            .unwrap();
        assert!(matches!(
            done.events.as_slice(),
            [
                FrameEvent::CheckpointReached { index: 1, .. },
                FrameEvent::LevelCompleted
            ]
        ));
        assert!(s.is_complete());
    }

    #[test]
    fn hazard_during_shift_still_respawns() {
        // Thorns hurt only in the past, right where the player hangs.
        let floor = "#".repeat(40);
        let thorns = format!("{}{}{}", ".".repeat(10), "#".repeat(6), ".".repeat(24));
        let def = LevelDef {
            name: "thorns".into(),
            start: Vec2::new(100.0, 20.0),
            initial_mode: TemporalMode::Present,
            layers: vec![
                layer("ground", Vec2::ZERO, rows(40, 8, &[(7, floor.as_str())]), ModeRoles::both()),
                layer(
                    "thorns",
                    Vec2::ZERO,
                    rows(40, 8, &[(2, thorns.as_str()), (3, thorns.as_str())]),
                    ModeRoles {
                        present: LayerRole::Inactive,
                        past: LayerRole::Hazard,
                    },
                ),
            ],
            checkpoints: vec![Vec2::new(1000.0, 0.0)],
        };
        let mut s = session(def, SessionConfig::default());

        let enter = InputFrame {
            shift_held: true,
            shift_pressed: true,
            ..InputFrame::default()
        };
        let snap = s.step(&enter, DT_MS);
        assert!(snap.shift_active);
        assert!(!snap.respawned());

        let toggle_while_shifting = InputFrame {
            shift_held: true,
            mode_toggle_presses: 1,
            ..InputFrame::default()
        };
        let snap = s.step(&toggle_while_shifting, DT_MS);
        assert!(snap.respawned());
        assert!(!snap.shift_active);
        assert_eq!(snap.position, Vec2::new(100.0, 20.0));
        assert!(matches!(
            snap.events.as_slice(),
            [FrameEvent::ModeToggled { .. }, FrameEvent::Respawned { .. }]
        ));
    }

    #[test]
    fn respawn_keeps_mode() {
        let mut s = session(spike_level(), SessionConfig::default());
        s.step(&InputFrame::toggle(), DT_MS);
        for _ in 0..200 {
            let snap = s.step(&InputFrame::holding_right(), DT_MS);
            if snap.respawned() {
                assert_eq!(snap.mode, TemporalMode::Past);
                return;
            }
        }
        panic!("player never reached the spikes");
    }

    #[test]
    fn rejects_embedded_start() {
        let def = flat_level(Vec2::new(200.0, 50.0), vec![Vec2::new(0.0, 0.0)]);
        assert_eq!(
            Session::from_def(def, SessionConfig::default()).unwrap_err(),
            SessionError::Level(LevelError::StartEmbedded {
                mode: TemporalMode::Present
            })
        );
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = SessionConfig::default();
        config.motion = MotionConfig {
            acceleration: 0.0,
            ..MotionConfig::default()
        };
        let def = flat_level(Vec2::new(200.0, 44.0), vec![Vec2::new(0.0, 0.0)]);
        assert!(matches!(
            Session::from_def(def, config),
            Err(SessionError::Motion(_))
        ));
    }
}
