use chrono_common::TemporalMode;
use chrono_kernel::{FrameEvent, FrameSnapshot, Session};
use glam::Vec2;

/// Session inspector for developer tooling.
///
/// Read-only queries against a running session for debugging and logs.
pub struct SessionInspector;

impl SessionInspector {
    /// Produce a summary of the session state.
    pub fn summary(session: &Session) -> SessionSummary {
        let checkpoints = session.checkpoints();
        SessionSummary {
            level: session.level().name().to_string(),
            tick: session.tick(),
            mode: session.mode(),
            position: session.player().state().position,
            checkpoints_consumed: checkpoints.consumed_count(),
            checkpoints_total: checkpoints.checkpoints().len(),
            respawns: session.respawn_count(),
            toggles: session.temporal().toggle_count(),
            complete: session.is_complete(),
            state_hash: session.state_hash(),
        }
    }

    /// One line per snapshot: tick, mode, motion, then the tick's events.
    pub fn frame_line(snapshot: &FrameSnapshot) -> String {
        let mut line = format!(
            "#{:<5} {:<7} pos=({:.2}, {:.2}) vel=({:.2}, {:.2}) {:?}{}",
            snapshot.tick,
            snapshot.mode,
            snapshot.position.x,
            snapshot.position.y,
            snapshot.velocity.x,
            snapshot.velocity.y,
            snapshot.motion_state,
            if snapshot.grounded { " grounded" } else { "" },
        );
        for event in &snapshot.events {
            line.push_str(" | ");
            line.push_str(&Self::describe_event(event));
        }
        line
    }

    pub fn describe_event(event: &FrameEvent) -> String {
        match event {
            FrameEvent::ModeToggled { mode } => format!("mode -> {mode}"),
            FrameEvent::CheckpointReached { index, position } => {
                format!("checkpoint {index} at ({:.0}, {:.0})", position.x, position.y)
            }
            FrameEvent::Respawned {
                position, layer, ..
            } => format!(
                "respawned at ({:.0}, {:.0}) after touching {layer}",
                position.x, position.y
            ),
            FrameEvent::LevelCompleted => "level completed".to_string(),
        }
    }
}

/// Summary of session state for the inspector.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub level: String,
    pub tick: u64,
    pub mode: TemporalMode,
    pub position: Vec2,
    pub checkpoints_consumed: usize,
    pub checkpoints_total: usize,
    pub respawns: u64,
    pub toggles: u64,
    pub complete: bool,
    pub state_hash: u64,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Session [{}]: tick={} mode={} pos=({:.2}, {:.2}) checkpoints={}/{} respawns={} toggles={} complete={} hash={:016x}",
            self.level,
            self.tick,
            self.mode,
            self.position.x,
            self.position.y,
            self.checkpoints_consumed,
            self.checkpoints_total,
            self.respawns,
            self.toggles,
            self.complete,
            self.state_hash,
        )
    }
}
