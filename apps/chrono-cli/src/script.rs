//! Input scripts: runs of held keys, expanded into per-tick frames.

use chrono_input::{HeldKeys, InputFrame, InputLatch};
use serde::{Deserialize, Serialize};

/// Keys held for `ticks` consecutive ticks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSegment {
    pub ticks: u32,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub shift: bool,
    pub toggle: bool,
}

impl ScriptSegment {
    fn held(&self) -> HeldKeys {
        HeldKeys {
            left: self.left,
            right: self.right,
            jump: self.jump,
            shift: self.shift,
            toggle: self.toggle,
        }
    }
}

/// Ordered list of segments. Press and release edges are derived from the
/// change in held keys between consecutive ticks, so a key held across two
/// segments produces a single press.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub segments: Vec<ScriptSegment>,
}

impl Script {
    pub fn new(segments: Vec<ScriptSegment>) -> Self {
        Self { segments }
    }

    pub fn total_ticks(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.ticks)).sum()
    }

    /// One frame per scripted tick.
    pub fn frames(&self) -> Vec<InputFrame> {
        let mut latch = InputLatch::new();
        let mut frames = Vec::new();
        for segment in &self.segments {
            let held = segment.held();
            for _ in 0..segment.ticks {
                frames.push(latch.next(held));
            }
        }
        frames
    }
}
