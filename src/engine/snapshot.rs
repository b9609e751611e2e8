//! Read-only view of the engine for display collaborators

use serde::{Deserialize, Serialize};

use super::{ClockTime, Side};

/// Display values for a single side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSnapshot {
    pub minutes: u64,
    pub seconds: u64,
    pub tenths: u64,
    /// Remaining time rendered as `MM:SS:T`
    pub display: String,
    pub remaining_tenths: u64,
    pub increment_seconds: u64,
    /// True while this side is active and the clock is running
    pub highlighted: bool,
}

impl SideSnapshot {
    pub(crate) fn new(remaining: ClockTime, increment: ClockTime, highlighted: bool) -> Self {
        Self {
            minutes: remaining.minutes(),
            seconds: remaining.seconds(),
            tenths: remaining.tenths(),
            display: remaining.to_string(),
            remaining_tenths: remaining.as_tenths(),
            increment_seconds: increment.as_secs(),
            highlighted,
        }
    }
}

/// Everything a display needs after any engine operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    pub left: SideSnapshot,
    pub right: SideSnapshot,
    pub active_side: Side,
    pub running: bool,
    pub flagged: Option<Side>,
}

impl ClockSnapshot {
    pub fn side(&self, side: Side) -> &SideSnapshot {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}
