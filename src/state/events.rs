//! Clock transition notifications

use serde::{Deserialize, Serialize};

use crate::engine::Side;

/// A state transition observed by the host, broadcast to background tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClockEvent {
    Started { side: Side },
    Stopped,
    Switched { to: Side },
    Flagged { side: Side },
    Configured,
    Reset,
}

impl ClockEvent {
    /// Whether the clock is left running after this event
    pub fn leaves_running(&self) -> bool {
        matches!(self, ClockEvent::Started { .. } | ClockEvent::Switched { .. })
    }
}
