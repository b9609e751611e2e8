//! Two-sided countdown engine
//!
//! `ClockEngine` owns the ground truth for both sides' remaining time. Time is
//! only ever taken off a side inside [`ClockEngine::advance`], which measures
//! real elapsed time from an anchor instant instead of counting fixed ticks, so
//! a late poll still charges the full time that passed.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ClockSnapshot, ClockTime, EngineError, Side, SideSnapshot};

/// Default base time per side (5 minutes)
pub const DEFAULT_BASE_TIME: ClockTime = ClockTime::from_minutes(5);

/// Coarse state of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockPhase {
    /// Not counting; configuration may change
    Stopped,
    /// The active side is counting down
    Running,
    /// Stopped with one side at zero; `start` is refused until time is reconfigured
    Flagged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct SideClock {
    remaining: ClockTime,
    increment: ClockTime,
}

/// Chess clock timing state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockEngine {
    left: SideClock,
    right: SideClock,
    active: Side,
    /// Instant the running interval began or was last re-synchronized.
    /// `Some` exactly while the clock is running.
    anchor: Option<Instant>,
}

impl ClockEngine {
    /// Create a stopped engine with no increments and the left side active
    pub fn new(left_remaining: ClockTime, right_remaining: ClockTime) -> Self {
        Self {
            left: SideClock { remaining: left_remaining, increment: ClockTime::ZERO },
            right: SideClock { remaining: right_remaining, increment: ClockTime::ZERO },
            active: Side::Left,
            anchor: None,
        }
    }

    pub fn with_increments(mut self, left: ClockTime, right: ClockTime) -> Self {
        self.left.increment = left;
        self.right.increment = right;
        self
    }

    pub fn with_active_side(mut self, side: Side) -> Self {
        self.active = side;
        self
    }

    pub fn is_running(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn active_side(&self) -> Side {
        self.active
    }

    pub fn remaining(&self, side: Side) -> ClockTime {
        self.side(side).remaining
    }

    pub fn increment(&self, side: Side) -> ClockTime {
        self.side(side).increment
    }

    /// Increment for `side` in whole seconds
    pub fn increment_secs(&self, side: Side) -> u64 {
        self.side(side).increment.as_secs()
    }

    /// The side whose time has run out, if any. The active side is reported
    /// first when both are at zero.
    pub fn flagged_side(&self) -> Option<Side> {
        [self.active, self.active.other()]
            .into_iter()
            .find(|&side| self.side(side).remaining.is_zero())
    }

    pub fn phase(&self) -> ClockPhase {
        if self.is_running() {
            ClockPhase::Running
        } else if self.flagged_side().is_some() {
            ClockPhase::Flagged
        } else {
            ClockPhase::Stopped
        }
    }

    /// Settle elapsed running time against the active side.
    ///
    /// No-op while stopped. Whole tenths since the anchor are subtracted and
    /// the anchor is reset to `now`. Reaching zero clamps the side to zero and
    /// stops the clock.
    pub fn advance(&mut self, now: Instant) {
        let Some(anchor) = self.anchor else {
            return;
        };

        let elapsed = ClockTime::floor_duration(now.saturating_duration_since(anchor));
        let active = self.active;
        let clock = self.side_mut(active);
        clock.remaining = clock.remaining.saturating_sub(elapsed);

        if clock.remaining.is_zero() {
            self.anchor = None;
            debug!(side = %active, "flag fell");
        } else {
            self.anchor = Some(now);
        }
    }

    /// Begin counting down the active side.
    ///
    /// Refused when either side is already at zero. Calling it while running
    /// leaves the anchor untouched.
    pub fn start(&mut self, now: Instant) -> Result<(), EngineError> {
        if self.is_running() {
            return Ok(());
        }
        if let Some(side) = self.flagged_side() {
            return Err(EngineError::TimeExpired(side));
        }
        self.anchor = Some(now);
        Ok(())
    }

    /// Settle elapsed time and stop counting. Idempotent.
    pub fn stop(&mut self, now: Instant) {
        self.advance(now);
        self.anchor = None;
    }

    pub fn toggle_running(&mut self, now: Instant) -> Result<(), EngineError> {
        if self.is_running() {
            self.stop(now);
            Ok(())
        } else {
            self.start(now)
        }
    }

    /// Hand control to the other side.
    ///
    /// While running, the outgoing side is settled and then credited its
    /// increment, unless settling made its flag fall. While stopped this only
    /// flips the active side.
    pub fn switch_side(&mut self, now: Instant) {
        self.advance(now);

        let outgoing = self.active;
        if self.is_running() {
            let clock = self.side_mut(outgoing);
            if !clock.remaining.is_zero() {
                clock.remaining = clock.remaining.saturating_add(clock.increment);
            }
            self.anchor = Some(now);
        }
        self.active = outgoing.other();
        debug!(from = %outgoing, to = %self.active, running = self.is_running(), "side switched");
    }

    pub fn set_remaining(&mut self, side: Side, remaining: ClockTime) -> Result<(), EngineError> {
        self.ensure_stopped()?;
        self.side_mut(side).remaining = remaining;
        Ok(())
    }

    /// Set remaining time from display components
    pub fn set_remaining_parts(
        &mut self,
        side: Side,
        minutes: u64,
        seconds: u64,
        tenths: u64,
    ) -> Result<(), EngineError> {
        self.set_remaining(side, ClockTime::from_parts(minutes, seconds, tenths))
    }

    pub fn set_increment_secs(&mut self, side: Side, seconds: u64) -> Result<(), EngineError> {
        self.ensure_stopped()?;
        self.side_mut(side).increment = ClockTime::from_secs(seconds);
        Ok(())
    }

    /// Choose which side moves first. Never credits an increment.
    pub fn set_active_side(&mut self, side: Side) -> Result<(), EngineError> {
        self.ensure_stopped()?;
        self.active = side;
        Ok(())
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        let running = self.is_running();
        let side_snapshot = |side: Side| {
            let clock = self.side(side);
            SideSnapshot::new(clock.remaining, clock.increment, running && self.active == side)
        };

        ClockSnapshot {
            left: side_snapshot(Side::Left),
            right: side_snapshot(Side::Right),
            active_side: self.active,
            running,
            flagged: if running { None } else { self.flagged_side() },
        }
    }

    pub(crate) fn ensure_stopped(&self) -> Result<(), EngineError> {
        if self.is_running() {
            Err(EngineError::Busy)
        } else {
            Ok(())
        }
    }

    fn side(&self, side: Side) -> &SideClock {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideClock {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

impl Default for ClockEngine {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_TIME, DEFAULT_BASE_TIME)
    }
}
