//! Clock time quantities measured in tenths of a second

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Tenths of a second in one minute
pub const TENTHS_PER_MINUTE: u64 = 600;
/// Tenths of a second in one second
pub const TENTHS_PER_SECOND: u64 = 10;
/// Milliseconds covered by one tenth
pub const MILLIS_PER_TENTH: u64 = 100;

/// A non-negative amount of clock time, stored as whole tenths of a second.
///
/// All arithmetic saturates, so a `ClockTime` can never go below zero or wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClockTime(u64);

impl ClockTime {
    pub const ZERO: ClockTime = ClockTime(0);

    pub const fn from_tenths(tenths: u64) -> Self {
        Self(tenths)
    }

    pub const fn from_secs(seconds: u64) -> Self {
        Self(seconds.saturating_mul(TENTHS_PER_SECOND))
    }

    pub const fn from_minutes(minutes: u64) -> Self {
        Self(minutes.saturating_mul(TENTHS_PER_MINUTE))
    }

    /// Compose a time from its display components.
    ///
    /// Components are not required to be normalized: `seconds = 75` simply
    /// contributes 750 tenths.
    pub const fn from_parts(minutes: u64, seconds: u64, tenths: u64) -> Self {
        Self(
            minutes
                .saturating_mul(TENTHS_PER_MINUTE)
                .saturating_add(seconds.saturating_mul(TENTHS_PER_SECOND))
                .saturating_add(tenths),
        )
    }

    /// Whole tenths elapsed in `duration`, rounded down
    pub fn floor_duration(duration: Duration) -> Self {
        let tenths = duration.as_millis() / u128::from(MILLIS_PER_TENTH);
        Self(u64::try_from(tenths).unwrap_or(u64::MAX))
    }

    pub const fn as_tenths(self) -> u64 {
        self.0
    }

    /// Whole seconds, dropping any tenths
    pub const fn as_secs(self) -> u64 {
        self.0 / TENTHS_PER_SECOND
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0.saturating_mul(MILLIS_PER_TENTH))
    }

    pub const fn minutes(self) -> u64 {
        self.0 / TENTHS_PER_MINUTE
    }

    /// Seconds within the current minute (0..=59)
    pub const fn seconds(self) -> u64 {
        (self.0 % TENTHS_PER_MINUTE) / TENTHS_PER_SECOND
    }

    /// Tenths within the current second (0..=9)
    pub const fn tenths(self) -> u64 {
        self.0 % TENTHS_PER_SECOND
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn saturating_add(self, other: ClockTime) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub const fn saturating_sub(self, other: ClockTime) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

/// Renders as `MM:SS:T`; minutes widen past two digits when needed.
impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{}", self.minutes(), self.seconds(), self.tenths())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decomposes_into_display_components() {
        let time = ClockTime::from_tenths(754);
        assert_eq!(time.minutes(), 1);
        assert_eq!(time.seconds(), 15);
        assert_eq!(time.tenths(), 4);
    }

    #[test]
    fn composes_from_display_components() {
        assert_eq!(ClockTime::from_parts(1, 5, 4).as_tenths(), 654);
        assert_eq!(ClockTime::from_parts(0, 75, 4).as_tenths(), 754);
        assert_eq!(ClockTime::from_parts(5, 0, 0), ClockTime::from_minutes(5));
    }

    #[test]
    fn formats_as_minutes_seconds_tenths() {
        assert_eq!(ClockTime::from_minutes(5).to_string(), "05:00:0");
        assert_eq!(ClockTime::from_tenths(2988).to_string(), "04:58:8");
        assert_eq!(ClockTime::ZERO.to_string(), "00:00:0");
        assert_eq!(ClockTime::from_minutes(120).to_string(), "120:00:0");
    }

    #[test]
    fn floors_partial_tenths() {
        assert_eq!(ClockTime::floor_duration(Duration::from_millis(1230)).as_tenths(), 12);
        assert_eq!(ClockTime::floor_duration(Duration::from_millis(99)).as_tenths(), 0);
        assert_eq!(ClockTime::floor_duration(Duration::from_millis(100)).as_tenths(), 1);
    }

    #[test]
    fn subtraction_saturates_at_zero() {
        let time = ClockTime::from_tenths(3);
        assert_eq!(time.saturating_sub(ClockTime::from_tenths(5)), ClockTime::ZERO);
    }

    proptest! {
        #[test]
        fn components_recompose_to_original(tenths in 0u64..10_000_000) {
            let time = ClockTime::from_tenths(tenths);
            let rebuilt = ClockTime::from_parts(time.minutes(), time.seconds(), time.tenths());
            prop_assert_eq!(rebuilt, time);
            prop_assert!(time.seconds() < 60);
            prop_assert!(time.tenths() < 10);
        }
    }
}
