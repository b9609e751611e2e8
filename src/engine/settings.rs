//! Clock configuration and its validation boundary
//!
//! Text typed into a settings form is checked here before any of it reaches
//! the engine. The engine only ever receives [`ClockSettings`], which holds
//! already range-checked integers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ClockEngine, ClockTime, EngineError, Side};

pub const MAX_MINUTES: u64 = 999;
pub const MAX_SECONDS: u64 = 59;
pub const MAX_TENTHS: u64 = 9;
pub const MAX_INCREMENT_SECONDS: u64 = 600;

/// A single editable settings field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsField {
    Minutes,
    Seconds,
    Tenths,
    IncrementSeconds,
}

impl SettingsField {
    pub fn max(self) -> u64 {
        match self {
            SettingsField::Minutes => MAX_MINUTES,
            SettingsField::Seconds => MAX_SECONDS,
            SettingsField::Tenths => MAX_TENTHS,
            SettingsField::IncrementSeconds => MAX_INCREMENT_SECONDS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SettingsField::Minutes => "minutes",
            SettingsField::Seconds => "seconds",
            SettingsField::Tenths => "tenths",
            SettingsField::IncrementSeconds => "increment_seconds",
        }
    }
}

impl std::fmt::Display for SettingsField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected settings input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{side} {field} is empty")]
    Empty { side: Side, field: SettingsField },

    #[error("{side} {field} must contain only digits, got {value:?}")]
    NotNumeric { side: Side, field: SettingsField, value: String },

    #[error("{side} {field} must be at most {max}, got {value}")]
    OutOfRange { side: Side, field: SettingsField, value: u64, max: u64 },
}

impl SettingsError {
    pub fn side(&self) -> Side {
        match self {
            SettingsError::Empty { side, .. }
            | SettingsError::NotNumeric { side, .. }
            | SettingsError::OutOfRange { side, .. } => *side,
        }
    }

    pub fn field(&self) -> SettingsField {
        match self {
            SettingsError::Empty { field, .. }
            | SettingsError::NotNumeric { field, .. }
            | SettingsError::OutOfRange { field, .. } => *field,
        }
    }
}

/// Editing filter for settings fields: digits only, empty allowed while typing
pub fn is_editable(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}

/// Validated configuration for one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SideSettings {
    pub minutes: u64,
    pub seconds: u64,
    pub tenths: u64,
    pub increment_seconds: u64,
}

impl SideSettings {
    pub fn from_minutes(minutes: u64, increment_seconds: u64) -> Self {
        Self { minutes, seconds: 0, tenths: 0, increment_seconds }
    }

    pub fn remaining(&self) -> ClockTime {
        ClockTime::from_parts(self.minutes, self.seconds, self.tenths)
    }

    /// Check each component against its field range
    pub fn validate(&self, side: Side) -> Result<(), SettingsError> {
        let fields = [
            (SettingsField::Minutes, self.minutes),
            (SettingsField::Seconds, self.seconds),
            (SettingsField::Tenths, self.tenths),
            (SettingsField::IncrementSeconds, self.increment_seconds),
        ];
        for (field, value) in fields {
            if value > field.max() {
                return Err(SettingsError::OutOfRange { side, field, value, max: field.max() });
            }
        }
        Ok(())
    }
}

/// Validated configuration for both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClockSettings {
    pub left: SideSettings,
    pub right: SideSettings,
}

impl ClockSettings {
    pub fn symmetric(side: SideSettings) -> Self {
        Self { left: side, right: side }
    }

    pub fn side(&self, side: Side) -> &SideSettings {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.left.validate(Side::Left)?;
        self.right.validate(Side::Right)
    }

    /// Build a stopped engine from these settings
    pub fn build_engine(&self, first: Side) -> ClockEngine {
        ClockEngine::new(self.left.remaining(), self.right.remaining())
            .with_increments(
                ClockTime::from_secs(self.left.increment_seconds),
                ClockTime::from_secs(self.right.increment_seconds),
            )
            .with_active_side(first)
    }
}

/// Raw text of one side's settings fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SideForm {
    pub minutes: String,
    pub seconds: String,
    pub tenths: String,
    pub increment_seconds: String,
}

impl SideForm {
    fn parse(&self, side: Side) -> Result<SideSettings, SettingsError> {
        let settings = SideSettings {
            minutes: parse_field(side, SettingsField::Minutes, &self.minutes)?,
            seconds: parse_field(side, SettingsField::Seconds, &self.seconds)?,
            tenths: parse_field(side, SettingsField::Tenths, &self.tenths)?,
            increment_seconds: parse_field(side, SettingsField::IncrementSeconds, &self.increment_seconds)?,
        };
        settings.validate(side)?;
        Ok(settings)
    }
}

/// Raw text of the whole settings form, as submitted by a user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettingsForm {
    pub left: SideForm,
    pub right: SideForm,
}

impl SettingsForm {
    /// Prefill the form with the engine's current values
    pub fn from_engine(engine: &ClockEngine) -> Self {
        let side_form = |side: Side| {
            let remaining = engine.remaining(side);
            SideForm {
                minutes: remaining.minutes().to_string(),
                seconds: remaining.seconds().to_string(),
                tenths: remaining.tenths().to_string(),
                increment_seconds: engine.increment_secs(side).to_string(),
            }
        };
        Self { left: side_form(Side::Left), right: side_form(Side::Right) }
    }

    /// Parse every field, reporting the first invalid one
    pub fn validate(&self) -> Result<ClockSettings, SettingsError> {
        Ok(ClockSettings {
            left: self.left.parse(Side::Left)?,
            right: self.right.parse(Side::Right)?,
        })
    }
}

fn parse_field(side: Side, field: SettingsField, raw: &str) -> Result<u64, SettingsError> {
    if raw.is_empty() {
        return Err(SettingsError::Empty { side, field });
    }
    if !is_editable(raw) {
        return Err(SettingsError::NotNumeric { side, field, value: raw.to_string() });
    }
    // Digits only, so the only possible parse failure is overflow
    raw.parse::<u64>()
        .map_err(|_| SettingsError::OutOfRange { side, field, value: u64::MAX, max: field.max() })
}

impl ClockEngine {
    /// Apply validated settings to both sides at once. Rejected while running.
    pub fn apply_settings(&mut self, settings: &ClockSettings) -> Result<(), EngineError> {
        self.ensure_stopped()?;
        for side in Side::BOTH {
            let values = settings.side(side);
            self.set_remaining_parts(side, values.minutes, values.seconds, values.tenths)?;
            self.set_increment_secs(side, values.increment_seconds)?;
        }
        Ok(())
    }
}
