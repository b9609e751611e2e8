//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::engine::{ClockSettings, SettingsError, Side, SideSettings};

/// Lower bound on the ticker cadence
pub const MIN_TICK_MS: u64 = 10;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "chess-clock")]
#[command(about = "A two-player chess clock served over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Base time per side in minutes
    #[arg(short, long, default_value = "5")]
    pub minutes: u64,

    /// Increment per move in seconds
    #[arg(short, long, default_value = "0")]
    pub increment: u64,

    /// Override the left side's base time in minutes
    #[arg(long)]
    pub left_minutes: Option<u64>,

    /// Override the right side's base time in minutes
    #[arg(long)]
    pub right_minutes: Option<u64>,

    /// Override the left side's increment in seconds
    #[arg(long)]
    pub left_increment: Option<u64>,

    /// Override the right side's increment in seconds
    #[arg(long)]
    pub right_increment: Option<u64>,

    /// Side that moves first
    #[arg(long, value_enum, default_value = "left")]
    pub first: Side,

    /// How often the running clock is re-synchronized, in milliseconds
    #[arg(long, default_value = "100")]
    pub tick_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(MIN_TICK_MS))
    }

    /// Starting settings for both sides, checked with the same ranges as the
    /// settings form
    pub fn clock_settings(&self) -> Result<ClockSettings, SettingsError> {
        let settings = ClockSettings {
            left: SideSettings::from_minutes(
                self.left_minutes.unwrap_or(self.minutes),
                self.left_increment.unwrap_or(self.increment),
            ),
            right: SideSettings::from_minutes(
                self.right_minutes.unwrap_or(self.minutes),
                self.right_increment.unwrap_or(self.increment),
            ),
        };
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SettingsField;

    #[test]
    fn defaults_to_five_minutes_each() {
        let config = Config::try_parse_from(["chess-clock"]).unwrap();
        let settings = config.clock_settings().unwrap();
        assert_eq!(settings, ClockSettings::symmetric(SideSettings::from_minutes(5, 0)));
        assert_eq!(settings.left.remaining().as_tenths(), 3000);
        assert_eq!(config.first, Side::Left);
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn per_side_overrides_apply() {
        let config = Config::try_parse_from([
            "chess-clock", "-m", "3", "-i", "2", "--right-minutes", "1", "--left-increment", "0", "--first", "right",
        ])
        .unwrap();
        let settings = config.clock_settings().unwrap();
        assert_eq!(settings.left, SideSettings::from_minutes(3, 0));
        assert_eq!(settings.right, SideSettings::from_minutes(1, 2));
        assert_eq!(config.first, Side::Right);
    }

    #[test]
    fn out_of_range_presets_rejected() {
        let config = Config::try_parse_from(["chess-clock", "--left-increment", "601"]).unwrap();
        let err = config.clock_settings().unwrap_err();
        assert_eq!(err.side(), Side::Left);
        assert_eq!(err.field(), SettingsField::IncrementSeconds);
    }

    #[test]
    fn tick_interval_has_floor() {
        let config = Config::try_parse_from(["chess-clock", "--tick-ms", "1"]).unwrap();
        assert_eq!(config.tick_interval(), Duration::from_millis(MIN_TICK_MS));
    }
}
