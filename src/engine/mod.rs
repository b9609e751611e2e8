//! Chess clock timing engine
//!
//! Pure, synchronous state machine. Callers supply every timestamp, so the
//! engine never reads the system clock itself.

pub mod clock;
pub mod error;
pub mod settings;
pub mod side;
pub mod snapshot;
pub mod time;

pub use clock::{ClockEngine, ClockPhase, DEFAULT_BASE_TIME};
pub use error::EngineError;
pub use settings::{ClockSettings, SettingsError, SettingsField, SettingsForm, SideForm, SideSettings};
pub use side::Side;
pub use snapshot::{ClockSnapshot, SideSnapshot};
pub use time::ClockTime;
