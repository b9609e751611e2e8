//! State management module
//!
//! This module owns the shared clock engine and the channels that announce
//! its changes to background tasks and display subscribers.

pub mod app_state;
pub mod events;

// Re-export main types
pub use app_state::{now, AppState};
pub use events::ClockEvent;
