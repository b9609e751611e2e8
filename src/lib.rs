//! Chess Clock - a two-player countdown clock engine and its HTTP host
//!
//! The [`engine`] module holds the timing state machine. Everything else is
//! host plumbing: shared state, the polling ticker, and the HTTP surface used
//! for input events, settings and display reads.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use engine::{ClockEngine, ClockSnapshot, ClockTime, Side};
pub use error::AppError;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
