//! Engine precondition failures

use thiserror::Error;

use super::Side;

/// Reasons the engine refused an operation. State is never changed when one
/// of these is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("clock is running; stop it before changing its configuration")]
    Busy,

    #[error("{0} side has no time left; reconfigure or reset the clock")]
    TimeExpired(Side),
}
