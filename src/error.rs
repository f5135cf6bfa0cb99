//! Unified error types for the tracker.
//!
//! Visibility denial is deliberately absent: it is a first-class gate
//! outcome (`feed::visibility::Visibility`), not an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    /// Bankroll settings that would make the unit value undefined.
    #[error("invalid bankroll configuration: {0}")]
    InvalidConfiguration(String),

    /// A write targeted a bet id that does not exist.
    #[error("unknown bet: {0}")]
    UnknownBet(i64),

    /// A lookup or plan change targeted a user id that does not exist.
    #[error("unknown user: {0}")]
    UnknownUser(String),

    /// Anything that went wrong at the storage boundary.
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
