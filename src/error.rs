//! Error types for the game core.
//!
//! Taps that have nowhere to go and solver searches that find nothing are
//! ordinary outcomes and never show up here.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A move handed to `apply_move` does not match the board.
    #[error("illegal move from pile {from} to pile {to}: {reason}")]
    IllegalMove {
        from: usize,
        to: usize,
        reason: &'static str,
    },

    /// Saved data could not be turned back into a game.
    #[error("validation error: {0}")]
    Validation(String),

    /// The piles no longer hold the full deck exactly once.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl GameError {
    pub fn illegal(from: usize, to: usize, reason: &'static str) -> Self {
        Self::IllegalMove { from, to, reason }
    }

    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Validation(format!("malformed save data: {err}"))
    }
}
