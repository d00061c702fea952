//! Fifteen: a patience game on fifteen piles where the goal is to gather
//! every rank into a pile of four.
//!
//! The crate holds the game core: legality rules, tap-to-move resolution,
//! undo/redo, the backtracking solver and a versioned save format. The
//! [`controller::Controller`] ties them together for a front end.

pub mod card;
pub mod controller;
pub mod display;
pub mod error;
pub mod history;
pub mod persist;
pub mod pile;
pub mod resolver;
pub mod rules;
pub mod solver;
pub mod state;

pub use card::{Card, Deck, Rank, Suit};
pub use controller::{Controller, TapOutcome};
pub use error::GameError;
pub use pile::Pile;
pub use solver::{CancelToken, SolveOutcome, SolverConfig};
pub use state::{GameState, Move};
