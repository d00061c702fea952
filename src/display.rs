//! Plain-text rendering of a game for the terminal and for logs.

use std::fmt::{self, Write};

use super::rules;
use super::solver::SolveOutcome;
use super::state::{GameState, Move};

/// One line per pile, bottom card first, completed piles marked.
pub fn render_board(state: &GameState) -> String {
    let mut out = String::new();
    for pile in state.piles() {
        let cards: Vec<String> = pile.cards().iter().map(|c| c.to_string()).collect();
        let body = if cards.is_empty() {
            "empty".to_string()
        } else {
            cards.join(" ")
        };
        let mark = if pile.is_complete() { "  ✓" } else { "" };
        let _ = writeln!(out, "P{:<2} [{}]{}", pile.id, body, mark);
    }
    let _ = writeln!(
        out,
        "Completed: {}/13  Moves: {}  Games won: {}{}",
        rules::completed_piles(state.piles()),
        state.move_history().len(),
        state.games_won_count(),
        if state.is_won() { "  WON" } else { "" }
    );
    out
}

pub fn describe_move(mv: &Move) -> String {
    format!("{} from pile {} to pile {}", mv.card, mv.from_pile, mv.to_pile)
}

pub fn render_history(state: &GameState) -> String {
    let mut out = String::new();
    for (i, mv) in state.move_history().iter().enumerate() {
        let _ = writeln!(out, "{:3}: {}", i + 1, describe_move(mv));
    }
    out
}

/// One-line summary of a search result. An exhausted search is not reported
/// as a proof: merged boards may hide a win.
pub fn describe_outcome(outcome: &SolveOutcome) -> String {
    match outcome {
        SolveOutcome::Solved(moves) => format!("Solution found: {} moves", moves.len()),
        SolveOutcome::Exhausted => "No solution found (search exhausted)".to_string(),
        SolveOutcome::BudgetExceeded => "No solution found (node budget spent)".to_string(),
        SolveOutcome::Cancelled => "Search cancelled".to_string(),
    }
}

/// Debug listing of every legal move on the board.
pub fn render_legal_moves(state: &GameState) -> String {
    let mut out = String::new();
    for (from, to) in rules::legal_moves(state.piles()) {
        let _ = writeln!(out, "Can move from pile {from} to {to}");
    }
    out
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_board(self))?;
        if self.debug_mode() {
            f.write_str(&render_legal_moves(self))?;
        }
        Ok(())
    }
}
