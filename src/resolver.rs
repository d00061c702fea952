//! Tap-to-move: turning a tap on a single pile into a concrete move.
//!
//! Candidates are the non-empty legal targets in pile order, followed by the
//! empty targets nearest first. A fresh tap takes the first candidate.
//! Tapping the card the previous tap moved takes that move back and sends
//! the card from its original pile to the next candidate, so repeated taps
//! walk every legal destination of the original tap.

use super::pile::Pile;
use super::rules;
use super::state::{GameState, Move};

/// Memory of the previous tap, used to cycle through destinations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TapCycle {
    last: Option<Move>,
    position: usize,
}

impl TapCycle {
    pub fn reset(&mut self) {
        *self = TapCycle::default();
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

/// What a tap should do to the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapResolution {
    /// Play a new move.
    Fresh(Move),
    /// Take back `previous`, the latest move in the history, then play `next`.
    Retarget { previous: Move, next: Move },
}

impl TapResolution {
    /// The move that ends up on the board.
    pub fn played(&self) -> Move {
        match *self {
            TapResolution::Fresh(mv) => mv,
            TapResolution::Retarget { next, .. } => next,
        }
    }
}

/// Legal destinations for the top card of `from`, in preference order.
pub fn candidate_targets(state: &GameState, from: usize) -> Vec<usize> {
    targets_on(state.piles(), from)
}

fn targets_on(piles: &[Pile], from: usize) -> Vec<usize> {
    let (mut matching, mut empty): (Vec<usize>, Vec<usize>) = (0..piles.len())
        .filter(|&to| rules::is_legal_move(piles, from, to))
        .partition(|&to| !piles[to].is_empty());

    matching.sort_unstable();
    empty.sort_by_key(|&to| (to.abs_diff(from), to));
    matching.extend(empty);
    matching
}

/// The move a fresh tap on `from` produces, or `None` when the top card has
/// nowhere to go.
pub fn resolve_move(state: &GameState, from: usize) -> Option<Move> {
    let card = *state.pile(from)?.top()?;
    let to = *candidate_targets(state, from).first()?;
    Some(Move::new(from, to, card))
}

/// Like [`resolve_move`], but continues the cycle when `from` holds the card
/// the previous tap moved and that move is still the latest in the history.
/// Returns the resolution together with the cycle to remember for the next
/// tap.
pub fn resolve_tap(
    state: &GameState,
    from: usize,
    cycle: &TapCycle,
) -> Option<(TapResolution, TapCycle)> {
    let card = *state.pile(from)?.top()?;

    if let Some(previous) = cycle.last {
        let latest = state.move_history().last() == Some(&previous);
        if latest && previous.to_pile == from && previous.card == card {
            // Candidates as they were before the previous move.
            let mut before = state.piles().to_vec();
            if let Some(lifted) = before[from].take_top() {
                before[previous.from_pile].put_on_top(lifted);
            }
            let candidates = targets_on(&before, previous.from_pile);
            if !candidates.is_empty() {
                let position = (cycle.position + 1) % candidates.len();
                let next = Move::new(previous.from_pile, candidates[position], card);
                let cycle = TapCycle {
                    last: Some(next),
                    position,
                };
                return Some((TapResolution::Retarget { previous, next }, cycle));
            }
        }
    }

    let mv = resolve_move(state, from)?;
    let cycle = TapCycle {
        last: Some(mv),
        position: 0,
    };
    Some((TapResolution::Fresh(mv), cycle))
}
