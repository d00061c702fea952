//! Move legality and win detection.
//!
//! Everything here is a pure function of the piles. The solver calls these
//! for every node it expands, so they stay allocation free except for
//! `legal_moves`.

use super::card::Card;
use super::pile::Pile;

/// Whether the top card of `from` may go onto `to`.
///
/// An empty target always accepts a card. A non-empty target accepts a card
/// of the same rank as its own top while it holds fewer than four cards.
/// Suits never matter.
pub fn is_legal_move(piles: &[Pile], from: usize, to: usize) -> bool {
    if from == to {
        return false;
    }
    let (Some(src), Some(dst)) = (piles.get(from), piles.get(to)) else {
        return false;
    };
    match src.top() {
        Some(card) => is_card_placable_on_pile(card, dst),
        None => false,
    }
}

#[inline]
fn is_card_placable_on_pile(card: &Card, pile: &Pile) -> bool {
    match pile.top() {
        None => true,
        Some(dest) => pile.has_room() && dest.rank == card.rank,
    }
}

/// Every legal `(from, to)` pair, ordered by `from` then `to`.
pub fn legal_moves(piles: &[Pile]) -> Vec<(usize, usize)> {
    let mut moves = Vec::new();
    for from in 0..piles.len() {
        if piles[from].is_empty() {
            continue;
        }
        for to in 0..piles.len() {
            if is_legal_move(piles, from, to) {
                moves.push((from, to));
            }
        }
    }
    moves
}

/// Every non-empty pile is a completed pile. Empty piles are ignored.
#[inline]
pub fn is_won(piles: &[Pile]) -> bool {
    piles.iter().all(|p| p.is_empty() || p.is_complete())
}

pub fn completed_piles(piles: &[Pile]) -> usize {
    piles.iter().filter(|p| p.is_complete()).count()
}
