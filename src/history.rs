//! Applying, undoing and redoing moves, plus the whole-board resets.
//!
//! Every function here keeps the win flag and the games-won counter in step
//! with the piles: the counter goes up once when a move turns the board into
//! a win and back down once when that move is undone.

use tracing::{debug, info};

use super::card::{Card, Deck, Rank};
use super::error::GameError;
use super::rules;
use super::state::{GameState, Move, EMPTY_SLOTS, PILE_COUNT};

/// Plays `mv` on the board and records it. Clears the redo stack.
///
/// The move must describe the current top card of its source pile and be
/// legal; otherwise the state is left untouched.
pub fn apply_move(state: &mut GameState, mv: Move) -> Result<(), GameError> {
    play(state, mv)?;
    state.move_history.push(mv);
    state.redo_stack.clear();
    Ok(())
}

/// Takes back the most recent move. Returns `Ok(None)` when there is no
/// history. If the recorded card is no longer on top of its target pile the
/// state is left untouched.
pub fn undo(state: &mut GameState) -> Result<Option<Move>, GameError> {
    let Some(&mv) = state.move_history.last() else {
        return Ok(None);
    };
    if state.pile(mv.to_pile).and_then(|p| p.top()) != Some(&mv.card) {
        return Err(GameError::InvariantViolation(format!(
            "undo expected {} on top of pile {}",
            mv.card.id(),
            mv.to_pile
        )));
    }
    state.move_history.pop();
    if let Some(card) = state.piles[mv.to_pile].take_top() {
        state.piles[mv.from_pile].put_on_top(card);
    }

    if state.is_won {
        state.games_won_count = state.games_won_count.saturating_sub(1);
    }
    state.is_won = rules::is_won(&state.piles);
    state.redo_stack.push(mv);
    debug!(from = mv.from_pile, to = mv.to_pile, card = %mv.card, "undo");
    Ok(Some(mv))
}

/// Replays the most recently undone move. Returns `Ok(None)` when there is
/// nothing to redo.
pub fn redo(state: &mut GameState) -> Result<Option<Move>, GameError> {
    let Some(mv) = state.redo_stack.pop() else {
        return Ok(None);
    };
    if let Err(err) = play(state, mv) {
        state.redo_stack.push(mv);
        return Err(err);
    }
    state.move_history.push(mv);
    debug!(from = mv.from_pile, to = mv.to_pile, card = %mv.card, "redo");
    Ok(Some(mv))
}

/// Deals a fresh shuffled game. Keeps the games-won counter and debug flag.
pub fn new_game(state: &mut GameState) {
    new_game_from_deck(state, Deck::shuffled());
}

pub fn new_game_from_deck(state: &mut GameState, deck: Vec<Card>) {
    let games_won_count = state.games_won_count;
    let debug_mode = state.debug_mode;
    *state = GameState::deal(deck).with_games_won(games_won_count);
    state.debug_mode = debug_mode;
    info!(games_won = games_won_count, "new game dealt");
}

/// Rearranges the cards on the board into a winning layout: one completed
/// pile per rank and the deal's empty slots left empty. History is dropped
/// since the layout is not reachable by recorded moves.
pub fn force_win(state: &mut GameState) {
    let mut by_rank: Vec<Vec<Card>> = vec![Vec::new(); Rank::all().len()];
    for pile in state.piles.iter_mut() {
        while let Some(card) = pile.take_top() {
            by_rank[card.rank as usize].push(card);
        }
    }

    let mut groups = by_rank.into_iter();
    for id in (0..PILE_COUNT).filter(|id| !EMPTY_SLOTS.contains(id)) {
        let Some(mut group) = groups.next() else {
            break;
        };
        group.sort_by_key(|c| c.suit.index());
        for card in group {
            state.piles[id].put_on_top(card);
        }
    }

    state.move_history.clear();
    state.redo_stack.clear();
    if !state.is_won {
        state.games_won_count += 1;
    }
    state.is_won = rules::is_won(&state.piles);
    info!(games_won = state.games_won_count, "board forced into a win");
}

fn play(state: &mut GameState, mv: Move) -> Result<(), GameError> {
    let top = state
        .pile(mv.from_pile)
        .ok_or(GameError::illegal(mv.from_pile, mv.to_pile, "no such pile"))?
        .top();
    if top != Some(&mv.card) {
        return Err(GameError::illegal(
            mv.from_pile,
            mv.to_pile,
            "card is not on top of the source pile",
        ));
    }
    if !rules::is_legal_move(&state.piles, mv.from_pile, mv.to_pile) {
        return Err(GameError::illegal(
            mv.from_pile,
            mv.to_pile,
            "target does not accept the card",
        ));
    }

    if let Some(card) = state.piles[mv.from_pile].take_top() {
        state.piles[mv.to_pile].put_on_top(card);
    }

    let was_won = state.is_won;
    state.is_won = rules::is_won(&state.piles);
    if state.is_won && !was_won {
        state.games_won_count += 1;
        info!(games_won = state.games_won_count, "game won");
    }
    debug!(from = mv.from_pile, to = mv.to_pile, card = %mv.card, "move");
    Ok(())
}
