//! Save format for a game in progress.
//!
//! The JSON layout follows the saves written by earlier versions of the game:
//! camelCase keys, cards as `{suit, value, id}`. Fields added later
//! (`redoStack`, `gameWon`, `version`) are optional so old saves still load.
//! Everything is validated on the way in; a save that would break the card
//! conservation invariant or the undo/redo history is refused.

use serde::{Deserialize, Serialize};

use super::card::{Card, Rank, Suit};
use super::error::GameError;
use super::pile::{Pile, PILE_CAPACITY};
use super::rules;
use super::state::{check_conservation, GameState, Move, EMPTY_SLOTS, PILE_COUNT};

pub const SAVE_VERSION: u32 = 2;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct SavedGame {
    #[serde(default)]
    version: u32,
    piles: Vec<SavedPile>,
    #[serde(default)]
    move_history: Vec<SavedMove>,
    #[serde(default)]
    redo_stack: Vec<SavedMove>,
    #[serde(default)]
    games_won: u32,
    #[serde(default)]
    game_won: Option<bool>,
    #[serde(default)]
    debug_mode: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct SavedPile {
    id: usize,
    cards: Vec<SavedCard>,
    #[serde(rename = "isEmpty", default)]
    is_empty: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct SavedCard {
    suit: Suit,
    value: Rank,
    id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct SavedMove {
    from_pile: usize,
    to_pile: usize,
    card: SavedCard,
}

impl From<&Card> for SavedCard {
    fn from(card: &Card) -> Self {
        SavedCard {
            suit: card.suit,
            value: card.rank,
            id: card.id(),
        }
    }
}

impl TryFrom<SavedCard> for Card {
    type Error = GameError;

    fn try_from(saved: SavedCard) -> Result<Self, Self::Error> {
        let card = Card::new(saved.suit, saved.value);
        if card.id() != saved.id {
            return Err(GameError::validation(format!(
                "card id {} does not match {}",
                saved.id,
                card.id()
            )));
        }
        Ok(card)
    }
}

impl From<&Move> for SavedMove {
    fn from(mv: &Move) -> Self {
        SavedMove {
            from_pile: mv.from_pile,
            to_pile: mv.to_pile,
            card: SavedCard::from(&mv.card),
        }
    }
}

impl TryFrom<SavedMove> for Move {
    type Error = GameError;

    fn try_from(saved: SavedMove) -> Result<Self, Self::Error> {
        if saved.from_pile >= PILE_COUNT || saved.to_pile >= PILE_COUNT {
            return Err(GameError::validation(format!(
                "move {} -> {} is out of range",
                saved.from_pile, saved.to_pile
            )));
        }
        if saved.from_pile == saved.to_pile {
            return Err(GameError::validation(format!(
                "move from pile {} onto itself",
                saved.from_pile
            )));
        }
        Ok(Move::new(saved.from_pile, saved.to_pile, saved.card.try_into()?))
    }
}

impl From<&GameState> for SavedGame {
    fn from(state: &GameState) -> Self {
        SavedGame {
            version: SAVE_VERSION,
            piles: state
                .piles()
                .iter()
                .map(|pile| SavedPile {
                    id: pile.id,
                    cards: pile.cards().iter().map(SavedCard::from).collect(),
                    is_empty: Some(pile.is_empty_slot()),
                })
                .collect(),
            move_history: state.move_history().iter().map(SavedMove::from).collect(),
            redo_stack: state.redo_stack().iter().map(SavedMove::from).collect(),
            games_won: state.games_won_count(),
            game_won: Some(state.is_won()),
            debug_mode: state.debug_mode(),
        }
    }
}

impl TryFrom<SavedGame> for GameState {
    type Error = GameError;

    fn try_from(saved: SavedGame) -> Result<Self, Self::Error> {
        if saved.piles.len() != PILE_COUNT {
            return Err(GameError::validation(format!(
                "expected {PILE_COUNT} piles, found {}",
                saved.piles.len()
            )));
        }

        let mut piles = Vec::with_capacity(PILE_COUNT);
        for (index, saved_pile) in saved.piles.into_iter().enumerate() {
            if saved_pile.id != index {
                return Err(GameError::validation(format!(
                    "pile at position {index} has id {}",
                    saved_pile.id
                )));
            }
            let cards = saved_pile
                .cards
                .into_iter()
                .map(Card::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            let is_empty_slot = saved_pile
                .is_empty
                .unwrap_or_else(|| EMPTY_SLOTS.contains(&index));
            piles.push(Pile::from_cards(index, cards, is_empty_slot));
        }
        check_conservation(&piles).map_err(|err| GameError::validation(err.to_string()))?;

        let move_history = saved
            .move_history
            .into_iter()
            .map(Move::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let redo_stack = saved
            .redo_stack
            .into_iter()
            .map(Move::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        check_history(&piles, &move_history, &redo_stack)?;

        // The win flag is derived from the piles; a stale saved flag is ignored.
        let is_won = rules::is_won(&piles);
        Ok(GameState {
            piles,
            move_history,
            redo_stack,
            games_won_count: saved.games_won,
            is_won,
            debug_mode: saved.debug_mode,
        })
    }
}

/// Makes sure every recorded move can be undone and every undone move can be
/// redone from the saved board.
fn check_history(piles: &[Pile], history: &[Move], redo: &[Move]) -> Result<(), GameError> {
    let mut board = piles.to_vec();
    for mv in redo.iter().rev() {
        if board[mv.from_pile].top() != Some(&mv.card)
            || !rules::is_legal_move(&board, mv.from_pile, mv.to_pile)
        {
            return Err(GameError::validation(format!(
                "redo move {} -> {} does not fit the board",
                mv.from_pile, mv.to_pile
            )));
        }
        if let Some(card) = board[mv.from_pile].take_top() {
            board[mv.to_pile].put_on_top(card);
        }
    }

    let mut board = piles.to_vec();
    for mv in history.iter().rev() {
        if board[mv.to_pile].top() != Some(&mv.card) {
            return Err(GameError::validation(format!(
                "history move {} -> {} does not fit the board",
                mv.from_pile, mv.to_pile
            )));
        }
        if let Some(card) = board[mv.to_pile].take_top() {
            board[mv.from_pile].put_on_top(card);
        }
        if board[mv.from_pile].size() > PILE_CAPACITY
            || !rules::is_legal_move(&board, mv.from_pile, mv.to_pile)
        {
            return Err(GameError::validation(format!(
                "history move {} -> {} was not legal when played",
                mv.from_pile, mv.to_pile
            )));
        }
    }
    Ok(())
}

pub fn serialize(state: &GameState) -> serde_json::Result<String> {
    serde_json::to_string(&SavedGame::from(state))
}

pub fn serialize_pretty(state: &GameState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&SavedGame::from(state))
}

/// Parses and validates a save. Any problem is reported as
/// [`GameError::Validation`].
pub fn deserialize(data: &str) -> Result<GameState, GameError> {
    let saved: SavedGame = serde_json::from_str(data)?;
    GameState::try_from(saved)
}
