use std::collections::HashSet;

use super::card::{Card, Deck, DECK_SIZE};
use super::error::GameError;
use super::pile::{Pile, PILE_CAPACITY};
use super::rules;

pub const PILE_COUNT: usize = 15;

/// Piles left without cards by the deal.
pub const EMPTY_SLOTS: [usize; 2] = [5, 9];

/// The top card of `from_pile` was `card` and it went onto `to_pile`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from_pile: usize,
    pub to_pile: usize,
    pub card: Card,
}

impl Move {
    pub fn new(from_pile: usize, to_pile: usize, card: Card) -> Move {
        Move {
            from_pile,
            to_pile,
            card,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub(crate) piles: Vec<Pile>,
    pub(crate) move_history: Vec<Move>,
    pub(crate) redo_stack: Vec<Move>,
    pub(crate) games_won_count: u32,
    pub(crate) is_won: bool,
    pub(crate) debug_mode: bool,
}

impl GameState {
    /// A fresh deal from a uniformly shuffled deck.
    pub fn new() -> GameState {
        Self::deal(Deck::shuffled())
    }

    pub fn with_seed(seed: u64) -> GameState {
        Self::deal(Deck::shuffled_with_seed(seed))
    }

    /// Deals `deck` four cards at a time into every pile except the empty
    /// slots. `deck` must hold the full 52 cards.
    pub fn deal(deck: Vec<Card>) -> GameState {
        debug_assert_eq!(deck.len(), DECK_SIZE);
        let mut hand = deck.into_iter();
        let piles = (0..PILE_COUNT)
            .map(|id| {
                let is_empty_slot = EMPTY_SLOTS.contains(&id);
                let mut pile = Pile::new(id, is_empty_slot);
                if !is_empty_slot {
                    for card in hand.by_ref().take(PILE_CAPACITY) {
                        pile.put_on_top(card);
                    }
                }
                pile
            })
            .collect();

        GameState {
            piles,
            move_history: Vec::new(),
            redo_stack: Vec::new(),
            games_won_count: 0,
            is_won: false,
            debug_mode: false,
        }
    }

    /// Builds a state around an arbitrary arrangement, with empty history.
    /// The piles must hold the full deck exactly once.
    pub fn from_piles(piles: Vec<Pile>) -> Result<GameState, GameError> {
        if piles.len() != PILE_COUNT {
            return Err(GameError::validation(format!(
                "expected {PILE_COUNT} piles, found {}",
                piles.len()
            )));
        }
        check_conservation(&piles)?;
        let is_won = rules::is_won(&piles);
        Ok(GameState {
            piles,
            move_history: Vec::new(),
            redo_stack: Vec::new(),
            games_won_count: 0,
            is_won,
            debug_mode: false,
        })
    }

    pub fn piles(&self) -> &[Pile] {
        &self.piles
    }

    pub fn pile(&self, index: usize) -> Option<&Pile> {
        self.piles.get(index)
    }

    pub fn move_history(&self) -> &[Move] {
        &self.move_history
    }

    pub fn redo_stack(&self) -> &[Move] {
        &self.redo_stack
    }

    pub fn games_won_count(&self) -> u32 {
        self.games_won_count
    }

    pub fn is_won(&self) -> bool {
        self.is_won
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn can_undo(&self) -> bool {
        !self.move_history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn with_games_won(mut self, games_won_count: u32) -> GameState {
        self.games_won_count = games_won_count;
        self
    }

    pub fn toggle_debug(&mut self) {
        self.debug_mode = !self.debug_mode;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks that `piles` hold every card of the deck exactly once and that
/// no pile is over capacity.
pub fn check_conservation(piles: &[Pile]) -> Result<(), GameError> {
    let mut seen = HashSet::with_capacity(DECK_SIZE);
    for pile in piles {
        if pile.size() > PILE_CAPACITY {
            return Err(GameError::InvariantViolation(format!(
                "pile {} holds {} cards",
                pile.id,
                pile.size()
            )));
        }
        for card in pile.cards() {
            if !seen.insert(*card) {
                return Err(GameError::InvariantViolation(format!(
                    "card {} appears more than once",
                    card.id()
                )));
            }
        }
    }
    if seen.len() != DECK_SIZE {
        return Err(GameError::InvariantViolation(format!(
            "expected {DECK_SIZE} cards, found {}",
            seen.len()
        )));
    }
    Ok(())
}
