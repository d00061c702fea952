#![allow(dead_code)]

// tests/common/mod.rs
use std::sync::OnceLock;

use fifteen::history::{apply_move, force_win};
use fifteen::{Card, Deck, GameState, Move, Pile, Rank, Suit};
use tracing_subscriber::{fmt, EnvFilter};

static LOGGING: OnceLock<()> = OnceLock::new();

/// Installs a test subscriber once per binary.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then `"warn"`.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

// PROPTEST_CASES overrides the case count (default 32).
pub fn proptest_config() -> proptest::prelude::ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(32)
        .max(1);

    proptest::prelude::ProptestConfig {
        failure_persistence: None,
        cases,
        ..proptest::prelude::ProptestConfig::default()
    }
}

/// A winning layout built from the cards of `seed`'s deal, with empty history
/// and a zero win count.
pub fn won_board(seed: u64) -> GameState {
    let mut state = GameState::with_seed(seed);
    force_win(&mut state);
    GameState::from_piles(state.piles().to_vec()).expect("forced win keeps every card")
}

/// Plays `(from, to)` pairs, each moving the current top card of `from`.
pub fn play(state: &mut GameState, moves: &[(usize, usize)]) {
    for &(from, to) in moves {
        let card = *state.piles()[from].top().expect("source pile has a card");
        apply_move(state, Move::new(from, to, card)).expect("scripted move is legal");
    }
}

/// Same piles with every suit passed through `map`.
pub fn relabel_suits(piles: &[Pile], map: impl Fn(Suit) -> Suit) -> Vec<Pile> {
    piles
        .iter()
        .map(|pile| {
            let cards = pile
                .cards()
                .iter()
                .map(|c| Card::new(map(c.suit), c.rank))
                .collect();
            Pile::from_cards(pile.id, cards, pile.is_empty_slot())
        })
        .collect()
}

/// The king of hearts on pile 0 over one other card. Piles 3 and 11 have a
/// king on top with room for another, pile 13 is full under the king of
/// spades and pile 7 is the only empty pile.
pub fn kings_board() -> GameState {
    let mut rest: Vec<Card> = Deck::standard()
        .into_iter()
        .filter(|c| c.rank != Rank::King)
        .collect();
    let mut piles: Vec<Pile> = (0..15).map(|id| Pile::new(id, false)).collect();
    for (id, under, suit) in [
        (0, 1, Suit::Hearts),
        (3, 2, Suit::Diamonds),
        (11, 2, Suit::Clubs),
        (13, 3, Suit::Spades),
    ] {
        for card in rest.drain(..under) {
            piles[id].put_on_top(card);
        }
        piles[id].put_on_top(Card::new(suit, Rank::King));
    }
    for id in [1, 2, 4, 5, 6, 8, 9, 10, 12, 14] {
        for card in rest.drain(..4) {
            piles[id].put_on_top(card);
        }
    }
    GameState::from_piles(piles).expect("every card placed once")
}
