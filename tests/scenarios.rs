//! End-to-end play through the controller: tapping, undo, winning and solving.

mod common;

use fifteen::history::{apply_move, undo};
use fifteen::{
    persist, rules, Card, Controller, Deck, GameState, Move, Rank, SolveOutcome, SolverConfig,
    Suit, TapOutcome,
};

use common::{init_logging, kings_board, play, won_board};

/// A deal where piles 0 and 1 both have an ace on top.
fn aces_on_top() -> GameState {
    let mut deck = Deck::standard();
    let ah = deck.iter().position(|c| *c == Card::new(Suit::Hearts, Rank::Ace)).unwrap();
    deck.swap(ah, 3);
    let ad = deck.iter().position(|c| *c == Card::new(Suit::Diamonds, Rank::Ace)).unwrap();
    deck.swap(ad, 7);
    GameState::deal(deck)
}

#[test]
fn tap_moves_card_onto_matching_pile() {
    init_logging();
    let mut controller = Controller::with_state(aces_on_top());

    // Start a pile of aces on the nearest empty pile.
    let TapOutcome::Moved(first) = controller.tap(0) else {
        panic!("an ace can always start an empty pile");
    };
    assert_eq!(first.to_pile, 5);

    let before = controller.state().piles()[1].size();
    let TapOutcome::Moved(mv) = controller.tap(1) else {
        panic!("the ace of diamonds matches pile 5");
    };
    assert_eq!(mv.from_pile, 1);
    assert_eq!(mv.to_pile, 5);
    assert_eq!(mv.card, Card::new(Suit::Diamonds, Rank::Ace));
    assert_eq!(controller.state().piles()[1].size(), before - 1);
    assert_eq!(controller.state().piles()[5].size(), 2);
}

#[test]
fn repeated_taps_reach_every_destination() {
    init_logging();
    let mut controller = Controller::with_state(kings_board());
    let king = Card::new(Suit::Hearts, Rank::King);

    let mut pile = 0;
    let mut destinations = Vec::new();
    for _ in 0..6 {
        let TapOutcome::Moved(mv) = controller.tap(pile) else {
            panic!("the king of hearts always has somewhere to go");
        };
        assert_eq!(mv.card, king);
        assert_eq!(mv.from_pile, 0);
        destinations.push(mv.to_pile);
        pile = mv.to_pile;
        assert_eq!(controller.state().piles()[pile].top(), Some(&king));
    }
    assert_eq!(destinations, vec![3, 11, 7, 3, 11, 7]);
    assert_eq!(controller.state().move_history().len(), 1);

    // One undo puts the king back where the taps started.
    assert_eq!(controller.undo().unwrap().map(|mv| mv.to_pile), Some(7));
    assert_eq!(controller.state().piles(), kings_board().piles());
}

#[test]
fn undo_without_history_changes_nothing() {
    init_logging();
    let mut state = GameState::with_seed(77).with_games_won(5);
    let before = state.clone();

    assert_eq!(undo(&mut state), Ok(None));
    assert_eq!(state, before);
    assert_eq!(state.games_won_count(), 5);

    let mut controller = Controller::with_state(before.clone());
    assert_eq!(controller.undo(), Ok(None));
    assert_eq!(controller.state(), &before);
}

#[test]
fn final_move_wins_the_game() {
    init_logging();
    // Twelve complete piles, three aces on pile 0, the fourth ace alone on
    // pile 5 and pile 9 empty.
    let mut won = won_board(64);
    let piles = won.piles().to_vec();
    let mut scrambled = piles.clone();
    let ace = scrambled[0].take_top().unwrap();
    scrambled[5].put_on_top(ace);
    let mut state = GameState::from_piles(scrambled).unwrap().with_games_won(3);
    assert!(!state.is_won());
    assert_eq!(rules::completed_piles(state.piles()), 12);

    apply_move(&mut state, Move::new(5, 0, ace)).unwrap();
    assert!(state.is_won());
    assert_eq!(state.games_won_count(), 4);
    assert_eq!(state.piles(), &piles[..]);

    // The forced-win board itself never played a move.
    assert!(won.move_history().is_empty());
    play(&mut won, &[(0, 5), (5, 0)]);
    assert_eq!(won.games_won_count(), 1);
}

#[test]
fn solving_a_fresh_deal_gives_a_winning_line_or_a_clear_answer() {
    init_logging();
    let state = GameState::with_seed(2024);
    let config = SolverConfig {
        max_nodes: 100_000,
        ..SolverConfig::default()
    };
    let mut controller = Controller::with_state(state.clone()).with_solver_config(config);

    match controller.solve() {
        SolveOutcome::Solved(moves) => {
            assert!(!moves.is_empty());
            let mut replay = state;
            for mv in &moves {
                apply_move(&mut replay, *mv).unwrap();
            }
            assert!(replay.is_won());

            controller.start_playback(moves);
            while controller.play_next().is_some() {}
            assert!(controller.state().is_won());
            assert_eq!(controller.state().games_won_count(), 1);
        }
        SolveOutcome::Exhausted | SolveOutcome::BudgetExceeded => {
            assert_eq!(controller.state(), &state);
        }
        SolveOutcome::Cancelled => panic!("nothing cancelled this search"),
    }
}

#[test]
fn scrambled_win_is_solved_and_played_back() {
    init_logging();
    let mut state = won_board(8);
    play(&mut state, &[(0, 5), (1, 9), (0, 5), (1, 9)]);
    let mut controller = Controller::with_state(state);

    let SolveOutcome::Solved(moves) = controller.solve_and_queue() else {
        panic!("a few moves away from a win");
    };
    assert_eq!(controller.pending_playback(), moves.len());
    while controller.play_next().is_some() {}
    assert!(controller.state().is_won());
}

#[test]
fn saved_game_survives_a_reload() {
    init_logging();
    let mut controller = Controller::with_state(aces_on_top());
    controller.tap(0);
    controller.tap(1);
    controller.undo().unwrap();
    controller.toggle_debug();

    let text = persist::serialize_pretty(controller.state()).unwrap();
    let mut restored = Controller::new();
    restored.load(&text).unwrap();
    assert_eq!(restored.state(), controller.state());

    assert_eq!(restored.redo().unwrap().map(|mv| mv.from_pile), Some(1));
    assert_eq!(restored.state().piles()[5].size(), 2);
}
