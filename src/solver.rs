//! Backtracking search for a winning line of play.
//!
//! The search is a depth-first walk with an explicit stack, so it can stop
//! after any number of node expansions and pick up again later. `step`
//! expands at most `yield_every` nodes before handing control back, which is
//! what a host event loop needs to stay responsive. A `CancelToken` stops a
//! search from the outside at the next step boundary.
//!
//! Boards are deduplicated by a signature that ignores pile order and card
//! order within a pile, so two layouts holding the same groups of ranks are
//! explored once.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use super::card::RANK_COUNT;
use super::pile::{Pile, PILE_CAPACITY};
use super::rules;
use super::state::{GameState, Move};

/// Limits for a search run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Hard cap on the number of nodes expanded.
    pub max_nodes: u64,
    /// Maximum number of moves in a line.
    pub max_depth: usize,
    /// Node expansions per `step` call.
    pub yield_every: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_nodes: 500_000,
            max_depth: 512,
            yield_every: 1_000,
        }
    }
}

/// Shared flag that asks a running search to stop.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    /// Moves that take the starting board to a win. Empty when the board is
    /// already won.
    Solved(Vec<Move>),
    /// The search ran out of boards to try without finding a win. Boards
    /// merged by the signature are not tried twice, so this is not a proof
    /// that the deal cannot be won.
    Exhausted,
    /// The node budget ran out first.
    BudgetExceeded,
    Cancelled,
}

impl SolveOutcome {
    pub fn into_moves(self) -> Option<Vec<Move>> {
        match self {
            SolveOutcome::Solved(moves) => Some(moves),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes_expanded: u64,
    pub boards_visited: usize,
    pub max_depth: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchStep {
    Pending,
    Finished(SolveOutcome),
}

struct Frame {
    piles: Vec<Pile>,
    moves: Vec<(usize, usize)>,
    next: usize,
}

pub struct Search {
    config: SolverConfig,
    cancel: CancelToken,
    stack: Vec<Frame>,
    path: Vec<Move>,
    visited: HashSet<String>,
    stats: SearchStats,
    finished: Option<SolveOutcome>,
}

impl Search {
    pub fn new(state: &GameState, config: SolverConfig) -> Search {
        Self::from_piles(state.piles().to_vec(), config)
    }

    pub fn from_piles(piles: Vec<Pile>, config: SolverConfig) -> Search {
        let mut search = Search {
            config,
            cancel: CancelToken::new(),
            stack: Vec::new(),
            path: Vec::new(),
            visited: HashSet::new(),
            stats: SearchStats::default(),
            finished: None,
        };

        if is_goal(&piles) {
            search.finished = Some(SolveOutcome::Solved(Vec::new()));
            return search;
        }
        search.visited.insert(signature(&piles));
        search.stats.boards_visited = 1;
        let moves = ordered_moves(&piles);
        search.stack.push(Frame {
            piles,
            moves,
            next: 0,
        });
        search
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Search {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Expands up to `yield_every` nodes. Suspension only ever happens
    /// between whole moves.
    pub fn step(&mut self) -> SearchStep {
        if let Some(outcome) = &self.finished {
            return SearchStep::Finished(outcome.clone());
        }
        if self.cancel.is_cancelled() {
            return self.finish(SolveOutcome::Cancelled);
        }

        for _ in 0..self.config.yield_every.max(1) {
            let Some(frame) = self.stack.last_mut() else {
                return self.finish(SolveOutcome::Exhausted);
            };
            let Some(&(from, to)) = frame.moves.get(frame.next) else {
                self.stack.pop();
                self.path.pop();
                continue;
            };
            frame.next += 1;

            let mut piles = frame.piles.clone();
            let Some(card) = piles[from].take_top() else {
                continue;
            };
            piles[to].put_on_top(card);
            let mv = Move::new(from, to, card);

            self.stats.nodes_expanded += 1;
            if self.stats.nodes_expanded > self.config.max_nodes {
                return self.finish(SolveOutcome::BudgetExceeded);
            }

            if is_goal(&piles) {
                self.path.push(mv);
                return self.finish(SolveOutcome::Solved(self.path.clone()));
            }

            let depth = self.path.len() + 1;
            if depth >= self.config.max_depth {
                continue;
            }
            if !self.visited.insert(signature(&piles)) {
                continue;
            }
            self.stats.boards_visited = self.visited.len();
            self.stats.max_depth = self.stats.max_depth.max(depth);

            let moves = ordered_moves(&piles);
            self.path.push(mv);
            self.stack.push(Frame {
                piles,
                moves,
                next: 0,
            });
        }

        debug!(
            nodes = self.stats.nodes_expanded,
            visited = self.stats.boards_visited,
            depth = self.path.len(),
            "solver yielded"
        );
        SearchStep::Pending
    }

    /// Steps the search to completion.
    pub fn run(&mut self) -> SolveOutcome {
        self.run_with(|_| {})
    }

    /// Steps the search to completion, calling `on_yield` at every
    /// suspension point.
    pub fn run_with<F>(&mut self, mut on_yield: F) -> SolveOutcome
    where
        F: FnMut(&SearchStats),
    {
        loop {
            match self.step() {
                SearchStep::Pending => on_yield(&self.stats),
                SearchStep::Finished(outcome) => return outcome,
            }
        }
    }

    fn finish(&mut self, outcome: SolveOutcome) -> SearchStep {
        match &outcome {
            SolveOutcome::Solved(moves) => info!(
                moves = moves.len(),
                nodes = self.stats.nodes_expanded,
                "solution found"
            ),
            other => info!(
                outcome = ?other,
                nodes = self.stats.nodes_expanded,
                visited = self.stats.boards_visited,
                "no solution found"
            ),
        }
        self.stack.clear();
        self.finished = Some(outcome.clone());
        SearchStep::Finished(outcome)
    }
}

/// Finds a winning line from `state` with the default budget.
pub fn solve(state: &GameState) -> Option<Vec<Move>> {
    solve_with(state, SolverConfig::default()).into_moves()
}

pub fn solve_with(state: &GameState, config: SolverConfig) -> SolveOutcome {
    Search::new(state, config).run()
}

fn is_goal(piles: &[Pile]) -> bool {
    rules::is_won(piles) && rules::completed_piles(piles) == RANK_COUNT
}

/// Order-insensitive key for a board: sorted ranks per pile, piles sorted.
pub fn signature(piles: &[Pile]) -> String {
    let mut parts: Vec<String> = piles
        .iter()
        .map(|pile| {
            if pile.is_empty() {
                return "-".to_string();
            }
            let mut values: Vec<u8> = pile.cards().iter().map(|c| c.rank.value()).collect();
            values.sort_unstable();
            values
                .iter()
                .map(u8::to_string)
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();
    parts.sort_unstable();
    parts.join("|")
}

/// Legal moves worth trying, best first: moves that complete a pile, then
/// other stacking moves, then moves onto an empty pile.
fn ordered_moves(piles: &[Pile]) -> Vec<(usize, usize)> {
    let mut moves: Vec<(u8, (usize, usize))> = rules::legal_moves(piles)
        .into_iter()
        .filter(|&(from, to)| {
            let src = &piles[from];
            // A completed pile is finished, and a lone card moved onto an
            // empty pile gives back the same board.
            !src.is_complete() && !(src.size() == 1 && piles[to].is_empty())
        })
        .map(|(from, to)| {
            let tier = match piles[to].size() {
                0 => 2,
                n if n == PILE_CAPACITY - 1 => 0,
                _ => 1,
            };
            (tier, (from, to))
        })
        .collect();
    moves.sort_by_key(|&(tier, _)| tier);
    moves.into_iter().map(|(_, mv)| mv).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, Rank, Suit};
    use crate::history::{apply_move, force_win};

    fn nearly_won() -> GameState {
        let mut state = GameState::with_seed(31);
        force_win(&mut state);
        let mut state = GameState::from_piles(state.piles().to_vec()).unwrap();
        for (from, to) in [(0, 5), (1, 9), (0, 5)] {
            let card = *state.piles()[from].top().unwrap();
            apply_move(&mut state, Move::new(from, to, card)).unwrap();
        }
        state
    }

    #[test]
    fn solves_a_scrambled_won_board() {
        let state = nearly_won();
        let moves = solve(&state).expect("short line exists");
        assert!(!moves.is_empty());

        let mut replay = state.clone();
        for mv in moves {
            apply_move(&mut replay, mv).unwrap();
        }
        assert!(replay.is_won());
    }

    #[test]
    fn won_board_needs_no_moves() {
        let mut state = GameState::with_seed(2);
        force_win(&mut state);
        assert_eq!(solve(&state), Some(Vec::new()));
    }

    #[test]
    fn small_board_without_win_is_exhausted() {
        let piles = vec![
            Pile::from_cards(0, vec![Card::new(Suit::Hearts, Rank::Ace)], false),
            Pile::from_cards(1, vec![Card::new(Suit::Clubs, Rank::Two)], false),
            Pile::new(2, true),
        ];
        let mut search = Search::from_piles(piles, SolverConfig::default());
        assert_eq!(search.run(), SolveOutcome::Exhausted);
    }

    #[test]
    fn node_budget_is_respected() {
        let state = GameState::with_seed(5);
        let config = SolverConfig {
            max_nodes: 1,
            ..SolverConfig::default()
        };
        assert_eq!(solve_with(&state, config), SolveOutcome::BudgetExceeded);
    }

    #[test]
    fn step_yields_and_can_be_cancelled() {
        let state = GameState::with_seed(5);
        let config = SolverConfig {
            yield_every: 1,
            ..SolverConfig::default()
        };
        let mut search = Search::new(&state, config);
        assert_eq!(search.step(), SearchStep::Pending);
        assert_eq!(search.stats().nodes_expanded, 1);

        search.cancel_token().cancel();
        assert_eq!(search.step(), SearchStep::Finished(SolveOutcome::Cancelled));
        assert_eq!(search.step(), SearchStep::Finished(SolveOutcome::Cancelled));
    }

    #[test]
    fn signature_ignores_pile_and_card_order() {
        let a = vec![
            Pile::from_cards(
                0,
                vec![Card::new(Suit::Hearts, Rank::Two), Card::new(Suit::Clubs, Rank::Ace)],
                false,
            ),
            Pile::new(1, false),
        ];
        let b = vec![
            Pile::new(0, false),
            Pile::from_cards(
                1,
                vec![Card::new(Suit::Spades, Rank::Ace), Card::new(Suit::Hearts, Rank::Two)],
                false,
            ),
        ];
        assert_eq!(signature(&a), signature(&b));
        assert_eq!(signature(&a), "-|1,2");
    }

    #[test]
    fn completing_moves_come_first() {
        let state = nearly_won();
        let moves = ordered_moves(state.piles());
        let (_, to) = moves[0];
        assert_eq!(state.piles()[to].size(), 3);
        assert!(moves
            .iter()
            .all(|&(from, _)| !state.piles()[from].is_complete()));
    }
}
