//! The game controller: the one place that owns and mutates the live game.
//!
//! Every command takes `&mut self`, so commands never overlap. A solution
//! found by the solver is played back one move at a time through
//! [`Controller::play_next`]; the caller decides the pacing. Any manual
//! command cancels a playback in progress before it does anything else.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use super::card::Deck;
use super::error::GameError;
use super::history;
use super::persist;
use super::resolver::{self, TapCycle, TapResolution};
use super::rules;
use super::solver::{CancelToken, Search, SolveOutcome, SolverConfig};
use super::state::{GameState, Move};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    Moved(Move),
    /// The tapped pile is empty or its top card has nowhere to go.
    NoMove,
}

pub struct Controller {
    state: GameState,
    cycle: TapCycle,
    playback: VecDeque<Move>,
    solver_config: SolverConfig,
}

impl Controller {
    pub fn new() -> Controller {
        Self::with_state(GameState::new())
    }

    pub fn with_state(state: GameState) -> Controller {
        Controller {
            state,
            cycle: TapCycle::default(),
            playback: VecDeque::new(),
            solver_config: SolverConfig::default(),
        }
    }

    pub fn with_solver_config(mut self, config: SolverConfig) -> Controller {
        self.solver_config = config;
        self
    }

    /// Restores a saved game, or deals a new one when the save is unusable.
    pub fn load_or_new(data: &str) -> Controller {
        match persist::deserialize(data) {
            Ok(state) => Self::with_state(state),
            Err(err) => {
                warn!(error = %err, "saved game rejected, dealing a new one");
                Self::new()
            }
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn new_game(&mut self) -> &GameState {
        self.cancel_playback();
        self.cycle.reset();
        history::new_game(&mut self.state);
        &self.state
    }

    pub fn new_game_with_seed(&mut self, seed: u64) -> &GameState {
        self.cancel_playback();
        self.cycle.reset();
        history::new_game_from_deck(&mut self.state, Deck::shuffled_with_seed(seed));
        &self.state
    }

    /// Moves the top card of `pile` to the destination the resolver picks.
    /// Tapping the card that was just moved sends it from its original pile
    /// to the next destination instead.
    pub fn tap(&mut self, pile: usize) -> TapOutcome {
        self.cancel_playback();
        let Some((resolution, next)) = resolver::resolve_tap(&self.state, pile, &self.cycle)
        else {
            self.cycle.reset();
            debug!(pile, "tap with no legal move");
            return TapOutcome::NoMove;
        };
        let result = match resolution {
            TapResolution::Fresh(mv) => history::apply_move(&mut self.state, mv),
            TapResolution::Retarget { previous, next: mv } => self.retarget(previous, mv),
        };
        match result {
            Ok(()) => {
                self.cycle = next;
                TapOutcome::Moved(resolution.played())
            }
            Err(err) => {
                warn!(error = %err, "resolved move was refused");
                self.cycle.reset();
                TapOutcome::NoMove
            }
        }
    }

    /// Takes back `previous` and plays `next` in its place. Puts `previous`
    /// back if `next` is refused.
    fn retarget(&mut self, previous: Move, next: Move) -> Result<(), GameError> {
        if history::undo(&mut self.state)? != Some(previous) {
            return Err(GameError::illegal(
                previous.from_pile,
                previous.to_pile,
                "move is no longer the latest",
            ));
        }
        if let Err(err) = history::apply_move(&mut self.state, next) {
            history::redo(&mut self.state)?;
            return Err(err);
        }
        Ok(())
    }

    pub fn undo(&mut self) -> Result<Option<Move>, GameError> {
        self.cancel_playback();
        self.cycle.reset();
        history::undo(&mut self.state)
    }

    pub fn redo(&mut self) -> Result<Option<Move>, GameError> {
        self.cancel_playback();
        self.cycle.reset();
        history::redo(&mut self.state)
    }

    pub fn force_win(&mut self) {
        self.cancel_playback();
        self.cycle.reset();
        history::force_win(&mut self.state);
    }

    pub fn toggle_debug(&mut self) -> bool {
        self.state.toggle_debug();
        self.state.debug_mode()
    }

    /// Every legal `(from, to)` pair on the current board.
    pub fn legal_moves(&self) -> Vec<(usize, usize)> {
        rules::legal_moves(self.state.piles())
    }

    /// Searches for a winning line from the current board. Does not touch
    /// the game.
    pub fn solve(&self) -> SolveOutcome {
        self.solve_with_cancel(CancelToken::new())
    }

    pub fn solve_with_cancel(&self, cancel: CancelToken) -> SolveOutcome {
        Search::new(&self.state, self.solver_config)
            .with_cancel(cancel)
            .run()
    }

    /// Solves and, on success, queues the solution for playback.
    pub fn solve_and_queue(&mut self) -> SolveOutcome {
        self.cancel_playback();
        let outcome = self.solve();
        if let SolveOutcome::Solved(moves) = &outcome {
            self.start_playback(moves.clone());
        }
        outcome
    }

    pub fn start_playback(&mut self, moves: Vec<Move>) {
        self.cycle.reset();
        info!(moves = moves.len(), "playback started");
        self.playback = moves.into();
    }

    pub fn is_playing(&self) -> bool {
        !self.playback.is_empty()
    }

    pub fn pending_playback(&self) -> usize {
        self.playback.len()
    }

    /// Applies the next queued move. Stops the playback if the move no
    /// longer fits the board.
    pub fn play_next(&mut self) -> Option<Move> {
        let mv = self.playback.pop_front()?;
        match history::apply_move(&mut self.state, mv) {
            Ok(()) => Some(mv),
            Err(err) => {
                warn!(error = %err, "playback stopped");
                self.cancel_playback();
                None
            }
        }
    }

    pub fn cancel_playback(&mut self) {
        if !self.playback.is_empty() {
            info!(remaining = self.playback.len(), "playback cancelled");
            self.playback.clear();
        }
    }

    pub fn serialize(&self) -> serde_json::Result<String> {
        persist::serialize(&self.state)
    }

    /// Replaces the game with a saved one. On error the current game is
    /// kept as it was.
    pub fn load(&mut self, data: &str) -> Result<(), GameError> {
        let state = persist::deserialize(data)?;
        self.cancel_playback();
        self.cycle.reset();
        self.state = state;
        Ok(())
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
