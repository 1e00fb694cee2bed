//! Rule-based heuristic opponent
//!
//! A fixed decision list approximating strong play. It generates training
//! episodes of bounded quality and is never itself the object being learned.
//!
//! With probability `1 - ability_level` the whole list is skipped and a
//! uniformly random legal move is played instead.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    ports::Policy,
    tictactoe::{Action, BoardState, Cell, LineAnalyzer, Mark},
};

const CORNERS: [(usize, usize); 4] = [(0, 0), (0, 2), (2, 0), (2, 2)];
const EDGES: [(usize, usize); 4] = [(0, 1), (1, 0), (1, 2), (2, 1)];

/// Default probability of following the decision list.
pub const DEFAULT_ABILITY_LEVEL: f64 = 0.9;

/// One entry of the decision list, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeuristicRule {
    /// Complete a line holding two own marks and one empty cell.
    Win,
    /// Same test for the opponent's mark.
    BlockWin,
    /// Take the first empty corner when an own edge pair (left+right or
    /// top+bottom) or the own center is present.
    Fork,
    /// Runs the same detector as [`HeuristicRule::Fork`].
    BlockFork,
    Center,
    Corner,
    Edge,
}

impl HeuristicRule {
    pub const ORDER: [HeuristicRule; 7] = [
        HeuristicRule::Win,
        HeuristicRule::BlockWin,
        HeuristicRule::Fork,
        HeuristicRule::BlockFork,
        HeuristicRule::Center,
        HeuristicRule::Corner,
        HeuristicRule::Edge,
    ];

    /// Evaluate this rule for `mark` to move on `board`.
    pub fn evaluate(self, board: &BoardState, mark: Mark) -> Option<Action> {
        match self {
            HeuristicRule::Win => completing_move(board, mark),
            HeuristicRule::BlockWin => completing_move(board, mark.opponent()),
            HeuristicRule::Fork | HeuristicRule::BlockFork => fork_corner(board, mark),
            HeuristicRule::Center => first_empty(board, &[(1, 1)]),
            HeuristicRule::Corner => first_empty(board, &CORNERS),
            HeuristicRule::Edge => first_empty(board, &EDGES),
        }
    }
}

fn completing_move(board: &BoardState, mark: Mark) -> Option<Action> {
    LineAnalyzer::first_completing_cell(board.cells(), mark)
        .and_then(|index| Action::from_index(index).ok())
}

fn fork_corner(board: &BoardState, mark: Mark) -> Option<Action> {
    let own = mark.to_cell();
    let pattern = (board.at(1, 0) == own && board.at(1, 2) == own)
        || (board.at(0, 1) == own && board.at(2, 1) == own)
        || board.at(1, 1) == own;
    if pattern {
        first_empty(board, &CORNERS)
    } else {
        None
    }
}

fn first_empty(board: &BoardState, cells: &[(usize, usize)]) -> Option<Action> {
    cells
        .iter()
        .find(|&&(row, col)| board.at(row, col) == Cell::Empty)
        .and_then(|&(row, col)| Action::new(row, col).ok())
}

/// Stateless decision-list opponent playing `mark`.
///
/// The only state is the random source used for the ability roll and the
/// random fallback; nothing is remembered between calls.
#[derive(Debug, Clone)]
pub struct HeuristicOpponent {
    mark: Mark,
    ability_level: f64,
    rng: StdRng,
}

impl HeuristicOpponent {
    /// Create an opponent playing `mark` that follows the decision list
    /// with probability `ability_level`.
    pub fn new(mark: Mark, ability_level: f64) -> Self {
        Self {
            mark,
            ability_level,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    pub fn ability_level(&self) -> f64 {
        self.ability_level
    }

    /// Choose a move for any non-terminal board.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoLegalActions`] if the board is full.
    pub fn choose_move(&mut self, board: &BoardState) -> Result<Action> {
        self.decide(board).map(|(action, _)| action)
    }

    /// Choose a move and report which rule produced it (`None` for a random move).
    pub fn decide(&mut self, board: &BoardState) -> Result<(Action, Option<HeuristicRule>)> {
        let legal = board.legal_actions();
        if legal.is_empty() {
            return Err(Error::NoLegalActions {
                state: board.encode(),
            });
        }

        if self.rng.random::<f64>() <= self.ability_level
            && let Some(decision) = HeuristicRule::ORDER
                .iter()
                .find_map(|&rule| rule.evaluate(board, self.mark).map(|a| (a, Some(rule))))
        {
            return Ok(decision);
        }

        let action = *legal
            .choose(&mut self.rng)
            .ok_or_else(|| Error::NoLegalActions {
                state: board.encode(),
            })?;
        Ok((action, None))
    }
}

impl Default for HeuristicOpponent {
    fn default() -> Self {
        Self::new(Mark::X, DEFAULT_ABILITY_LEVEL)
    }
}

impl Policy for HeuristicOpponent {
    fn select_action(&mut self, state: &BoardState) -> Result<Action> {
        self.choose_move(state)
    }

    fn name(&self) -> &str {
        "Heuristic"
    }
}
