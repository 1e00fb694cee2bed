//! Capability traits shared by every agent
//!
//! The capabilities are split so that no variant carries state it never uses:
//!
//! - [`Policy`]: anything that can pick a move (learners, planners, the
//!   heuristic opponent, a human at a terminal)
//! - [`Learner`]: a policy that accepts temporal-difference updates and keeps
//!   a reward trace
//! - [`Planner`]: a learner whose policy is computed offline by [`Planner::train`]

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    tictactoe::{Action, BoardState},
};

/// One observed transition handed to [`Learner::update`].
///
/// `next_state == None` marks the end of an episode: the update uses the
/// reward alone, with no bootstrap term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: BoardState,
    pub action: Action,
    pub reward: f64,
    pub next_state: Option<BoardState>,
    pub next_action: Option<Action>,
}

impl Transition {
    /// A non-terminal transition, including the action chosen in `next_state`.
    pub fn step(
        state: BoardState,
        action: Action,
        reward: f64,
        next_state: BoardState,
        next_action: Action,
    ) -> Self {
        Self {
            state,
            action,
            reward,
            next_state: Some(next_state),
            next_action: Some(next_action),
        }
    }

    /// The final transition of an episode.
    pub fn terminal(state: BoardState, action: Action, reward: f64) -> Self {
        Self {
            state,
            action,
            reward,
            next_state: None,
            next_action: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next_state.is_none()
    }
}

/// Anything that can choose a move on a board.
pub trait Policy {
    /// Select an action for the given state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state has no empty cell.
    fn select_action(&mut self, state: &BoardState) -> Result<Action>;

    /// Name used in logs and summaries.
    fn name(&self) -> &str;

    /// Whether an illegal move from this policy should be re-requested
    /// instead of aborting the episode.
    ///
    /// Only interactive (human) players return `true`; agents choose from
    /// legal actions, so an illegal move from them is a programming error.
    fn retries_illegal_moves(&self) -> bool {
        false
    }
}

/// A policy that learns from transitions.
///
/// This is the contract the episode driver trains against. Offline planners
/// implement [`Learner::update`] as a no-op.
pub trait Learner: Policy + Send {
    /// Apply one learning update for `transition`.
    fn update(&mut self, transition: &Transition) -> Result<()>;

    /// Rewards passed to [`Learner::update`], in order. Diagnostics only.
    fn reward_trace(&self) -> &[f64];
}

/// A learner whose policy is computed offline from a full model of the game.
pub trait Planner: Learner {
    /// Run the convergence loop and return the number of outer iterations.
    ///
    /// Calling this again without changing the inputs returns the previous
    /// count without recomputing.
    fn train(&mut self) -> Result<usize>;

    /// Whether [`Planner::train`] has produced a policy.
    fn is_trained(&self) -> bool;
}
