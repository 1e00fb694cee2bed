//! Deterministic game model shared by the offline planners
//!
//! The planners treat the board as a single-agent MDP: choosing an empty
//! cell places the planner's own mark there and nothing else happens. The
//! opponent's replies are not modelled.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    tictactoe::{Action, BoardState, Mark, StateSpace},
};

/// Parameters of a planning run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Mark the planner places
    pub mark: Mark,
    /// Discount factor γ
    pub discount: f64,
    /// Convergence threshold on the largest per-sweep value change
    pub theta: f64,
    /// Reward for a move that does not end the game
    pub step_penalty: f64,
    /// Cap on sweeps (value iteration, policy evaluation) and on
    /// policy-improvement rounds
    pub max_iterations: usize,
    pub state_space: StateSpace,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            mark: Mark::O,
            discount: 0.9,
            theta: 1e-6,
            step_penalty: -0.01,
            max_iterations: 1000,
            state_space: StateSpace::Exhaustive,
        }
    }
}

/// Serializable state of either planner. The state space is regenerated
/// from `config` on restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerState {
    pub config: PlannerConfig,
    pub values: HashMap<BoardState, f64>,
    pub policy: HashMap<BoardState, Action>,
    pub iterations: Option<usize>,
    pub rng_seed: Option<u64>,
}

/// Enumerated states plus the transition and reward functions.
#[derive(Debug, Clone)]
pub(crate) struct PlanningModel {
    config: PlannerConfig,
    states: Vec<BoardState>,
}

impl PlanningModel {
    pub(crate) fn new(config: PlannerConfig) -> Self {
        let states = config.state_space.generate();
        log::debug!(
            "generated {} {:?} states for planning as {}",
            states.len(),
            config.state_space,
            config.mark
        );
        Self { config, states }
    }

    pub(crate) fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub(crate) fn state_count(&self) -> usize {
        self.states.len()
    }

    /// States the planners sweep over, in generation order.
    pub(crate) fn decision_states(&self) -> impl Iterator<Item = &BoardState> {
        self.states.iter().filter(|state| !state.is_terminal())
    }

    /// +1 for a winning move, 0 for a drawing move, the step penalty otherwise.
    pub(crate) fn reward(&self, next: &BoardState) -> f64 {
        next.terminal_reward(self.config.mark)
            .map(|outcome| outcome.value())
            .unwrap_or(self.config.step_penalty)
    }

    /// One-step lookahead value of taking `action` in `state`.
    ///
    /// Successors missing from `values` (terminal or outside the state
    /// space) count as 0.
    pub(crate) fn action_value(
        &self,
        values: &HashMap<BoardState, f64>,
        state: &BoardState,
        action: Action,
    ) -> Result<f64> {
        let next = state.apply(action, self.config.mark)?;
        let next_value = values.get(&next).copied().unwrap_or(0.0);
        Ok(self.reward(&next) + self.config.discount * next_value)
    }

    /// Best action and its value; ties go to the first action in row-major order.
    pub(crate) fn greedy(
        &self,
        values: &HashMap<BoardState, f64>,
        state: &BoardState,
    ) -> Result<(Action, f64)> {
        let mut best: Option<(Action, f64)> = None;
        for action in state.legal_actions() {
            let value = self.action_value(values, state, action)?;
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((action, value));
            }
        }
        best.ok_or_else(|| Error::NoLegalActions {
            state: state.encode(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_for_win_draw_and_step() {
        let model = PlanningModel::new(PlannerConfig {
            state_space: StateSpace::TurnConsistent,
            ..PlannerConfig::default()
        });
        let win = BoardState::parse("OOOXX----").unwrap();
        let draw = BoardState::parse("XOXOXOOXO").unwrap();
        let open = BoardState::parse("O--------").unwrap();
        assert_eq!(model.reward(&win), 1.0);
        assert_eq!(model.reward(&draw), 0.0);
        assert_eq!(model.reward(&open), -0.01);
    }

    #[test]
    fn test_greedy_prefers_winning_move() {
        let model = PlanningModel::new(PlannerConfig {
            state_space: StateSpace::TurnConsistent,
            ..PlannerConfig::default()
        });
        let state = BoardState::parse("XX-OO----").unwrap();
        let (action, value) = model.greedy(&HashMap::new(), &state).unwrap();
        assert_eq!(action, Action::new(1, 2).unwrap());
        assert_eq!(value, 1.0);
    }

    #[test]
    fn test_greedy_ties_go_to_first_action() {
        let model = PlanningModel::new(PlannerConfig {
            state_space: StateSpace::TurnConsistent,
            ..PlannerConfig::default()
        });
        let (action, _) = model.greedy(&HashMap::new(), &BoardState::new()).unwrap();
        assert_eq!(action, Action::new(0, 0).unwrap());
    }
}
