//! Action-value table for temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tictactoe::{Action, BoardState};

/// Value of every state-action pair that has never been updated.
pub const DEFAULT_Q: f64 = 0.0;

/// Q-table mapping action → (state → value).
///
/// Lookups of unseen pairs return [`DEFAULT_Q`] without inserting anything,
/// so the table only grows through explicit updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    /// One sparse state map per action, indexed by [`Action::index`]
    values: [HashMap<BoardState, f64>; 9],
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a new Q-table
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            values: Default::default(),
            learning_rate,
            discount_factor,
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &BoardState, action: Action) -> f64 {
        self.values[action.index()]
            .get(state)
            .copied()
            .unwrap_or(DEFAULT_Q)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: BoardState, action: Action, value: f64) {
        self.values[action.index()].insert(state, value);
    }

    /// Get maximum Q-value over `actions`; `None` when `actions` is empty
    pub fn max_q(&self, state: &BoardState, actions: &[Action]) -> Option<f64> {
        actions
            .iter()
            .map(|&action| self.get(state, action))
            .reduce(f64::max)
    }

    /// Every action in `actions` whose value equals the maximum
    pub fn greedy_actions(&self, state: &BoardState, actions: &[Action]) -> Vec<Action> {
        let Some(best) = self.max_q(state, actions) else {
            return Vec::new();
        };
        actions
            .iter()
            .copied()
            .filter(|&action| self.get(state, action) == best)
            .collect()
    }

    /// Move Q(s,a) toward `target`: Q(s,a) ← Q(s,a) + α[target - Q(s,a)]
    fn move_toward(&mut self, state: BoardState, action: Action, target: f64) {
        let current_q = self.get(&state, action);
        let new_q = current_q + self.learning_rate * (target - current_q);
        self.set(state, action, new_q);
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// `next` is `None` at the end of an episode, in which case the target
    /// is the reward alone.
    pub fn q_learning_update(
        &mut self,
        state: BoardState,
        action: Action,
        reward: f64,
        next: Option<&BoardState>,
    ) {
        let bootstrap = next
            .and_then(|next_state| self.max_q(next_state, &next_state.legal_actions()))
            .unwrap_or(0.0);
        let td_target = reward + self.discount_factor * bootstrap;
        self.move_toward(state, action, td_target);
    }

    /// SARSA update: on-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ Q(s',a') - Q(s,a)]
    pub fn sarsa_update(
        &mut self,
        state: BoardState,
        action: Action,
        reward: f64,
        next: Option<(&BoardState, Action)>,
    ) {
        let bootstrap = next
            .map(|(next_state, next_action)| self.get(next_state, next_action))
            .unwrap_or(0.0);
        let td_target = reward + self.discount_factor * bootstrap;
        self.move_toward(state, action, td_target);
    }

    /// Get total number of Q-values stored
    pub fn size(&self) -> usize {
        self.values.iter().map(HashMap::len).sum()
    }
}
