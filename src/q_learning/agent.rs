//! Q-learning and SARSA agents
//!
//! Both agents share the same ε-greedy behaviour and reward bookkeeping
//! ([`TdCore`]); they differ only in the bootstrap term of the update.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{Learner, Policy, Transition},
    q_learning::q_table::QTable,
    tictactoe::{Action, BoardState},
};

/// Serializable state of a TD agent.
///
/// The RNG itself is not stored. Restoring rebuilds it from `rng_seed`, so a
/// seeded agent replays its random stream from the start instead of
/// continuing where the saved agent stopped. With ε = 0 and no Q-value ties
/// the restored agent acts exactly like the saved one; otherwise it acts like
/// a fresh agent seeded with `rng_seed` and given the same table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TdAgentState {
    pub q_table: QTable,
    pub epsilon: f64,
    pub epsilon_decay: f64,
    pub rewards: Vec<f64>,
    pub rng_seed: Option<u64>,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// State and behaviour common to both TD agents.
#[derive(Debug, Clone)]
struct TdCore {
    q_table: QTable,
    epsilon: f64,
    epsilon_decay: f64,
    rewards: Vec<f64>,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl TdCore {
    fn new(learning_rate: f64, discount_factor: f64, epsilon: f64, epsilon_decay: f64) -> Self {
        Self {
            q_table: QTable::new(learning_rate, discount_factor),
            epsilon,
            epsilon_decay,
            rewards: Vec::new(),
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    /// ε-greedy selection with a uniform tie-break among maximizers.
    ///
    /// ε decays by a factor of `1 - epsilon_decay` after every call,
    /// including calls that only look ahead for a SARSA update.
    fn select(&mut self, state: &BoardState) -> Result<Action> {
        let legal = state.legal_actions();
        let no_actions = || Error::NoLegalActions {
            state: state.encode(),
        };

        let action = if self.rng.random::<f64>() < self.epsilon {
            *legal.choose(&mut self.rng).ok_or_else(no_actions)?
        } else {
            let best = self.q_table.greedy_actions(state, &legal);
            *best.choose(&mut self.rng).ok_or_else(no_actions)?
        };

        self.epsilon *= 1.0 - self.epsilon_decay;
        Ok(action)
    }

    fn export_state(&self) -> TdAgentState {
        TdAgentState {
            q_table: self.q_table.clone(),
            epsilon: self.epsilon,
            epsilon_decay: self.epsilon_decay,
            rewards: self.rewards.clone(),
            rng_seed: self.rng_seed,
        }
    }

    fn from_state(state: TdAgentState) -> Self {
        Self {
            q_table: state.q_table,
            epsilon: state.epsilon,
            epsilon_decay: state.epsilon_decay,
            rewards: state.rewards,
            rng: build_rng(state.rng_seed),
            rng_seed: state.rng_seed,
        }
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Learns Q* by updating toward the best value of the next state,
/// regardless of the action that will actually be taken there.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    core: TdCore,
}

impl QLearningAgent {
    /// Create a new Q-learning agent
    ///
    /// # Arguments
    ///
    /// * `learning_rate` - α parameter (0.0 to 1.0)
    /// * `discount_factor` - γ parameter (0.0 to 1.0)
    /// * `epsilon` - Initial exploration rate
    /// * `epsilon_decay` - Fractional decay applied after every selection
    pub fn new(learning_rate: f64, discount_factor: f64, epsilon: f64, epsilon_decay: f64) -> Self {
        Self {
            core: TdCore::new(learning_rate, discount_factor, epsilon, epsilon_decay),
        }
    }

    /// Seed the exploration and tie-breaking RNG
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.core.seed(seed);
        self
    }

    /// Get the underlying Q-table
    pub fn q_table(&self) -> &QTable {
        &self.core.q_table
    }

    /// Current Q(s,a); unseen pairs read as 0.0.
    pub fn q_value(&self, state: &BoardState, action: Action) -> f64 {
        self.core.q_table.get(state, action)
    }

    /// Legal actions of `state` that share the highest Q-value.
    pub fn greedy_actions(&self, state: &BoardState) -> Vec<Action> {
        self.core
            .q_table
            .greedy_actions(state, &state.legal_actions())
    }

    /// Get current exploration rate
    pub fn exploration_rate(&self) -> f64 {
        self.core.epsilon
    }

    /// Set exploration rate
    pub fn set_exploration_rate(&mut self, epsilon: f64) {
        self.core.epsilon = epsilon;
    }

    pub fn exploration_decay(&self) -> f64 {
        self.core.epsilon_decay
    }

    /// Number of state-action pairs learned so far
    pub fn table_size(&self) -> usize {
        self.core.q_table.size()
    }

    pub fn export_state(&self) -> TdAgentState {
        self.core.export_state()
    }

    /// Restore an agent; a seeded agent restarts its random stream.
    pub fn from_state(state: TdAgentState) -> Self {
        Self {
            core: TdCore::from_state(state),
        }
    }
}

impl Policy for QLearningAgent {
    fn select_action(&mut self, state: &BoardState) -> Result<Action> {
        self.core.select(state)
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }
}

impl Learner for QLearningAgent {
    fn update(&mut self, transition: &Transition) -> Result<()> {
        self.core.q_table.q_learning_update(
            transition.state,
            transition.action,
            transition.reward,
            transition.next_state.as_ref(),
        );
        self.core.rewards.push(transition.reward);
        Ok(())
    }

    fn reward_trace(&self) -> &[f64] {
        &self.core.rewards
    }
}

/// SARSA agent (on-policy TD control)
///
/// Learns Q^π for the policy it follows, exploration included, so every
/// non-terminal update needs the action chosen in the next state.
#[derive(Debug, Clone)]
pub struct SarsaAgent {
    core: TdCore,
}

impl SarsaAgent {
    /// Create a new SARSA agent
    pub fn new(learning_rate: f64, discount_factor: f64, epsilon: f64, epsilon_decay: f64) -> Self {
        Self {
            core: TdCore::new(learning_rate, discount_factor, epsilon, epsilon_decay),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.core.seed(seed);
        self
    }

    pub fn q_table(&self) -> &QTable {
        &self.core.q_table
    }

    /// Current Q(s,a); unseen pairs read as 0.0.
    pub fn q_value(&self, state: &BoardState, action: Action) -> f64 {
        self.core.q_table.get(state, action)
    }

    pub fn greedy_actions(&self, state: &BoardState) -> Vec<Action> {
        self.core
            .q_table
            .greedy_actions(state, &state.legal_actions())
    }

    pub fn exploration_rate(&self) -> f64 {
        self.core.epsilon
    }

    pub fn set_exploration_rate(&mut self, epsilon: f64) {
        self.core.epsilon = epsilon;
    }

    pub fn exploration_decay(&self) -> f64 {
        self.core.epsilon_decay
    }

    pub fn table_size(&self) -> usize {
        self.core.q_table.size()
    }

    pub fn export_state(&self) -> TdAgentState {
        self.core.export_state()
    }

    /// Restore an agent; a seeded agent restarts its random stream.
    pub fn from_state(state: TdAgentState) -> Self {
        Self {
            core: TdCore::from_state(state),
        }
    }
}

impl Policy for SarsaAgent {
    fn select_action(&mut self, state: &BoardState) -> Result<Action> {
        self.core.select(state)
    }

    fn name(&self) -> &str {
        "SARSA"
    }
}

impl Learner for SarsaAgent {
    fn update(&mut self, transition: &Transition) -> Result<()> {
        let next = match (transition.next_state.as_ref(), transition.next_action) {
            (None, _) => None,
            (Some(next_state), Some(next_action)) => Some((next_state, next_action)),
            (Some(next_state), None) => {
                return Err(Error::IncompleteTransition {
                    message: format!(
                        "SARSA update from '{}' needs the next action for '{}'",
                        transition.state.encode(),
                        next_state.encode()
                    ),
                });
            }
        };

        self.core.q_table.sarsa_update(
            transition.state,
            transition.action,
            transition.reward,
            next,
        );
        self.core.rewards.push(transition.reward);
        Ok(())
    }

    fn reward_trace(&self) -> &[f64] {
        &self.core.rewards
    }
}
