//! Policy Iteration planner

use std::collections::HashMap;

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use super::{
    model::{PlannerConfig, PlannerState, PlanningModel},
    value_iteration::{build_rng, fallback_action},
};
use crate::{
    Error, Result,
    ports::{Learner, Planner, Policy, Transition},
    tictactoe::{Action, BoardState},
};

/// Policy Iteration agent.
///
/// Starts from a uniformly random policy and alternates full policy
/// evaluation with greedy improvement until no state changes its action.
#[derive(Debug, Clone)]
pub struct PolicyIterationAgent {
    model: PlanningModel,
    values: HashMap<BoardState, f64>,
    policy: HashMap<BoardState, Action>,
    iterations: Option<usize>,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl PolicyIterationAgent {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            model: PlanningModel::new(config),
            values: HashMap::new(),
            policy: HashMap::new(),
            iterations: None,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    /// Seed the generator used for the initial policy and the fallback move.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        self.model.config()
    }

    pub fn state_count(&self) -> usize {
        self.model.state_count()
    }

    pub fn value(&self, state: &BoardState) -> Option<f64> {
        self.values.get(state).copied()
    }

    pub fn policy_action(&self, state: &BoardState) -> Option<Action> {
        self.policy.get(state).copied()
    }

    /// Evaluation/improvement rounds performed by the last training run.
    pub fn iterations(&self) -> Option<usize> {
        self.iterations
    }

    fn random_policy(&mut self) -> Result<HashMap<BoardState, Action>> {
        let mut policy = HashMap::new();
        for state in self.model.decision_states() {
            let legal = state.legal_actions();
            let action = *legal.choose(&mut self.rng).ok_or_else(|| Error::NoLegalActions {
                state: state.encode(),
            })?;
            policy.insert(*state, action);
        }
        Ok(policy)
    }

    /// Iterate `V[s] = r(s,π(s),s') + γ V[s']` until the sweep delta drops below θ.
    fn evaluate(
        &self,
        policy: &HashMap<BoardState, Action>,
        values: &mut HashMap<BoardState, f64>,
    ) -> Result<usize> {
        let config = self.model.config();
        let mut sweeps = 0;
        loop {
            sweeps += 1;
            let mut delta: f64 = 0.0;
            for state in self.model.decision_states() {
                let Some(&action) = policy.get(state) else {
                    continue;
                };
                let value = self.model.action_value(values, state, action)?;
                let old = values.insert(*state, value).unwrap_or(0.0);
                delta = delta.max((value - old).abs());
            }

            if delta < config.theta {
                return Ok(sweeps);
            }
            if sweeps >= config.max_iterations {
                log::warn!(
                    "policy evaluation stopped at the {} sweep cap (delta {delta:.3e})",
                    config.max_iterations
                );
                return Ok(sweeps);
            }
        }
    }

    /// Make the policy greedy with respect to `values`. Returns `true` when
    /// no state changed its action.
    ///
    /// The current action is kept whenever it already attains the maximum,
    /// so equally good actions cannot make the loop cycle.
    fn improve(
        &self,
        policy: &mut HashMap<BoardState, Action>,
        values: &HashMap<BoardState, f64>,
    ) -> Result<bool> {
        let mut stable = true;
        for state in self.model.decision_states() {
            let (best_action, best_value) = self.model.greedy(values, state)?;
            let keep = match policy.get(state) {
                Some(&current) => self.model.action_value(values, state, current)? >= best_value,
                None => false,
            };
            if !keep {
                policy.insert(*state, best_action);
                stable = false;
            }
        }
        Ok(stable)
    }

    /// Discard any previous result and run policy iteration again.
    pub fn retrain(&mut self) -> Result<usize> {
        let max_iterations = self.model.config().max_iterations;
        let mut policy = self.random_policy()?;
        let mut values = HashMap::new();
        let mut rounds = 0;

        loop {
            rounds += 1;
            let sweeps = self.evaluate(&policy, &mut values)?;
            let stable = self.improve(&mut policy, &values)?;
            log::debug!("policy iteration round {rounds}: {sweeps} evaluation sweeps, stable {stable}");

            if stable {
                log::info!(
                    "policy iteration converged after {rounds} rounds over {} states",
                    self.model.state_count()
                );
                break;
            }
            if rounds >= max_iterations {
                log::warn!("policy iteration stopped at the {max_iterations} round cap");
                break;
            }
        }

        self.values = values;
        self.policy = policy;
        self.iterations = Some(rounds);
        Ok(rounds)
    }

    pub fn export_state(&self) -> PlannerState {
        PlannerState {
            config: *self.model.config(),
            values: self.values.clone(),
            policy: self.policy.clone(),
            iterations: self.iterations,
            rng_seed: self.rng_seed,
        }
    }

    pub fn from_state(state: PlannerState) -> Self {
        Self {
            model: PlanningModel::new(state.config),
            values: state.values,
            policy: state.policy,
            iterations: state.iterations,
            rng: build_rng(state.rng_seed),
            rng_seed: state.rng_seed,
        }
    }
}

impl Policy for PolicyIterationAgent {
    fn select_action(&mut self, state: &BoardState) -> Result<Action> {
        match self.policy.get(state) {
            Some(&action) => Ok(action),
            None => fallback_action(&mut self.rng, "Policy Iteration", state),
        }
    }

    fn name(&self) -> &str {
        "Policy Iteration"
    }
}

impl Learner for PolicyIterationAgent {
    fn update(&mut self, _transition: &Transition) -> Result<()> {
        Ok(())
    }

    fn reward_trace(&self) -> &[f64] {
        &[]
    }
}

impl Planner for PolicyIterationAgent {
    fn train(&mut self) -> Result<usize> {
        match self.iterations {
            Some(rounds) => Ok(rounds),
            None => self.retrain(),
        }
    }

    fn is_trained(&self) -> bool {
        self.iterations.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::StateSpace;

    fn small_config() -> PlannerConfig {
        PlannerConfig {
            state_space: StateSpace::TurnConsistent,
            ..PlannerConfig::default()
        }
    }

    #[test]
    fn test_policy_iteration_finds_immediate_win() {
        let mut agent = PolicyIterationAgent::new(small_config()).with_seed(4);
        let rounds = agent.train().unwrap();
        assert!(rounds >= 1);

        let s = BoardState::parse("XX-OO----").unwrap();
        assert_eq!(agent.select_action(&s).unwrap(), Action::new(1, 2).unwrap());
        assert_eq!(agent.value(&s), Some(1.0));
    }

    #[test]
    fn test_retrain_recomputes_same_values() {
        let mut agent = PolicyIterationAgent::new(small_config()).with_seed(8);
        agent.train().unwrap();
        let empty = BoardState::new();
        let before = agent.value(&empty).unwrap();

        agent.retrain().unwrap();
        let after = agent.value(&empty).unwrap();
        assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn test_restored_agent_keeps_policy() {
        let mut agent = PolicyIterationAgent::new(small_config()).with_seed(2);
        agent.train().unwrap();
        let mut restored = PolicyIterationAgent::from_state(agent.export_state());
        assert!(restored.is_trained());

        let probe = BoardState::parse("X---O----").unwrap();
        assert_eq!(
            restored.select_action(&probe).unwrap(),
            agent.policy_action(&probe).unwrap()
        );
    }
}
