//! Value Iteration planner

use std::collections::HashMap;

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use super::model::{PlannerConfig, PlannerState, PlanningModel};
use crate::{
    Error, Result,
    ports::{Learner, Planner, Policy, Transition},
    tictactoe::{Action, BoardState},
};

pub(super) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Uniform random legal move for states the policy does not cover.
pub(super) fn fallback_action(rng: &mut StdRng, name: &str, state: &BoardState) -> Result<Action> {
    let legal = state.legal_actions();
    let action = *legal.choose(rng).ok_or_else(|| Error::NoLegalActions {
        state: state.encode(),
    })?;
    log::warn!(
        "{name} has no policy entry for '{}', playing {action} at random",
        state.encode()
    );
    Ok(action)
}

/// Value Iteration agent.
///
/// Sweeps `V[s] = max_a r(s,a,s') + γ V[s']` in place over every decision
/// state until the largest change in a sweep drops below θ, then reads off
/// the greedy policy.
#[derive(Debug, Clone)]
pub struct ValueIterationAgent {
    model: PlanningModel,
    values: HashMap<BoardState, f64>,
    policy: HashMap<BoardState, Action>,
    iterations: Option<usize>,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl ValueIterationAgent {
    /// Create an untrained agent; enumerates the configured state space.
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

    /// Converged value of `state`, if it has been computed.
    pub fn value(&self, state: &BoardState) -> Option<f64> {
        self.values.get(state).copied()
    }

    pub fn policy_action(&self, state: &BoardState) -> Option<Action> {
        self.policy.get(state).copied()
    }

    /// Sweeps performed by the last training run.
    pub fn iterations(&self) -> Option<usize> {
        self.iterations
    }

    /// Discard any previous result and run value iteration again.
    pub fn retrain(&mut self) -> Result<usize> {
        let config = *self.model.config();
        let mut values: HashMap<BoardState, f64> = HashMap::new();
        let mut sweeps = 0;

        loop {
            sweeps += 1;
            let mut delta: f64 = 0.0;
            for state in self.model.decision_states() {
                let (_, best) = self.model.greedy(&values, state)?;
                let old = values.insert(*state, best).unwrap_or(0.0);
                delta = delta.max((best - old).abs());
            }
            log::debug!("value iteration sweep {sweeps}: delta {delta:.3e}");

            if delta < config.theta {
                log::info!(
                    "value iteration converged after {sweeps} sweeps over {} states",
                    self.model.state_count()
                );
                break;
            }
            if sweeps >= config.max_iterations {
                log::warn!(
                    "value iteration stopped at the {} sweep cap (delta {delta:.3e})",
                    config.max_iterations
                );
                break;
            }
        }

        let mut policy = HashMap::new();
        for state in self.model.decision_states() {
            let (action, _) = self.model.greedy(&values, state)?;
            policy.insert(*state, action);
        }

        self.values = values;
        self.policy = policy;
        self.iterations = Some(sweeps);
        Ok(sweeps)
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

impl Policy for ValueIterationAgent {
    fn select_action(&mut self, state: &BoardState) -> Result<Action> {
        match self.policy.get(state) {
            Some(&action) => Ok(action),
            None => fallback_action(&mut self.rng, "Value Iteration", state),
        }
    }

    fn name(&self) -> &str {
        "Value Iteration"
    }
}

impl Learner for ValueIterationAgent {
    fn update(&mut self, _transition: &Transition) -> Result<()> {
        Ok(())
    }

    fn reward_trace(&self) -> &[f64] {
        &[]
    }
}

impl Planner for ValueIterationAgent {
    fn train(&mut self) -> Result<usize> {
        match self.iterations {
            Some(sweeps) => Ok(sweeps),
            None => self.retrain(),
        }
    }

    fn is_trained(&self) -> bool {
        self.iterations.is_some()
    }
}
