//! Configuration types for agent creation.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    planning::PlannerConfig,
    tictactoe::{Mark, StateSpace},
};

/// The four agent variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    QLearning,
    Sarsa,
    ValueIteration,
    PolicyIteration,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::QLearning,
        AgentKind::Sarsa,
        AgentKind::ValueIteration,
        AgentKind::PolicyIteration,
    ];

    /// Single-letter code used on the command line.
    pub fn code(self) -> char {
        match self {
            AgentKind::QLearning => 'q',
            AgentKind::Sarsa => 's',
            AgentKind::ValueIteration => 'v',
            AgentKind::PolicyIteration => 'p',
        }
    }

    /// Whether the policy is computed offline instead of learned from play.
    pub fn is_planner(self) -> bool {
        matches!(self, AgentKind::ValueIteration | AgentKind::PolicyIteration)
    }

    /// File name used when no path is given.
    pub fn default_file_name(self) -> &'static str {
        match self {
            AgentKind::QLearning => "q_agent.msgpack",
            AgentKind::Sarsa => "sarsa_agent.msgpack",
            AgentKind::ValueIteration => "v_agent.msgpack",
            AgentKind::PolicyIteration => "p_agent.msgpack",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentKind::QLearning => "q-learning",
            AgentKind::Sarsa => "sarsa",
            AgentKind::ValueIteration => "value-iteration",
            AgentKind::PolicyIteration => "policy-iteration",
        };
        f.write_str(name)
    }
}

impl FromStr for AgentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "q" | "q-learning" | "qlearning" => Ok(AgentKind::QLearning),
            "s" | "sarsa" => Ok(AgentKind::Sarsa),
            "v" | "value-iteration" => Ok(AgentKind::ValueIteration),
            "p" | "policy-iteration" => Ok(AgentKind::PolicyIteration),
            _ => Err(Error::UnknownAgentKind {
                input: s.to_string(),
                expected: "q, s, v, p, q-learning, sarsa, value-iteration, policy-iteration"
                    .to_string(),
            }),
        }
    }
}

/// Hyperparameters for every agent kind.
///
/// Online learners read the learning, discount and exploration fields;
/// planners read discount, theta, step penalty, iteration cap and state
/// space. Both use `mark` and `seed`.
///
/// # Examples
///
/// ```
/// use tictactoe_rl::app::AgentConfig;
///
/// let config = AgentConfig::new()
///     .with_learning_rate(0.3)
///     .with_exploration(0.2, 0.001)
///     .with_seed(42);
/// config.validate()?;
/// # Ok::<(), tictactoe_rl::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount: f64,
    /// Initial exploration rate ε
    pub exploration_rate: f64,
    /// Fraction by which ε shrinks after every action selection
    pub exploration_decay: f64,
    /// Planner convergence threshold
    pub theta: f64,
    /// Planner reward for a non-terminal move
    pub step_penalty: f64,
    /// Planner iteration cap
    pub max_iterations: usize,
    pub state_space: StateSpace,
    /// Mark the agent plays
    pub mark: Mark,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    pub fn new() -> Self {
        Self {
            learning_rate: 0.5,
            discount: 0.9,
            exploration_rate: 0.1,
            exploration_decay: 0.0,
            theta: 1e-6,
            step_penalty: -0.01,
            max_iterations: 1000,
            state_space: StateSpace::default(),
            mark: Mark::O,
            seed: None,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    /// Set the initial exploration rate and its per-selection decay.
    pub fn with_exploration(mut self, rate: f64, decay: f64) -> Self {
        self.exploration_rate = rate;
        self.exploration_decay = decay;
        self
    }

    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    pub fn with_step_penalty(mut self, step_penalty: f64) -> Self {
        self.step_penalty = step_penalty;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_state_space(mut self, state_space: StateSpace) -> Self {
        self.state_space = state_space;
        self
    }

    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.mark = mark;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject values outside their meaningful ranges.
    pub fn validate(&self) -> Result<()> {
        let unit = [
            ("learning_rate", self.learning_rate),
            ("discount", self.discount),
            ("exploration_rate", self.exploration_rate),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{name} must be in [0, 1], got {value}")));
            }
        }
        if !(0.0..1.0).contains(&self.exploration_decay) {
            return Err(invalid(format!(
                "exploration_decay must be in [0, 1), got {}",
                self.exploration_decay
            )));
        }
        if self.theta.is_nan() || self.theta <= 0.0 {
            return Err(invalid(format!("theta must be positive, got {}", self.theta)));
        }
        if !self.step_penalty.is_finite() {
            return Err(invalid(format!(
                "step_penalty must be finite, got {}",
                self.step_penalty
            )));
        }
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations must be positive".to_string()));
        }
        Ok(())
    }

    /// The subset of settings the planners use.
    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            mark: self.mark,
            discount: self.discount,
            theta: self.theta,
            step_penalty: self.step_penalty,
            max_iterations: self.max_iterations,
            state_space: self.state_space,
        }
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfiguration { message }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new()
    }
}
