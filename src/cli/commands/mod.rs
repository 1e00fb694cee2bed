//! Subcommands of the tictactoe binary

pub mod play;
pub mod rewards;
pub mod train;

use std::path::PathBuf;

use clap::Args;

use crate::app::{AgentConfig, AgentKind};

/// Parse `q|s|v|p` or a long agent name for clap.
pub(crate) fn parse_agent_kind(value: &str) -> Result<AgentKind, String> {
    value.parse().map_err(|e: crate::Error| e.to_string())
}

/// Agent selection and hyperparameters shared by `train` and `play`.
#[derive(Args, Debug, Clone)]
pub struct AgentArgs {
    /// Agent type (q=Q-Learning, s=SARSA, v=Value Iteration, p=Policy Iteration)
    #[arg(long, short = 'a', default_value = "q", value_parser = parse_agent_kind)]
    pub agent: AgentKind,

    /// Path of the saved agent (defaults to <kind>_agent.msgpack)
    #[arg(long, short = 'p')]
    pub path: Option<PathBuf>,

    /// Load the agent stored at --path instead of creating a new one
    #[arg(long, short = 'l')]
    pub load: bool,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Learning rate α
    #[arg(long, default_value_t = 0.5)]
    pub learning_rate: f64,

    /// Discount factor γ
    #[arg(long, default_value_t = 0.9)]
    pub discount: f64,

    /// Initial exploration rate ε
    #[arg(long, default_value_t = 0.1)]
    pub exploration: f64,

    /// Fraction by which ε shrinks after every move
    #[arg(long, default_value_t = 0.0)]
    pub exploration_decay: f64,
}

impl AgentArgs {
    pub fn path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.agent.default_file_name()))
    }

    pub fn config(&self) -> AgentConfig {
        let config = AgentConfig::new()
            .with_learning_rate(self.learning_rate)
            .with_discount(self.discount)
            .with_exploration(self.exploration, self.exploration_decay);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_agent_kind_reports_choices() {
        assert_eq!(parse_agent_kind("p"), Ok(AgentKind::PolicyIteration));
        let message = parse_agent_kind("z").unwrap_err();
        assert!(message.contains("q, s, v, p"));
    }
}
