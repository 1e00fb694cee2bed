//! Saved agent format and the agent enum it restores into.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    app::AgentKind,
    planning::{PlannerState, PolicyIterationAgent, ValueIterationAgent},
    ports::{Learner, Planner, Policy, Transition},
    q_learning::{QLearningAgent, SarsaAgent, TdAgentState},
    tictactoe::{Action, BoardState},
};

/// Table and bookkeeping of either agent family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    TemporalDifference(TdAgentState),
    Planner(PlannerState),
}

/// Version-tagged snapshot of an agent, as stored by an
/// [`AgentRepository`](crate::ports::AgentRepository).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAgent {
    pub version: u32,
    pub kind: AgentKind,
    state: AgentState,
}

impl SavedAgent {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &TrainedAgent) -> Self {
        let state = match agent {
            TrainedAgent::QLearning(agent) => AgentState::TemporalDifference(agent.export_state()),
            TrainedAgent::Sarsa(agent) => AgentState::TemporalDifference(agent.export_state()),
            TrainedAgent::ValueIteration(agent) => AgentState::Planner(agent.export_state()),
            TrainedAgent::PolicyIteration(agent) => AgentState::Planner(agent.export_state()),
        };
        Self {
            version: Self::VERSION,
            kind: agent.kind(),
            state,
        }
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    /// Rebuild the agent.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedVersion`] for another format version and
    /// [`Error::Persistence`] when the state does not match the kind.
    pub fn to_agent(&self) -> Result<TrainedAgent> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }

        let agent = match (self.kind, &self.state) {
            (AgentKind::QLearning, AgentState::TemporalDifference(state)) => {
                TrainedAgent::QLearning(QLearningAgent::from_state(state.clone()))
            }
            (AgentKind::Sarsa, AgentState::TemporalDifference(state)) => {
                TrainedAgent::Sarsa(SarsaAgent::from_state(state.clone()))
            }
            (AgentKind::ValueIteration, AgentState::Planner(state)) => {
                TrainedAgent::ValueIteration(ValueIterationAgent::from_state(state.clone()))
            }
            (AgentKind::PolicyIteration, AgentState::Planner(state)) => {
                TrainedAgent::PolicyIteration(PolicyIterationAgent::from_state(state.clone()))
            }
            (kind, _) => {
                return Err(Error::Persistence {
                    operation: "restore agent".to_string(),
                    message: format!("saved state does not belong to a {kind} agent"),
                });
            }
        };
        Ok(agent)
    }
}

/// Any of the four agent variants.
///
/// Implements [`Learner`] by delegation so it can be handed to the episode
/// driver directly.
#[derive(Debug, Clone)]
pub enum TrainedAgent {
    QLearning(QLearningAgent),
    Sarsa(SarsaAgent),
    ValueIteration(ValueIterationAgent),
    PolicyIteration(PolicyIterationAgent),
}

impl TrainedAgent {
    pub fn kind(&self) -> AgentKind {
        match self {
            TrainedAgent::QLearning(_) => AgentKind::QLearning,
            TrainedAgent::Sarsa(_) => AgentKind::Sarsa,
            TrainedAgent::ValueIteration(_) => AgentKind::ValueIteration,
            TrainedAgent::PolicyIteration(_) => AgentKind::PolicyIteration,
        }
    }

    fn learner(&self) -> &dyn Learner {
        match self {
            TrainedAgent::QLearning(agent) => agent,
            TrainedAgent::Sarsa(agent) => agent,
            TrainedAgent::ValueIteration(agent) => agent,
            TrainedAgent::PolicyIteration(agent) => agent,
        }
    }

    fn learner_mut(&mut self) -> &mut dyn Learner {
        match self {
            TrainedAgent::QLearning(agent) => agent,
            TrainedAgent::Sarsa(agent) => agent,
            TrainedAgent::ValueIteration(agent) => agent,
            TrainedAgent::PolicyIteration(agent) => agent,
        }
    }

    /// The planner capability, for the two offline variants.
    pub fn as_planner_mut(&mut self) -> Option<&mut dyn Planner> {
        match self {
            TrainedAgent::ValueIteration(agent) => Some(agent),
            TrainedAgent::PolicyIteration(agent) => Some(agent),
            TrainedAgent::QLearning(_) | TrainedAgent::Sarsa(_) => None,
        }
    }

    /// Current exploration rate; `None` for planners.
    pub fn exploration_rate(&self) -> Option<f64> {
        match self {
            TrainedAgent::QLearning(agent) => Some(agent.exploration_rate()),
            TrainedAgent::Sarsa(agent) => Some(agent.exploration_rate()),
            TrainedAgent::ValueIteration(_) | TrainedAgent::PolicyIteration(_) => None,
        }
    }

    /// Override the exploration rate of an online learner; no effect on planners.
    pub fn set_exploration_rate(&mut self, epsilon: f64) {
        match self {
            TrainedAgent::QLearning(agent) => agent.set_exploration_rate(epsilon),
            TrainedAgent::Sarsa(agent) => agent.set_exploration_rate(epsilon),
            TrainedAgent::ValueIteration(_) | TrainedAgent::PolicyIteration(_) => {}
        }
    }
}

impl Policy for TrainedAgent {
    fn select_action(&mut self, state: &BoardState) -> Result<Action> {
        self.learner_mut().select_action(state)
    }

    fn name(&self) -> &str {
        self.learner().name()
    }
}

impl Learner for TrainedAgent {
    fn update(&mut self, transition: &Transition) -> Result<()> {
        self.learner_mut().update(transition)
    }

    fn reward_trace(&self) -> &[f64] {
        self.learner().reward_trace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_agent_restores_kind() {
        let agent = TrainedAgent::Sarsa(SarsaAgent::new(0.5, 0.9, 0.1, 0.0).with_seed(1));
        let saved = SavedAgent::from_agent(&agent);
        assert_eq!(saved.version, SavedAgent::VERSION);
        assert_eq!(saved.kind, AgentKind::Sarsa);

        let restored = saved.to_agent().unwrap();
        assert_eq!(restored.kind(), AgentKind::Sarsa);
        assert!(matches!(restored, TrainedAgent::Sarsa(_)));
        assert_eq!(restored.exploration_rate(), Some(0.1));
    }

    #[test]
    fn test_unsupported_version_is_rejected() {
        let agent = TrainedAgent::QLearning(QLearningAgent::new(0.5, 0.9, 0.1, 0.0));
        let mut saved = SavedAgent::from_agent(&agent);
        saved.version = 99;

        let err = saved.to_agent().unwrap_err();
        assert!(err.is_persistence());
        assert!(matches!(
            err,
            Error::UnsupportedVersion {
                found: 99,
                expected: 1
            }
        ));
    }

    #[test]
    fn test_kind_state_mismatch_is_rejected() {
        let agent = TrainedAgent::QLearning(QLearningAgent::new(0.5, 0.9, 0.1, 0.0));
        let mut saved = SavedAgent::from_agent(&agent);
        saved.kind = AgentKind::ValueIteration;
        assert!(matches!(saved.to_agent(), Err(Error::Persistence { .. })));
    }
}
