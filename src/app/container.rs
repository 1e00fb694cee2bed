//! Dependency injection container for the application.
//!
//! The container owns infrastructure dependencies (the agent repository, a
//! default seed) and provides factory methods for agents.

use std::{path::Path, sync::Arc};

use super::config::{AgentConfig, AgentKind};
use crate::{
    Error, Result,
    adapters::MsgPackRepository,
    persistence::{SavedAgent, TrainedAgent},
    planning::{PolicyIterationAgent, ValueIterationAgent},
    ports::AgentRepository,
    q_learning::{QLearningAgent, SarsaAgent},
};

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```no_run
/// use tictactoe_rl::app::{AgentConfig, AgentKind, App};
///
/// let app = App::new();
/// let agent = app.create_agent(AgentKind::QLearning, AgentConfig::new().with_seed(42))?;
/// # Ok::<(), tictactoe_rl::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use tictactoe_rl::app::App;
/// use tictactoe_rl::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for agent persistence
    agent_repository: Arc<dyn AgentRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses `MsgPackRepository` and no default seed.
    pub fn new() -> Self {
        Self {
            agent_repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the agent repository.
    pub fn agent_repository(&self) -> Arc<dyn AgentRepository + Send + Sync> {
        Arc::clone(&self.agent_repository)
    }

    /// Create a fresh agent of the given kind.
    ///
    /// Planners compute their policy here, so the returned agent is ready
    /// to play.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation.
    pub fn create_agent(&self, kind: AgentKind, config: AgentConfig) -> Result<TrainedAgent> {
        config.validate()?;
        let seed = config.seed.or(self.default_seed);

        let mut agent = match kind {
            AgentKind::QLearning => {
                let agent = QLearningAgent::new(
                    config.learning_rate,
                    config.discount,
                    config.exploration_rate,
                    config.exploration_decay,
                );
                TrainedAgent::QLearning(match seed {
                    Some(seed) => agent.with_seed(seed),
                    None => agent,
                })
            }
            AgentKind::Sarsa => {
                let agent = SarsaAgent::new(
                    config.learning_rate,
                    config.discount,
                    config.exploration_rate,
                    config.exploration_decay,
                );
                TrainedAgent::Sarsa(match seed {
                    Some(seed) => agent.with_seed(seed),
                    None => agent,
                })
            }
            AgentKind::ValueIteration => {
                let agent = ValueIterationAgent::new(config.planner_config());
                TrainedAgent::ValueIteration(match seed {
                    Some(seed) => agent.with_seed(seed),
                    None => agent,
                })
            }
            AgentKind::PolicyIteration => {
                let agent = PolicyIterationAgent::new(config.planner_config());
                TrainedAgent::PolicyIteration(match seed {
                    Some(seed) => agent.with_seed(seed),
                    None => agent,
                })
            }
        };

        if let Some(planner) = agent.as_planner_mut() {
            let iterations = planner.train()?;
            log::info!("{kind} policy computed in {iterations} iterations");
        }
        Ok(agent)
    }

    /// Load an agent from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the file is missing, corrupt or of an
    /// unsupported version.
    pub fn load_agent(&self, path: &Path) -> Result<TrainedAgent> {
        self.agent_repository.load(path)?.to_agent()
    }

    /// Load the agent at `path` when `load` is set, otherwise create a fresh one.
    ///
    /// # Errors
    ///
    /// Besides the errors of [`App::load_agent`] and [`App::create_agent`],
    /// fails with [`Error::InvalidConfiguration`] if the stored agent is of
    /// another kind.
    pub fn load_or_create(
        &self,
        kind: AgentKind,
        path: &Path,
        load: bool,
        config: AgentConfig,
    ) -> Result<TrainedAgent> {
        if !load {
            return self.create_agent(kind, config);
        }

        let agent = self.load_agent(path)?;
        if agent.kind() != kind {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "{} holds a {} agent, not {kind}",
                    path.display(),
                    agent.kind()
                ),
            });
        }
        Ok(agent)
    }

    /// Save an agent to persistent storage.
    pub fn save_agent(&self, agent: &TrainedAgent, path: &Path) -> Result<()> {
        self.agent_repository
            .save(&SavedAgent::from_agent(agent), path)
    }

    /// Whether something is stored at `path`.
    pub fn agent_exists(&self, path: &Path) -> bool {
        self.agent_repository.exists(path)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// Primarily used for testing to inject mock repositories and control randomness.
pub struct AppBuilder {
    agent_repository: Option<Arc<dyn AgentRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            agent_repository: None,
            default_seed: None,
        }
    }

    /// Set a custom agent repository.
    pub fn with_repository<R: AgentRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.agent_repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for all agents created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `MsgPackRepository` by default.
    pub fn build(self) -> App {
        App {
            agent_repository: self
                .agent_repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::InMemoryRepository,
        ports::{Learner, Policy},
        tictactoe::{BoardState, StateSpace},
    };

    fn test_app() -> App {
        App::for_testing()
            .with_repository(InMemoryRepository::new())
            .with_default_seed(42)
            .build()
    }

    #[test]
    fn test_app_creates_online_agents() {
        let app = test_app();
        let q = app
            .create_agent(AgentKind::QLearning, AgentConfig::new())
            .unwrap();
        assert_eq!(q.kind(), AgentKind::QLearning);
        assert_eq!(q.exploration_rate(), Some(0.1));

        let sarsa = app.create_agent(AgentKind::Sarsa, AgentConfig::new()).unwrap();
        assert_eq!(sarsa.name(), "SARSA");
    }

    #[test]
    fn test_planners_are_trained_on_creation() {
        let app = test_app();
        let config = AgentConfig::new().with_state_space(StateSpace::TurnConsistent);
        let mut agent = app
            .create_agent(AgentKind::ValueIteration, config)
            .unwrap();
        let planner = agent.as_planner_mut().unwrap();
        assert!(planner.is_trained());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let app = test_app();
        let err = app
            .create_agent(AgentKind::Sarsa, AgentConfig::new().with_learning_rate(2.0))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_save_then_load_or_create() {
        let app = test_app();
        let path = Path::new("agents/q");
        let mut agent = app
            .create_agent(AgentKind::QLearning, AgentConfig::new())
            .unwrap();
        agent.select_action(&BoardState::new()).unwrap();
        app.save_agent(&agent, path).unwrap();
        assert!(app.agent_exists(path));

        let loaded = app
            .load_or_create(AgentKind::QLearning, path, true, AgentConfig::new())
            .unwrap();
        assert_eq!(loaded.reward_trace(), agent.reward_trace());

        let err = app
            .load_or_create(AgentKind::Sarsa, path, true, AgentConfig::new())
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_loading_missing_agent_is_persistence_error() {
        let app = test_app();
        let err = app
            .load_or_create(
                AgentKind::QLearning,
                Path::new("missing"),
                true,
                AgentConfig::new(),
            )
            .unwrap_err();
        assert!(err.is_persistence());

        let fresh = app
            .load_or_create(
                AgentKind::QLearning,
                Path::new("missing"),
                false,
                AgentConfig::new(),
            )
            .unwrap();
        assert!(fresh.reward_trace().is_empty());
    }
}
