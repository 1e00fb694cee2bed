//! MessagePack implementation of the agent repository.
//!
//! This adapter implements the AgentRepository port using rmp_serde for
//! compact binary serialization.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, persistence::SavedAgent, ports::AgentRepository};

/// MessagePack-based agent repository.
///
/// Q-tables and value tables are keyed by the board's 9-character string,
/// so files stay readable by any MessagePack tool.
///
/// # Examples
///
/// ```no_run
/// use tictactoe_rl::adapters::MsgPackRepository;
/// use tictactoe_rl::persistence::{SavedAgent, TrainedAgent};
/// use tictactoe_rl::ports::AgentRepository;
/// use tictactoe_rl::q_learning::QLearningAgent;
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let agent = TrainedAgent::QLearning(QLearningAgent::new(0.5, 0.9, 0.1, 0.0));
///
/// repo.save(&SavedAgent::from_agent(&agent), Path::new("q_agent.msgpack"))?;
/// let loaded = repo.load(Path::new("q_agent.msgpack"))?.to_agent()?;
/// # Ok::<(), tictactoe_rl::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl AgentRepository for MsgPackRepository {
    fn save(&self, agent: &SavedAgent, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, agent).map_err(|e| Error::Persistence {
            operation: "serialize agent to MessagePack".to_string(),
            message: e.to_string(),
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("write file {path:?}"),
            source,
        })?;

        log::debug!("saved {} agent to {}", agent.kind, path.display());
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedAgent> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let agent: SavedAgent =
            rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| Error::Persistence {
                operation: format!("deserialize agent from {path:?}"),
                message: e.to_string(),
            })?;

        log::debug!("loaded {} agent from {}", agent.kind, path.display());
        Ok(agent)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        persistence::TrainedAgent,
        planning::{PlannerConfig, ValueIterationAgent},
        ports::{Learner, Transition},
        q_learning::QLearningAgent,
        tictactoe::{Action, BoardState, StateSpace},
    };

    #[test]
    fn test_msgpack_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("q_agent.msgpack");

        let mut agent = QLearningAgent::new(0.5, 0.9, 0.1, 0.0).with_seed(3);
        let state = BoardState::parse("XX-OO----").expect("valid board");
        agent
            .update(&Transition::terminal(state, Action::new(1, 2).expect("in range"), 1.0))
            .expect("update");
        let saved = SavedAgent::from_agent(&TrainedAgent::QLearning(agent));

        let repo = MsgPackRepository::new();
        assert!(!repo.exists(&file_path));
        repo.save(&saved, &file_path).expect("Failed to save");
        assert!(repo.exists(&file_path));

        let loaded = repo.load(&file_path).expect("Failed to load");
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_planner_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("v_agent.msgpack");

        let mut planner = ValueIterationAgent::new(PlannerConfig {
            state_space: StateSpace::TurnConsistent,
            ..PlannerConfig::default()
        });
        crate::ports::Planner::train(&mut planner).expect("planner converges");
        let saved = SavedAgent::from_agent(&TrainedAgent::ValueIteration(planner));

        let repo = MsgPackRepository::new();
        repo.save(&saved, &file_path).expect("Failed to save");
        assert_eq!(repo.load(&file_path).expect("Failed to load"), saved);
    }

    #[test]
    fn test_load_nonexistent_returns_persistence_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = MsgPackRepository::new();
        let err = repo
            .load(&temp_dir.path().join("missing.msgpack"))
            .unwrap_err();
        assert!(err.is_persistence());
    }

    #[test]
    fn test_load_corrupt_file_returns_persistence_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("corrupt.msgpack");
        std::fs::write(&file_path, b"not msgpack at all").expect("write file");

        let err = MsgPackRepository::new().load(&file_path).unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
    }

    #[test]
    fn test_load_out_of_range_action_returns_persistence_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("bad_action.msgpack");

        let mut planner = ValueIterationAgent::new(PlannerConfig {
            state_space: StateSpace::TurnConsistent,
            ..PlannerConfig::default()
        });
        crate::ports::Planner::train(&mut planner).expect("planner converges");
        let saved = SavedAgent::from_agent(&TrainedAgent::ValueIteration(planner));

        let mut value = serde_json::to_value(&saved).expect("to json value");
        value["state"]["planner"]["policy"]["---------"] = serde_json::json!({ "row": 7, "col": 0 });
        let bytes = rmp_serde::to_vec(&value).expect("encode msgpack");
        std::fs::write(&file_path, bytes).expect("write file");

        let err = MsgPackRepository::new().load(&file_path).unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }), "{err:?}");
    }

    #[test]
    fn test_save_to_invalid_path_returns_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let agent = TrainedAgent::QLearning(QLearningAgent::new(0.5, 0.9, 0.1, 0.0));
        let result = MsgPackRepository::new().save(
            &SavedAgent::from_agent(&agent),
            &temp_dir.path().join("no_such_dir").join("file.msgpack"),
        );
        assert!(result.is_err());
    }
}
