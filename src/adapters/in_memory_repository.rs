//! In-memory agent repository for testing.
//!
//! Stores encoded agents in a shared map instead of on disk. The bytes still
//! go through MessagePack so tests exercise the same serde path as files.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, persistence::SavedAgent, ports::AgentRepository};

/// In-memory repository for testing.
///
/// # Examples
///
/// ```
/// use tictactoe_rl::adapters::InMemoryRepository;
/// use tictactoe_rl::persistence::{SavedAgent, TrainedAgent};
/// use tictactoe_rl::ports::AgentRepository;
/// use tictactoe_rl::q_learning::SarsaAgent;
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let agent = TrainedAgent::Sarsa(SarsaAgent::new(0.5, 0.9, 0.1, 0.0));
///
/// repo.save(&SavedAgent::from_agent(&agent), Path::new("sarsa"))?;
/// let loaded = repo.load(Path::new("sarsa"))?;
/// # Ok::<(), tictactoe_rl::Error>(())
/// ```
///
/// All clones share the same underlying storage.
#[derive(Clone)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of agents currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Clear all stored agents.
    pub fn clear(&self) {
        self.storage().clear();
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn key(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl AgentRepository for InMemoryRepository {
    fn save(&self, agent: &SavedAgent, path: &Path) -> Result<()> {
        let bytes = rmp_serde::to_vec(agent).map_err(|e| Error::Persistence {
            operation: "serialize agent for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage().insert(key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedAgent> {
        let storage = self.storage();

        let bytes = storage.get(&key(path)).ok_or_else(|| Error::Io {
            operation: format!("load agent from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::Persistence {
            operation: "deserialize agent from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.storage().contains_key(&key(path))
    }
}
