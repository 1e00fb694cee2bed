//! Repository port for agent persistence.
//!
//! The core does not define a byte format; it only requires that a saved
//! agent restores to the same structure. Adapters pick the encoding.

use std::path::Path;

use crate::{Result, persistence::SavedAgent};

/// Port for persisting and loading trained agents.
///
/// # Examples
///
/// ```no_run
/// use tictactoe_rl::ports::AgentRepository;
/// use tictactoe_rl::persistence::SavedAgent;
/// use std::path::Path;
///
/// fn backup<R: AgentRepository>(repo: &R, agent: &SavedAgent) -> tictactoe_rl::Result<()> {
///     repo.save(agent, Path::new("agent.msgpack"))
/// }
/// ```
pub trait AgentRepository {
    /// Save an agent to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or encoding fails.
    fn save(&self, agent: &SavedAgent, path: &Path) -> Result<()>;

    /// Load an agent from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the source is missing or corrupt.
    fn load(&self, path: &Path) -> Result<SavedAgent>;

    /// Whether something is stored at `path`.
    fn exists(&self, path: &Path) -> bool;
}
