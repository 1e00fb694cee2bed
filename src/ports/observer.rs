//! Observer port - abstraction for training observation
//!
//! Observers collect progress and metrics during training without coupling
//! the training loop to a particular output.

use crate::{
    Result,
    pipeline::EpisodeSummary,
    tictactoe::{Action, BoardState, Mark},
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_move(...)` - for each ply
///    - `on_episode_end(episode, summary)`
/// 3. `on_training_end()` - once
///
/// Every method defaults to a no-op.
///
/// # Examples
///
/// ```no_run
/// use tictactoe_rl::{pipeline::EpisodeSummary, ports::Observer};
///
/// struct Counter {
///     episodes: usize,
/// }
///
/// impl Observer for Counter {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         _summary: &EpisodeSummary,
///     ) -> tictactoe_rl::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after a move has been applied to the board.
    ///
    /// `state` is the board before the move.
    fn on_move(
        &mut self,
        _episode: usize,
        _ply: usize,
        _state: &BoardState,
        _mark: Mark,
        _action: Action,
    ) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
