//! Tic-Tac-Toe board model
//!
//! The board is the single source of truth for move legality and game
//! outcome. Every other component (heuristic opponent, learners, planners,
//! episode driver) consumes it.

pub mod board;
pub mod lines;
pub mod state_space;

pub use board::{Action, BoardState, Cell, Mark, Outcome};
pub use lines::{LineAnalyzer, THREAT_SCAN_ORDER, WINNING_LINES};
pub use state_space::StateSpace;
