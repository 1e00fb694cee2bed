//! CLI infrastructure for the tictactoe binary
//!
//! Training, interactive play, and reward-curve export on top of the
//! library. All terminal I/O lives here.

pub mod commands;
pub mod human;
pub mod output;
