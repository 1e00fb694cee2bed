//! Reinforcement learning agents for Tic-Tac-Toe
//!
//! This crate provides:
//! - A Tic-Tac-Toe board model with move legality and outcome detection
//! - A rule-based heuristic opponent with a tunable ability level
//! - Q-learning and SARSA agents with epsilon-greedy exploration
//! - Value Iteration and Policy Iteration planners over the full state space
//! - An episode driver and training pipeline with progress observers
//! - Versioned agent persistence and reward-curve export

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod export;
pub mod heuristic;
pub mod persistence;
pub mod pipeline;
pub mod planning;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;

pub use error::{Error, Result};
pub use heuristic::HeuristicOpponent;
pub use persistence::{SavedAgent, TrainedAgent};
pub use planning::{PlannerConfig, PolicyIterationAgent, ValueIterationAgent};
pub use q_learning::{QLearningAgent, SarsaAgent};
pub use tictactoe::{Action, BoardState, Mark, Outcome};
