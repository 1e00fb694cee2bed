//! Q-learning and SARSA temporal difference learning
//!
//! Both agents learn a tabular action-value function online, one transition
//! at a time, while playing ε-greedily.
//!
//! | Aspect | Q-learning | SARSA |
//! |--------|------------|-------|
//! | Policy | Off-policy (learns Q*) | On-policy (learns Q^π) |
//! | Bootstrap | max_a' Q(s',a') | Q(s',a') of the chosen a' |
//!
//! ```no_run
//! use tictactoe_rl::q_learning::{QLearningAgent, SarsaAgent};
//!
//! let q_agent = QLearningAgent::new(
//!     0.5, // learning_rate
//!     0.9, // discount_factor
//!     0.1, // epsilon
//!     0.0, // epsilon_decay
//! );
//! let sarsa_agent = SarsaAgent::new(0.5, 0.9, 0.1, 0.0).with_seed(42);
//! ```

pub mod agent;
pub mod q_table;

pub use agent::{QLearningAgent, SarsaAgent, TdAgentState};
pub use q_table::QTable;
