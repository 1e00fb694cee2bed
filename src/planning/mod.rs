//! Offline planners
//!
//! Value Iteration and Policy Iteration compute a policy from a full model
//! of the game before any episode is played. They implement
//! [`Learner`](crate::ports::Learner) so the episode driver can use them
//! like any other agent, but their `update` does nothing.

pub mod model;
pub mod policy_iteration;
pub mod value_iteration;

pub use model::{PlannerConfig, PlannerState};
pub use policy_iteration::PolicyIterationAgent;
pub use value_iteration::ValueIterationAgent;
