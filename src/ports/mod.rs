//! Ports (trait boundaries) between the learning core and its collaborators.
//!
//! The core exposes a narrow interface: query an action for a state, request
//! a learning update, run a planner to convergence, and persist or restore
//! agent state. Drivers, front ends and storage plug in through these traits.

pub mod learner;
pub mod observer;
pub mod repository;

pub use learner::{Learner, Planner, Policy, Transition};
pub use observer::Observer;
pub use repository::AgentRepository;
