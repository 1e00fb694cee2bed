//! Export functionality for analysis
//!
//! Currently supports CSV export of a learner's cumulative reward curve.
//! Plotting is left to external tools.

mod reward_curve;

pub use reward_curve::{
    RewardPoint, cumulative_rewards, reward_curve, write_reward_curve, write_reward_curve_to_path,
};
