//! Episode driver and training pipeline
//!
//! This module provides:
//! - A single-episode driver that credits the learner's own moves
//! - A training pipeline that runs many episodes and aggregates results
//! - Observers that report progress and metrics during training

pub mod episode;
pub mod observers;
pub mod training;

pub use episode::{
    Episode, EpisodeConfig, EpisodePhase, EpisodeSummary, FirstMover, MoveHook, Opponent,
};
pub use observers::{LoggingObserver, MetricsObserver, MetricsSummary, ProgressObserver};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult, WindowStats};

pub use crate::ports::{Learner, Observer};
