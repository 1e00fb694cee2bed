//! Observer implementations for training pipelines

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::episode::EpisodeSummary;
use crate::{
    Result,
    ports::Observer,
    tictactoe::{Action, BoardState, Mark, Outcome},
};

/// Progress observer - Shows a progress bar during training
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    draws: usize,
    losses: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    fn tally(&self) -> String {
        format!("{} D:{} L:{}", self.wins, self.draws, self.losses)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (W:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        match summary.outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.tally());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.tally());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks outcomes, game length and cumulative reward
pub struct MetricsObserver {
    wins: usize,
    draws: usize,
    losses: usize,
    total_episodes: usize,
    move_counts: Vec<usize>,
    cumulative_reward: f64,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            wins: 0,
            draws: 0,
            losses: 0,
            total_episodes: 0,
            move_counts: Vec::new(),
            cumulative_reward: 0.0,
        }
    }

    fn rate(&self, count: usize) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            count as f64 / self.total_episodes as f64
        }
    }

    pub fn win_rate(&self) -> f64 {
        self.rate(self.wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    pub fn loss_rate(&self) -> f64 {
        self.rate(self.losses)
    }

    /// Get average game length in plies
    pub fn avg_game_length(&self) -> f64 {
        if self.move_counts.is_empty() {
            0.0
        } else {
            self.move_counts.iter().sum::<usize>() as f64 / self.move_counts.len() as f64
        }
    }

    /// Sum of terminal rewards over all observed episodes
    pub fn cumulative_reward(&self) -> f64 {
        self.cumulative_reward
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_episodes: self.total_episodes,
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
            win_rate: self.win_rate(),
            draw_rate: self.draw_rate(),
            loss_rate: self.loss_rate(),
            avg_game_length: self.avg_game_length(),
            cumulative_reward: self.cumulative_reward,
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
    pub avg_game_length: f64,
    pub cumulative_reward: f64,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.move_counts.push(0);
        Ok(())
    }

    fn on_move(
        &mut self,
        _episode: usize,
        _ply: usize,
        _state: &BoardState,
        _mark: Mark,
        _action: Action,
    ) -> Result<()> {
        if let Some(last) = self.move_counts.last_mut() {
            *last += 1;
        }
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.total_episodes += 1;
        self.cumulative_reward += summary.reward();
        match summary.outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }
        Ok(())
    }
}

/// Logs an "episodes played" line every `interval` episodes.
pub struct LoggingObserver {
    interval: usize,
}

impl LoggingObserver {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl Observer for LoggingObserver {
    fn on_episode_end(&mut self, episode: usize, _summary: &EpisodeSummary) -> Result<()> {
        let played = episode + 1;
        if played % self.interval == 0 {
            log::info!("Episodes played: {played}");
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        log::debug!("training finished");
        Ok(())
    }
}
