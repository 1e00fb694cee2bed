//! Training pipeline for learnable agents

use std::path::Path;

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::episode::{Episode, EpisodeConfig, EpisodeSummary, FirstMover, Opponent};
use crate::{
    Result,
    heuristic::HeuristicOpponent,
    ports::{Learner, Observer},
    tictactoe::{Action, BoardState, Mark, Outcome},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Random seed for first-mover draws and the heuristic opponent
    pub seed: Option<u64>,

    /// Mark played by the learner
    pub learner_mark: Mark,

    /// Which side opens each episode
    pub first_mover: FirstMover,

    /// Episodes per entry in [`TrainingResult::windows`]
    pub window_size: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 10_000,
            seed: None,
            learner_mark: Mark::O,
            first_mover: FirstMover::Random,
            window_size: 1000,
        }
    }
}

/// Win/draw/loss counts over a contiguous block of episodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    /// Index of the first episode in the window
    pub start_episode: usize,
    pub episodes: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl WindowStats {
    fn record(&mut self, outcome: Outcome) {
        self.episodes += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }
    }

    pub fn win_rate(&self) -> f64 {
        rate(self.wins, self.episodes)
    }

    /// Share of episodes the learner did not lose.
    pub fn non_loss_rate(&self) -> f64 {
        rate(self.wins + self.draws, self.episodes)
    }
}

fn rate(count: usize, total: usize) -> f64 {
    if total > 0 {
        count as f64 / total as f64
    } else {
        0.0
    }
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes played
    pub total_episodes: usize,

    /// Number of wins
    pub wins: usize,

    /// Number of draws
    pub draws: usize,

    /// Number of losses
    pub losses: usize,

    /// Win rate
    pub win_rate: f64,

    /// Draw rate
    pub draw_rate: f64,

    /// Loss rate
    pub loss_rate: f64,

    /// Per-window breakdown, in episode order
    pub windows: Vec<WindowStats>,
}

impl TrainingResult {
    /// Create a new training result
    pub fn new(wins: usize, draws: usize, losses: usize, windows: Vec<WindowStats>) -> Self {
        let total_episodes = wins + draws + losses;
        Self {
            total_episodes,
            wins,
            draws,
            losses,
            win_rate: rate(wins, total_episodes),
            draw_rate: rate(draws, total_episodes),
            loss_rate: rate(losses, total_episodes),
            windows,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Training pipeline for a single learner against an opponent
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
    rng: StdRng,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            config,
            observers: Vec::new(),
            rng,
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train against the heuristic opponent at the given ability level.
    pub fn teach(&mut self, learner: &mut dyn Learner, ability_level: f64) -> Result<TrainingResult> {
        let mark = self.config.learner_mark.opponent();
        let mut heuristic = match self.config.seed {
            Some(seed) => HeuristicOpponent::new(mark, ability_level).with_seed(seed.wrapping_add(1)),
            None => HeuristicOpponent::new(mark, ability_level),
        };
        self.run(learner, Opponent::Policy(&mut heuristic))
    }

    /// Train with the learner choosing both sides' moves.
    pub fn self_play(&mut self, learner: &mut dyn Learner) -> Result<TrainingResult> {
        self.run(learner, Opponent::Mirror)
    }

    /// Run training with the given learner and opponent
    pub fn run(&mut self, learner: &mut dyn Learner, opponent: Opponent<'_>) -> Result<TrainingResult> {
        self.play_episodes(learner, opponent, true)
    }

    /// Play the configured number of episodes without issuing any update.
    ///
    /// The learner still explores at its current rate; set it to zero first
    /// to measure the greedy policy.
    pub fn evaluate(
        &mut self,
        learner: &mut dyn Learner,
        opponent: Opponent<'_>,
    ) -> Result<TrainingResult> {
        self.play_episodes(learner, opponent, false)
    }

    fn play_episodes(
        &mut self,
        learner: &mut dyn Learner,
        mut opponent: Opponent<'_>,
        learn: bool,
    ) -> Result<TrainingResult> {
        let Self {
            config,
            observers,
            rng,
        } = self;
        let episode_config = EpisodeConfig {
            learner_mark: config.learner_mark,
            first_mover: config.first_mover,
            learn,
        };
        let window_size = config.window_size.max(1);

        log::info!(
            "{} {} for {} episodes against {}",
            if learn { "training" } else { "evaluating" },
            learner.name(),
            config.episodes,
            opponent.name()
        );

        // Notify observers of training start
        for observer in observers.iter_mut() {
            observer.on_training_start(config.episodes)?;
        }

        let mut windows: Vec<WindowStats> = Vec::new();
        let (mut wins, mut draws, mut losses) = (0, 0, 0);

        for episode_num in 0..config.episodes {
            for observer in observers.iter_mut() {
                observer.on_episode_start(episode_num)?;
            }

            let summary = {
                let mut notify_move =
                    |ply: usize, state: &BoardState, mark: Mark, action: Action| -> Result<()> {
                        for observer in observers.iter_mut() {
                            observer.on_move(episode_num, ply, state, mark, action)?;
                        }
                        Ok(())
                    };
                Episode::new(episode_config).play(
                    learner,
                    opponent.reborrow(),
                    rng,
                    &mut notify_move,
                )?
            };

            match summary.outcome {
                Outcome::Win => wins += 1,
                Outcome::Draw => draws += 1,
                Outcome::Loss => losses += 1,
            }
            if episode_num % window_size == 0 {
                windows.push(WindowStats {
                    start_episode: episode_num,
                    ..WindowStats::default()
                });
            }
            if let Some(window) = windows.last_mut() {
                window.record(summary.outcome);
            }

            notify_episode_end(observers, episode_num, &summary)?;
        }

        // Notify observers of training end
        for observer in observers.iter_mut() {
            observer.on_training_end()?;
        }

        Ok(TrainingResult::new(wins, draws, losses, windows))
    }
}

fn notify_episode_end(
    observers: &mut [Box<dyn Observer>],
    episode_num: usize,
    summary: &EpisodeSummary,
) -> Result<()> {
    for observer in observers {
        observer.on_episode_end(episode_num, summary)?;
    }
    Ok(())
}
