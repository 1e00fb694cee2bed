//! Episode driver
//!
//! Plays one game between a learner and an opponent, feeding the learner's
//! own transitions back to it. Only the learner's moves are credited: an
//! update for the learner's previous move is issued once the opponent has
//! replied and the learner has picked its next action, and one final
//! terminal update carries the outcome.

use rand::{Rng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{Learner, Policy, Transition},
    tictactoe::{Action, BoardState, Mark, Outcome},
};

/// Lifecycle of a single episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodePhase {
    AwaitingFirstMove,
    InProgress,
    Terminal,
}

/// Which side opens the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstMover {
    Learner,
    Opponent,
    /// Fair coin flip per episode.
    #[default]
    Random,
}

/// The side the learner plays against.
pub enum Opponent<'a> {
    /// Any other policy: heuristic, human, or a separate agent instance.
    Policy(&'a mut dyn Policy),
    /// The learner picks the other side's moves as well. Those moves are
    /// never used for updates.
    Mirror,
}

impl Opponent<'_> {
    /// Shorter-lived copy usable for one episode.
    pub fn reborrow(&mut self) -> Opponent<'_> {
        match self {
            Opponent::Policy(policy) => Opponent::Policy(&mut **policy),
            Opponent::Mirror => Opponent::Mirror,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Opponent::Policy(policy) => policy.name(),
            Opponent::Mirror => "Self",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeConfig {
    pub learner_mark: Mark,
    pub first_mover: FirstMover,
    /// When false the learner only acts; no updates are issued.
    pub learn: bool,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            learner_mark: Mark::O,
            first_mover: FirstMover::Random,
            learn: true,
        }
    }
}

/// What happened in a finished episode, from the learner's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub learner_mark: Mark,
    pub learner_moved_first: bool,
    pub winner: Option<Mark>,
    pub outcome: Outcome,
    pub moves: Vec<(Mark, Action)>,
    pub final_state: BoardState,
}

impl EpisodeSummary {
    /// Terminal reward credited to the learner (+1, 0 or -1).
    pub fn reward(&self) -> f64 {
        self.outcome.value()
    }

    pub fn plies(&self) -> usize {
        self.moves.len()
    }
}

/// Callback invoked after every applied move with
/// `(ply, board before the move, mover, action)`.
pub type MoveHook<'h> = dyn FnMut(usize, &BoardState, Mark, Action) -> Result<()> + 'h;

/// A single game in progress.
#[derive(Debug, Clone)]
pub struct Episode {
    config: EpisodeConfig,
    board: BoardState,
    phase: EpisodePhase,
    moves: Vec<(Mark, Action)>,
}

impl Episode {
    pub fn new(config: EpisodeConfig) -> Self {
        Self {
            config,
            board: BoardState::new(),
            phase: EpisodePhase::AwaitingFirstMove,
            moves: Vec::new(),
        }
    }

    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Play the episode to the end.
    ///
    /// # Errors
    ///
    /// Fails if the episode was already played, if an agent proposes an
    /// illegal move, or if the learner rejects an update.
    pub fn play(
        &mut self,
        learner: &mut dyn Learner,
        mut opponent: Opponent<'_>,
        rng: &mut StdRng,
        on_move: &mut MoveHook<'_>,
    ) -> Result<EpisodeSummary> {
        if self.phase != EpisodePhase::AwaitingFirstMove {
            return Err(Error::EpisodeAlreadyPlayed);
        }

        let learner_mark = self.config.learner_mark;
        let learner_first = match self.config.first_mover {
            FirstMover::Learner => true,
            FirstMover::Opponent => false,
            FirstMover::Random => rng.random_bool(0.5),
        };
        log::trace!(
            "episode start: learner {} vs {}, learner first: {learner_first}",
            learner.name(),
            opponent.name()
        );

        if !learner_first {
            self.opponent_move(learner, &mut opponent, on_move)?;
        }

        let mut prev_state = self.board;
        let mut prev_action = learner.select_action(&prev_state)?;

        let outcome = loop {
            self.apply(prev_action, learner_mark, on_move)?;
            if let Some(outcome) = self.board.terminal_reward(learner_mark) {
                break outcome;
            }

            self.opponent_move(learner, &mut opponent, on_move)?;
            if let Some(outcome) = self.board.terminal_reward(learner_mark) {
                break outcome;
            }

            let new_state = self.board;
            let new_action = learner.select_action(&new_state)?;
            if self.config.learn {
                learner.update(&Transition::step(
                    prev_state,
                    prev_action,
                    0.0,
                    new_state,
                    new_action,
                ))?;
            }
            prev_state = new_state;
            prev_action = new_action;
        };

        if self.config.learn {
            learner.update(&Transition::terminal(
                prev_state,
                prev_action,
                outcome.value(),
            ))?;
        }
        self.phase = EpisodePhase::Terminal;

        Ok(EpisodeSummary {
            learner_mark,
            learner_moved_first: learner_first,
            winner: self.board.winner(),
            outcome,
            moves: self.moves.clone(),
            final_state: self.board,
        })
    }

    fn apply(&mut self, action: Action, mark: Mark, on_move: &mut MoveHook<'_>) -> Result<()> {
        let before = self.board;
        self.board = before.apply(action, mark)?;
        self.moves.push((mark, action));
        self.phase = EpisodePhase::InProgress;
        on_move(self.moves.len() - 1, &before, mark, action)
    }

    fn opponent_move(
        &mut self,
        learner: &mut dyn Learner,
        opponent: &mut Opponent<'_>,
        on_move: &mut MoveHook<'_>,
    ) -> Result<()> {
        let mark = self.config.learner_mark.opponent();
        loop {
            let (action, retries) = match opponent {
                Opponent::Policy(policy) => {
                    (policy.select_action(&self.board)?, policy.retries_illegal_moves())
                }
                Opponent::Mirror => (learner.select_action(&self.board)?, false),
            };
            match self.apply(action, mark, on_move) {
                Err(Error::IllegalMove { reason, .. }) if retries => {
                    log::debug!("rejected move {action} for {mark}: {reason}");
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::{heuristic::HeuristicOpponent, q_learning::QLearningAgent};

    /// Plays a fixed list of cells in order, occupied or not.
    struct Scripted {
        moves: Vec<Action>,
        retries: bool,
    }

    impl Policy for Scripted {
        fn select_action(&mut self, _state: &BoardState) -> Result<Action> {
            Ok(self.moves.remove(0))
        }

        fn name(&self) -> &str {
            "Scripted"
        }

        fn retries_illegal_moves(&self) -> bool {
            self.retries
        }
    }

    fn no_hook() -> impl FnMut(usize, &BoardState, Mark, Action) -> Result<()> {
        |_, _, _, _| Ok(())
    }

    #[test]
    fn test_episode_reaches_terminal_and_credits_learner() {
        let mut learner = QLearningAgent::new(0.5, 0.9, 0.1, 0.0).with_seed(1);
        let mut opponent = HeuristicOpponent::new(Mark::X, 1.0).with_seed(2);
        let mut rng = StdRng::seed_from_u64(3);
        let mut episode = Episode::new(EpisodeConfig::default());
        assert_eq!(episode.phase(), EpisodePhase::AwaitingFirstMove);

        let summary = episode
            .play(
                &mut learner,
                Opponent::Policy(&mut opponent),
                &mut rng,
                &mut no_hook(),
            )
            .unwrap();

        assert_eq!(episode.phase(), EpisodePhase::Terminal);
        assert!(summary.final_state.is_terminal());
        let learner_moves = summary
            .moves
            .iter()
            .filter(|(mark, _)| *mark == Mark::O)
            .count();
        // one update per learner move
        assert_eq!(learner.reward_trace().len(), learner_moves);
        assert_eq!(learner.reward_trace().last(), Some(&summary.reward()));
        assert!(learner.reward_trace()[..learner_moves - 1].iter().all(|&r| r == 0.0));
    }

    #[test]
    fn test_human_opponent_is_reprompted_after_illegal_move() {
        let mut learner = QLearningAgent::new(0.5, 0.9, 0.0, 0.0).with_seed(5);
        let cells = [(0, 0), (0, 0), (1, 1), (2, 2), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)];
        let mut human = Scripted {
            moves: cells.iter().map(|&(r, c)| Action::new(r, c).unwrap()).collect(),
            retries: true,
        };
        let mut rng = StdRng::seed_from_u64(0);
        let config = EpisodeConfig {
            first_mover: FirstMover::Opponent,
            ..EpisodeConfig::default()
        };

        let mut hook_calls = 0;
        let mut hook = |_: usize, _: &BoardState, _: Mark, _: Action| -> Result<()> {
            hook_calls += 1;
            Ok(())
        };
        let summary = Episode::new(config)
            .play(
                &mut learner,
                Opponent::Policy(&mut human),
                &mut rng,
                &mut hook,
            )
            .unwrap();

        assert!(!summary.learner_moved_first);
        assert_eq!(summary.moves[0], (Mark::X, Action::new(0, 0).unwrap()));
        assert_eq!(hook_calls, summary.plies());
    }

    #[test]
    fn test_agent_illegal_move_is_an_error() {
        let mut learner = QLearningAgent::new(0.5, 0.9, 0.0, 0.0).with_seed(5);
        let center = Action::new(1, 1).unwrap();
        let mut bad = Scripted {
            moves: vec![center, center, center, center, center],
            retries: false,
        };
        let mut rng = StdRng::seed_from_u64(0);
        let config = EpisodeConfig {
            first_mover: FirstMover::Opponent,
            ..EpisodeConfig::default()
        };

        let result = Episode::new(config).play(
            &mut learner,
            Opponent::Policy(&mut bad),
            &mut rng,
            &mut no_hook(),
        );
        assert!(matches!(result, Err(Error::IllegalMove { .. })));
    }

    #[test]
    fn test_mirror_only_updates_learner_side() {
        let mut learner = QLearningAgent::new(0.5, 0.9, 0.2, 0.0).with_seed(8);
        let mut rng = StdRng::seed_from_u64(8);
        let summary = Episode::new(EpisodeConfig::default())
            .play(&mut learner, Opponent::Mirror, &mut rng, &mut no_hook())
            .unwrap();

        let own_moves = summary
            .moves
            .iter()
            .filter(|(mark, _)| *mark == summary.learner_mark)
            .count();
        assert_eq!(learner.reward_trace().len(), own_moves);
    }

    #[test]
    fn test_episode_cannot_be_replayed() {
        let mut learner = QLearningAgent::new(0.5, 0.9, 0.1, 0.0).with_seed(1);
        let mut rng = StdRng::seed_from_u64(1);
        let mut episode = Episode::new(EpisodeConfig::default());
        episode
            .play(&mut learner, Opponent::Mirror, &mut rng, &mut no_hook())
            .unwrap();
        let err = episode
            .play(&mut learner, Opponent::Mirror, &mut rng, &mut no_hook())
            .unwrap_err();
        assert!(matches!(err, Error::EpisodeAlreadyPlayed));
        assert!(!err.is_configuration());
        assert!(!err.is_persistence());
    }
}
