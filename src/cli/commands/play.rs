//! Play command - a human plays X against the agent on the terminal

use anyhow::{Context, Result};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};

use super::AgentArgs;
use crate::{
    app::App,
    cli::human::HumanPlayer,
    pipeline::{Episode, EpisodeConfig, FirstMover, Opponent},
    tictactoe::{Mark, Outcome},
};

#[derive(Parser, Debug)]
#[command(about = "Play against an agent")]
pub struct PlayArgs {
    #[command(flatten)]
    pub agent: AgentArgs,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let app = App::new();
    let kind = args.agent.agent;
    let path = args.agent.path();
    let mut agent = app
        .load_or_create(kind, &path, args.agent.load, args.agent.config())
        .with_context(|| format!("failed to prepare agent at {}", path.display()))?;
    let mut rng = match args.agent.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let mut human = HumanPlayer::stdio();
    human.write("Welcome to Tic-Tac-Toe. You are 'X' and the computer is 'O'.\n")?;
    let mut games_played = 0;

    loop {
        let human_first = human.ask_yes_no("Would you like to go first?")?;
        let config = EpisodeConfig {
            learner_mark: Mark::O,
            first_mover: if human_first {
                FirstMover::Opponent
            } else {
                FirstMover::Learner
            },
            learn: !kind.is_planner(),
        };

        let summary = Episode::new(config).play(
            &mut agent,
            Opponent::Policy(&mut human),
            &mut rng,
            &mut |_, _, _, _| Ok(()),
        )?;
        games_played += 1;

        let verdict = match summary.outcome {
            Outcome::Win => "The computer wins.",
            Outcome::Loss => "You win!",
            Outcome::Draw => "It's a draw.",
        };
        human.write(&format!("\n{}\n{verdict}\n", summary.final_state))?;

        if !kind.is_planner() {
            app.save_agent(&agent, &path)
                .with_context(|| format!("failed to save agent to {}", path.display()))?;
        }

        human.write(&format!("Games played: {games_played}\n"))?;
        if !human.ask_yes_no("Do you want to play again?")? {
            human.write("OK. Quitting.\n")?;
            return Ok(());
        }
    }
}
