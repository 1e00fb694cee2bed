//! Train command - teach an agent against the heuristic opponent or itself

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use super::AgentArgs;
use crate::{
    app::App,
    cli::{
        human::ask_yes_no,
        output::{format_number, print_kv, print_section, print_training_result},
    },
    heuristic::DEFAULT_ABILITY_LEVEL,
    pipeline::{FirstMover, LoggingObserver, ProgressObserver, TrainingConfig, TrainingPipeline},
    ports::{Learner, Policy},
    tictactoe::Mark,
};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingMethod {
    /// Play against the rule-based heuristic opponent
    Heuristic,
    /// The agent also chooses the opponent's moves
    SelfPlay,
}

#[derive(Parser, Debug)]
#[command(about = "Train an agent and save it")]
pub struct TrainArgs {
    #[command(flatten)]
    pub agent: AgentArgs,

    /// Number of training episodes
    #[arg(long, short = 't', default_value_t = 10_000)]
    pub episodes: usize,

    /// Who the agent trains against
    #[arg(long, value_enum, default_value_t = TrainingMethod::Heuristic)]
    pub method: TrainingMethod,

    /// Probability that the heuristic opponent follows its rules
    #[arg(long, default_value_t = DEFAULT_ABILITY_LEVEL)]
    pub ability: f64,

    /// Episodes per window in the summary
    #[arg(long, default_value_t = 1000)]
    pub window: usize,

    /// Overwrite an existing agent file without asking
    #[arg(long)]
    pub force: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Write the training result as JSON
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let app = App::new();
    let kind = args.agent.agent;
    let path = args.agent.path();

    if !args.agent.load && !args.force && app.agent_exists(&path) {
        println!("An agent is already saved at {}.", path.display());
        let overwrite = ask_yes_no(
            &mut io::stdin().lock(),
            &mut io::stdout(),
            "Are you sure you want to overwrite?",
        )?;
        if !overwrite {
            println!("OK. Quitting.");
            return Ok(());
        }
    }

    print_section(&format!("Training {kind} agent"));
    let mut agent = app
        .load_or_create(kind, &path, args.agent.load, args.agent.config())
        .with_context(|| format!("failed to prepare agent at {}", path.display()))?;

    if kind.is_planner() {
        println!("{} policy computed; planners need no episodes.", agent.name());
    } else {
        let config = TrainingConfig {
            episodes: args.episodes,
            seed: args.agent.seed,
            learner_mark: Mark::O,
            first_mover: FirstMover::Random,
            window_size: args.window,
        };
        let mut pipeline =
            TrainingPipeline::new(config).with_observer(Box::new(LoggingObserver::default()));
        if !args.no_progress {
            pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
        }

        let result = match args.method {
            TrainingMethod::Heuristic => pipeline.teach(&mut agent, args.ability),
            TrainingMethod::SelfPlay => pipeline.self_play(&mut agent),
        }
        .context("training failed")?;

        print_training_result(&result);
        print_kv("Reward updates", &format_number(agent.reward_trace().len()));
        if let Some(summary_path) = &args.summary {
            result
                .save(summary_path)
                .with_context(|| format!("failed to write {}", summary_path.display()))?;
            print_kv("Summary", &summary_path.display().to_string());
        }
    }

    app.save_agent(&agent, &path)
        .with_context(|| format!("failed to save agent to {}", path.display()))?;
    print_kv("Saved to", &path.display().to_string());
    Ok(())
}
