//! Rewards command - export a saved agent's cumulative reward curve

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::App,
    cli::output::{format_number, print_kv},
    export::{cumulative_rewards, write_reward_curve, write_reward_curve_to_path},
    ports::Learner,
};

#[derive(Parser, Debug)]
#[command(about = "Export the cumulative reward curve of a saved agent")]
pub struct RewardsArgs {
    /// Path of the saved agent
    #[arg(long, short = 'p')]
    pub path: PathBuf,

    /// CSV output file (stdout when omitted)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn execute(args: RewardsArgs) -> Result<()> {
    let agent = App::new()
        .load_agent(&args.path)
        .with_context(|| format!("failed to load agent from {}", args.path.display()))?;
    let trace = agent.reward_trace();

    match &args.output {
        Some(output) => {
            let rows = write_reward_curve_to_path(trace, output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            let total = cumulative_rewards(trace).last().copied().unwrap_or(0.0);
            print_kv("Reward updates", &format_number(rows));
            print_kv("Cumulative reward", &format!("{total:.1}"));
            print_kv("Written to", &output.display().to_string());
        }
        None => {
            write_reward_curve(trace, io::stdout().lock())?;
        }
    }
    Ok(())
}
