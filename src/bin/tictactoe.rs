//! Tic-Tac-Toe reinforcement learning CLI
//!
//! - Train Q-learning or SARSA agents against the heuristic opponent or
//!   themselves, or compute Value/Policy Iteration policies
//! - Play against a saved agent on the terminal
//! - Export an agent's cumulative reward curve

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tictactoe")]
#[command(version, about = "Reinforcement learning agents for Tic-Tac-Toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent and save it
    Train(tictactoe_rl::cli::commands::train::TrainArgs),

    /// Play against an agent
    Play(tictactoe_rl::cli::commands::play::PlayArgs),

    /// Export the cumulative reward curve of a saved agent
    Rewards(tictactoe_rl::cli::commands::rewards::RewardsArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => tictactoe_rl::cli::commands::train::execute(args),
        Commands::Play(args) => tictactoe_rl::cli::commands::play::execute(args),
        Commands::Rewards(args) => tictactoe_rl::cli::commands::rewards::execute(args),
    }
}
