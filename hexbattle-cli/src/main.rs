//! Hex Battle CLI - headless driver for the board engine
//!
//! Commands:
//! - check: Validate a board config
//! - init: Write a sample board config
//! - range: Show movement and attack ranges of one piece
//! - play: Replay a scripted list of actions

mod config_cmd;
mod play_cmd;
mod range_cmd;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "hexbattle")]
#[command(about = "Turn-based hex battle board engine")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a board config and print a summary
    Check(config_cmd::CheckArgs),
    /// Write a sample board config
    Init(config_cmd::InitArgs),
    /// Show movement and attack ranges for the piece on a tile
    Range(range_cmd::RangeArgs),
    /// Replay a JSON list of actions against a board config
    Play(play_cmd::PlayArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check(args) => config_cmd::check(args),
        Commands::Init(args) => config_cmd::init(args),
        Commands::Range(args) => range_cmd::run(args),
        Commands::Play(args) => play_cmd::run(args),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
