//! CLI frontend for the Holo assistant demo.

mod commands;
mod logging;
mod tui;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "holo",
    about = "Holo: a scripted holographic assistant playback",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every command that plays a script.
#[derive(Args, Debug, Clone)]
struct PlaybackArgs {
    /// JSON script file (default: the built-in demo script)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Milliseconds per revealed caption character
    #[arg(long, default_value = "25")]
    reveal_ms: u64,

    /// Pause after a fully revealed caption, in milliseconds
    #[arg(long, default_value = "300")]
    settle_ms: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the script in a full-screen terminal renderer
    Play {
        #[command(flatten)]
        playback: PlaybackArgs,

        /// Playback speed multiplier
        #[arg(long, default_value = "1.0")]
        speed: f64,

        /// RNG seed for particle placement
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Write logs to this file while the renderer owns the terminal
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Run the script headless in virtual time and report what happened
    Trace {
        #[command(flatten)]
        playback: PlaybackArgs,

        /// Number of full loops to play
        #[arg(short, long, default_value = "1")]
        loops: u64,

        /// Show the full event log
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the steps of a script with their durations
    Script {
        /// JSON script file (default: the built-in demo script)
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Print the script as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            playback,
            speed,
            seed,
            log_file,
        } => logging::init_file(log_file.as_deref()).and_then(|_guard| {
            commands::play::run(
                playback.script.as_deref(),
                playback.reveal_ms,
                playback.settle_ms,
                speed,
                seed,
            )
        }),
        Commands::Trace {
            playback,
            loops,
            verbose,
        } => {
            logging::init_stderr();
            commands::trace::run(
                playback.script.as_deref(),
                playback.reveal_ms,
                playback.settle_ms,
                loops,
                verbose,
            )
        }
        Commands::Script { script, json } => {
            logging::init_stderr();
            commands::script::run(script.as_deref(), json)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
