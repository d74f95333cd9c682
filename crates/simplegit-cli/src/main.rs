//! simplegit CLI - Command-line interface for simplegit.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// simplegit - a minimal content-addressable snapshot store
#[derive(Parser, Debug)]
#[command(name = "simplegit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a new repository
    Init {
        /// Path to initialize (default: current directory)
        #[arg(default_value = ".")]
        repo_path: String,
    },

    /// Stage files for the next commit
    Add {
        /// Files to stage, relative to the repository root
        #[arg(required = true)]
        file_path: Vec<String>,
    },

    /// Record the staged files as a new commit
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },

    /// Make the working directory match a commit
    Reset {
        /// Commit digest
        commit_hash: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("simplegit={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match std::env::current_dir() {
        Ok(cwd) => match cli.command {
            Commands::Init { repo_path } => commands::init(&cwd.join(repo_path)),
            Commands::Add { file_path } => commands::add(&cwd, &file_path),
            Commands::Commit { message } => commands::commit(&cwd, &message),
            Commands::Reset { commit_hash } => commands::reset(&cwd, &commit_hash),
        },
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(status) => println!("{status}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
