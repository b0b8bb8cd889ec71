//! userstate CLI - drive a user session from the terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{config, demo, fetch, logs, register};

/// us - look up, register and inspect session users
#[derive(Parser)]
#[command(name = "us", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a user by email and show the resulting session state
    Fetch {
        /// Email address to look up (exact match)
        email: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Submit a new user to the registration endpoint
    Register(register::RegisterArgs),

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// Show the effective configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage demo mode (offline directory with sample users)
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Fetch { email, json } => fetch::run(&email, json).await,
        Commands::Register(args) => register::run(args).await,
        Commands::Logs { command } => logs::run(command),
        Commands::Config { json } => config::run(json),
        Commands::Demo { command } => demo::run(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "us", "register", "--name", "Ann", "--username", "ann", "--email", "ann@example.com",
            "--lat", "-37.3159", "--lng", "81.1496",
        ])
        .unwrap();

        match cli.command {
            Commands::Register(args) => {
                assert_eq!(args.lat, -37.3159);
                assert_eq!(args.lng, 81.1496);
                assert_eq!(args.city, "");
                assert!(!args.json);
            }
            _ => panic!("expected register"),
        }
    }

    #[test]
    fn test_fetch_requires_email() {
        assert!(Cli::try_parse_from(["us", "fetch"]).is_err());
        assert!(Cli::try_parse_from(["us", "fetch", "ann@example.com", "--json"]).is_ok());
    }
}
