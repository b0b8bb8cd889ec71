//! Demo command - manage demo mode

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::ensure_userstate_dir;
use userstate_core::adapters::demo::generate_demo_users;
use userstate_core::config::Config;

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Enable demo mode
    #[command(name = "on")]
    On,
    /// Disable demo mode
    #[command(name = "off")]
    Off,
    /// Show demo mode status
    Status,
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let userstate_dir = ensure_userstate_dir()?;

    match command {
        Some(DemoCommands::On) => {
            Config::save_demo_mode(&userstate_dir, true)?;
            println!("{}", "Demo mode enabled".green());
            let emails: Vec<String> = generate_demo_users().into_iter().map(|u| u.email).collect();
            println!("Sample users: {}", emails.join(", "));
            Ok(())
        }
        Some(DemoCommands::Off) => {
            Config::save_demo_mode(&userstate_dir, false)?;
            println!("{}", "Demo mode disabled".yellow());
            Ok(())
        }
        Some(DemoCommands::Status) | None => {
            if Config::load(&userstate_dir)?.demo_mode {
                println!("Demo mode is {}", "ON".green());
            } else {
                println!("Demo mode is {}", "OFF".yellow());
            }
            Ok(())
        }
    }
}
