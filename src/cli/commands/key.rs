use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::config::Config;
use crate::credentials::{HostCredentials, KeyAvailability, KeyGate};

#[derive(Args)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: Option<KeyCommand>,
}

#[derive(Subcommand)]
pub enum KeyCommand {
    /// Check whether an API key is configured
    Status,

    /// Enter an API key and persist it to the config file
    Connect,
}

pub fn run(args: KeyArgs, config: &Config) -> Result<()> {
    match args.command {
        Some(KeyCommand::Status) | None => status(config),
        Some(KeyCommand::Connect) => connect(config),
    }
}

fn status(config: &Config) -> Result<()> {
    let mut gate = KeyGate::new(HostCredentials::detect(config));

    match gate.check_availability() {
        KeyAvailability::Available => {
            println!("{} API key is configured", "✓".green());
        }
        KeyAvailability::Unavailable => {
            println!("{} No API key configured", "✗".red());
            println!();
            println!("Set one with either:");
            println!("  export GEMINI_API_KEY=your-key-here");
            println!("  foto key connect");
        }
        KeyAvailability::Unknown => unreachable!("check always resolves"),
    }
    Ok(())
}

fn connect(config: &Config) -> Result<()> {
    let mut gate = KeyGate::new(HostCredentials::detect(config));

    if gate.check_availability() == KeyAvailability::Available {
        println!("{} API key is already configured", "✓".green());
        return Ok(());
    }

    match gate.request_selection() {
        KeyAvailability::Available => {
            println!("{} API key saved", "✓".green());
        }
        _ => {
            eprintln!("{}: No API key was selected", "Error".red().bold());
        }
    }
    Ok(())
}
