//! Demo mode command - toggle the in-memory demo service

use anyhow::Result;
use clap::Subcommand;

use citrus_core::Config;

use crate::output;

use super::get_citrus_dir;

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Enable demo mode
    On,
    /// Disable demo mode
    Off,
    /// Show whether demo mode is enabled
    Status,
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let citrus_dir = get_citrus_dir();
    std::fs::create_dir_all(&citrus_dir)?;
    let mut config = Config::load(&citrus_dir)?;

    match command.unwrap_or(DemoCommands::Status) {
        DemoCommands::On => {
            config.enable_demo_mode();
            config.save(&citrus_dir)?;
            output::success("Demo mode enabled");
        }
        DemoCommands::Off => {
            config.disable_demo_mode();
            config.save(&citrus_dir)?;
            output::success("Demo mode disabled");
        }
        DemoCommands::Status => {
            if config.demo_mode {
                output::info("Demo mode is ON");
            } else {
                output::info("Demo mode is OFF");
            }
        }
    }
    Ok(())
}
