//! `relabel config` - show the effective configuration

use anyhow::{Context, Result};
use clap::Args;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct ConfigCommands {
    /// Only print the path of the config file
    #[arg(long)]
    pub path: bool,
}

pub fn handle_config_command(args: ConfigCommands, config: &Config) -> Result<()> {
    if args.path {
        match Config::path() {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("Could not determine the config directory"),
        }
        return Ok(());
    }

    let text = toml::to_string_pretty(config).context("Failed to format configuration")?;
    print!("{}", text);
    Ok(())
}
