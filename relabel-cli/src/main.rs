//! relabel - bulk rename of `libelle` fields in XML documents
//!
//! Rules come from a CSV file with one `identifier,old name,new name` line per
//! record. Each rule is applied only when the record still carries the expected
//! old name; records already renamed are left alone and anything else is reported.

mod cli;
mod config;
mod document;
mod rename;
mod report;
mod rules;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use config::Config;

fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        config.log.level.clone()
    };

    env_logger::Builder::new()
        .parse_filters(&filter)
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load()?;
    init_logging(&config, cli.verbose);

    log::debug!("Effective configuration: {:?}", config);

    match cli.command {
        Commands::Apply(args) => cli::commands::apply::handle_apply_command(args, &config),
        Commands::Actions(args) => cli::commands::actions::handle_actions_command(args, &config),
        Commands::Config(args) => cli::commands::config::handle_config_command(args, &config),
    }
}
