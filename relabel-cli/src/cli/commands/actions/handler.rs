//! Actions command handler

use anyhow::{Context, Result, bail};
use colored::*;

use super::ActionsCommands;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::report;
use crate::rules;

/// Handle the actions command: load the rules and list them
pub fn handle_actions_command(args: ActionsCommands, config: &Config) -> Result<()> {
    super::super::configure_colors(args.no_color);

    if !args.rules.exists() {
        bail!("Rules file does not exist: {}", args.rules.display());
    }

    let format = super::super::rules_format(
        config,
        args.delimiter,
        args.has_headers,
        args.skip_short_rows,
    )?;
    let actions = rules::load_actions(&args.rules, &format)?;

    match args.format {
        OutputFormat::Table => {
            println!(
                "{} {}",
                report::actions_loaded_label(actions.len()).cyan(),
                format!("({})", args.rules.display()).dimmed()
            );
            println!();
            print!("{}", report::render_actions(&actions));
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&actions).context("Failed to format JSON output")?
            );
        }
    }

    Ok(())
}
