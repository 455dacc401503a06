//! `relabel actions` - list the rules loaded from a CSV file

pub mod handler;

use clap::Args;
use std::path::PathBuf;

use super::super::OutputFormat;

pub use handler::handle_actions_command;

#[derive(Args, Debug)]
pub struct ActionsCommands {
    /// CSV rules file (identifier, old name, new name)
    pub rules: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Rules file delimiter (overrides the config file)
    #[arg(short, long)]
    pub delimiter: Option<char>,

    /// The rules file starts with a header line
    #[arg(long)]
    pub has_headers: bool,

    /// Skip rules with fewer than three fields instead of aborting
    #[arg(long)]
    pub skip_short_rows: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
