//! `relabel apply` - run the rename rules against a document

pub mod handler;

use clap::Args;
use std::path::PathBuf;

use super::super::{OutputFormat, StrategyArg};

pub use handler::handle_apply_command;

#[derive(Args, Debug)]
pub struct ApplyCommands {
    /// XML document to rename
    pub document: PathBuf,

    /// CSV rules file (identifier, old name, new name)
    pub rules: PathBuf,

    /// Where to write the renamed document (default: prefixed copy next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Run the pass and report, but don't write anything
    #[arg(long)]
    pub dry_run: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Label lookup strategy (overrides the config file)
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

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
