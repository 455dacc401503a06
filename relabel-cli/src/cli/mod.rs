//! Command line interface

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};

use crate::rename::LocateStrategy;
use commands::actions::ActionsCommands;
use commands::apply::ApplyCommands;
use commands::config::ConfigCommands;

#[derive(Parser, Debug)]
#[command(name = "relabel")]
#[command(version)]
#[command(about = "Rename libelle fields of an XML document from a CSV list of rules")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply the rename rules to a document and save the renamed copy
    Apply(ApplyCommands),
    /// List the actions loaded from a rules file
    Actions(ActionsCommands),
    /// Show the effective configuration
    Config(ConfigCommands),
}

/// Output format for reports
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human readable table with colored statuses
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Label lookup strategy
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyArg {
    /// Rescan the document for every action
    Scan,
    /// Index identifiers once per pass
    Indexed,
}

impl From<StrategyArg> for LocateStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Scan => LocateStrategy::Scan,
            StrategyArg::Indexed => LocateStrategy::Indexed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_apply_arguments() {
        let cli = Cli::try_parse_from([
            "relabel", "apply", "objets.xml", "regles.csv", "-o", "out.xml", "--dry-run",
            "--format", "json", "--strategy", "scan",
        ])
        .unwrap();

        match cli.command {
            Commands::Apply(args) => {
                assert_eq!(args.document.to_str(), Some("objets.xml"));
                assert_eq!(args.rules.to_str(), Some("regles.csv"));
                assert_eq!(args.output.as_deref().and_then(|p| p.to_str()), Some("out.xml"));
                assert!(args.dry_run);
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(args.strategy, Some(StrategyArg::Scan));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_apply_requires_both_files() {
        assert!(Cli::try_parse_from(["relabel", "apply", "objets.xml"]).is_err());
    }
}
