//! Apply command handler

use anyhow::{Context, Result, bail};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::ApplyCommands;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::document::{Document, verify_well_formed};
use crate::rename::{ReconciliationEngine, ReconciliationReport, RenameAction};
use crate::report::{self, ReportContext};
use crate::rules;

/// What an apply run produced
#[derive(Debug)]
pub struct ApplyResult {
    pub actions: Vec<RenameAction>,
    pub report: ReconciliationReport,
    /// Path the renamed document was written to, `None` on dry runs
    pub output_path: Option<PathBuf>,
}

/// Default output path: `<prefix><file name>` next to the input document
pub fn default_output_path(document: &Path, prefix: &str) -> Result<PathBuf> {
    let file_name = document
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Document path has no file name: {}", document.display()))?;

    let renamed = format!("{}{}", prefix, file_name);
    Ok(match document.parent() {
        Some(parent) => parent.join(renamed),
        None => PathBuf::from(renamed),
    })
}

/// Load everything, reconcile and write the renamed document
///
/// Any problem with the inputs aborts before the document is touched; once the
/// pass starts, per-action problems only show up in the report.
pub fn run_apply(args: &ApplyCommands, config: &Config) -> Result<ApplyResult> {
    if !args.document.exists() {
        bail!("Document does not exist: {}", args.document.display());
    }
    if !args.rules.exists() {
        bail!("Rules file does not exist: {}", args.rules.display());
    }

    // Rules first: a broken rule set must stop us before anything else
    let format = super::super::rules_format(
        config,
        args.delimiter,
        args.has_headers,
        args.skip_short_rows,
    )?;
    let actions = rules::load_actions(&args.rules, &format)?;

    let content = fs::read_to_string(&args.document)
        .with_context(|| format!("Failed to read document: {}", args.document.display()))?;
    let mut document = Document::parse(&content)
        .with_context(|| format!("Failed to parse document: {}", args.document.display()))?;

    let strategy = args
        .strategy
        .map(Into::into)
        .unwrap_or(config.engine.strategy);

    let start = Instant::now();
    let report = ReconciliationEngine::new(&config.document)
        .with_strategy(strategy)
        .reconcile(&mut document, &actions);
    log::debug!(
        "Reconciliation took {:.2}ms ({:?} strategy)",
        start.elapsed().as_secs_f64() * 1000.0,
        strategy
    );

    if args.dry_run {
        log::info!("Dry run, renamed document not written");
        return Ok(ApplyResult {
            actions,
            report,
            output_path: None,
        });
    }

    let output_path = match &args.output {
        Some(path) => path.clone(),
        None => default_output_path(&args.document, &config.output.prefix)?,
    };
    if output_path == args.document {
        log::warn!("Overwriting input document {}", output_path.display());
    }

    let xml = document
        .to_xml_string()
        .context("Failed to serialize renamed document")?;

    if config.output.verify {
        let elements = verify_well_formed(&xml)?;
        if elements != document.element_count() {
            bail!(
                "Renamed document has {} elements, expected {}",
                elements,
                document.element_count()
            );
        }
    }

    fs::write(&output_path, xml)
        .with_context(|| format!("Failed to write renamed document: {}", output_path.display()))?;
    log::info!("Renamed document written to {}", output_path.display());

    Ok(ApplyResult {
        actions,
        report,
        output_path: Some(output_path),
    })
}

/// Handle the apply command
pub fn handle_apply_command(args: ApplyCommands, config: &Config) -> Result<()> {
    super::super::configure_colors(args.no_color);

    let result = run_apply(&args, config)?;

    match args.format {
        OutputFormat::Table => {
            println!("{}", report::actions_loaded_label(result.actions.len()).cyan());
            println!();
            print!("{}", report::render_results(&result.actions, &result.report));
            println!();

            let badges = report::render_badges(&result.report.counters, result.report.noop_count());
            if !badges.is_empty() {
                println!("{}", badges);
            }

            match &result.output_path {
                Some(path) => println!(
                    "Saved to: {}",
                    path.display().to_string().bright_green()
                ),
                None => println!("{}", "Dry run: nothing written".dimmed()),
            }
        }
        OutputFormat::Json => {
            let context = ReportContext {
                generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                document: args.document.display().to_string(),
                rules: args.rules.display().to_string(),
                output: result.output_path.as_ref().map(|p| p.display().to_string()),
            };
            let json = report::build_report(context, &result.actions, &result.report);
            println!(
                "{}",
                serde_json::to_string_pretty(&json).context("Failed to format JSON report")?
            );
        }
    }

    Ok(())
}
