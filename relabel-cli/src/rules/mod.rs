//! Rename rules CSV reader
//!
//! Every line of the rules file is one action: `identifier,old name,new name`.
//! There is no header line unless configured otherwise.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::fs;
use std::path::Path;

use crate::rename::{RenameAction, ShortRowPolicy, parse_actions};

/// How the rules file is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulesFormat {
    pub delimiter: u8,
    pub has_headers: bool,
    pub short_rows: ShortRowPolicy,
}

impl Default for RulesFormat {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: false,
            short_rows: ShortRowPolicy::Fail,
        }
    }
}

/// Decode CSV text into rows of fields
///
/// Rows are allowed to have any number of fields; checking the shape is the job
/// of the action parser. Blank lines are skipped.
pub fn read_rows(content: &str, format: &RulesFormat) -> Result<Vec<Vec<String>>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = ReaderBuilder::new()
        .delimiter(format.delimiter)
        .has_headers(format.has_headers)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to decode CSV record {}", i + 1))?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(rows)
}

/// Read and parse a rules file into rename actions
pub fn load_actions(path: &Path, format: &RulesFormat) -> Result<Vec<RenameAction>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules file: {}", path.display()))?;

    let rows = read_rows(&content, format)
        .with_context(|| format!("Failed to decode rules file: {}", path.display()))?;

    let actions = parse_actions(&rows, format.short_rows)
        .with_context(|| format!("Invalid rules file: {}", path.display()))?;

    log::info!(
        "Loaded {} rename actions from {}",
        actions.len(),
        path.display()
    );
    Ok(actions)
}
