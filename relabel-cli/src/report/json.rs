//! Machine-readable report of a reconciliation pass

use serde::Serialize;

use crate::rename::{Outcome, ReconciliationReport, RenameAction, Resolution, ResultCounters};

/// Files involved in a pass
#[derive(Debug, Clone, Serialize)]
pub struct ReportContext {
    pub generated_at: String,
    pub document: String,
    pub rules: String,
    /// `None` on dry runs
    pub output: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    #[serde(flatten)]
    pub context: ReportContext,
    pub total: usize,
    pub counters: ResultCounters,
    pub noop: usize,
    pub actions: Vec<JsonAction<'a>>,
}

#[derive(Debug, Serialize)]
pub struct JsonAction<'a> {
    /// 1-based, as shown in the table
    pub index: usize,
    #[serde(flatten)]
    pub action: &'a RenameAction,
    pub outcome: Option<Outcome>,
    pub resolution: &'a Resolution,
}

pub fn build_report<'a>(
    context: ReportContext,
    actions: &'a [RenameAction],
    report: &'a ReconciliationReport,
) -> JsonReport<'a> {
    let entries = report
        .results
        .iter()
        .filter_map(|result| {
            actions.get(result.index).map(|action| JsonAction {
                index: result.index + 1,
                action,
                outcome: result.outcome(),
                resolution: &result.resolution,
            })
        })
        .collect();

    JsonReport {
        context,
        total: report.total(),
        counters: report.counters,
        noop: report.noop_count(),
        actions: entries,
    }
}
