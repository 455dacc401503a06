//! Reconciliation engine - applies rename actions to a document

use serde::{Deserialize, Serialize};

use crate::document::{Document, NodeId};

use super::action::RenameAction;
use super::locate::{DocumentSchema, LabelIndex, LocateError, locate_label};
use super::outcome::{Outcome, Resolution, ResultCounters};

/// How the engine finds label elements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocateStrategy {
    /// Scan the identifier elements again for every action
    Scan,
    /// Build an identifier index once per pass
    #[default]
    Indexed,
}

/// Result of one action within a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    /// Position of the action in the input (0-based)
    pub index: usize,
    pub resolution: Resolution,
}

impl ActionResult {
    pub fn outcome(&self) -> Option<Outcome> {
        self.resolution.outcome()
    }
}

/// Everything a reconciliation pass produced besides the mutated document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationReport {
    pub results: Vec<ActionResult>,
    pub counters: ResultCounters,
}

impl ReconciliationReport {
    /// Per-action outcomes in input order, `None` for no-ops
    pub fn outcomes(&self) -> Vec<Option<Outcome>> {
        self.results.iter().map(ActionResult::outcome).collect()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn noop_count(&self) -> usize {
        self.counters.noop_count(self.total())
    }
}

/// Applies rename actions to a document and classifies each one
pub struct ReconciliationEngine<'a> {
    schema: &'a DocumentSchema,
    strategy: LocateStrategy,
}

impl<'a> ReconciliationEngine<'a> {
    pub fn new(schema: &'a DocumentSchema) -> Self {
        Self {
            schema,
            strategy: LocateStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: LocateStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Run every action against `doc`, in order
    ///
    /// Actions are independent: each one is committed or skipped on its own and
    /// nothing is rolled back. Only label text is ever modified.
    pub fn reconcile(&self, doc: &mut Document, actions: &[RenameAction]) -> ReconciliationReport {
        let mut index = match self.strategy {
            LocateStrategy::Indexed => Some(self.build_index(doc)),
            LocateStrategy::Scan => None,
        };

        let mut report = ReconciliationReport {
            results: Vec::with_capacity(actions.len()),
            counters: ResultCounters::default(),
        };

        for (position, action) in actions.iter().enumerate() {
            let located = match &index {
                Some(index) => index.get(&action.identifier),
                None => locate_label(doc, self.schema, &action.identifier),
            };

            let resolution = match located {
                Err(LocateError::IdentifierNotFound) => Resolution::IdentifierNotFound,
                Err(LocateError::LabelNotFound) => Resolution::LabelNotFound,
                Ok(label) => {
                    let current = doc.text_content(label);
                    if current == action.expected_old_value {
                        let stale = index.is_some() && self.touches_identifiers(doc, label);
                        doc.set_text_content(label, &action.new_value);
                        if stale {
                            log::debug!(
                                "Label of '{}' holds identifier text, reindexing",
                                action.identifier
                            );
                            index = Some(self.build_index(doc));
                        }
                        Resolution::Renamed
                    } else if current == action.new_value {
                        Resolution::AlreadyApplied
                    } else {
                        Resolution::ValueMismatch { current }
                    }
                }
            };

            log::debug!(
                "Action {} ({}: '{}' -> '{}'): {}",
                position + 1,
                action.identifier,
                action.expected_old_value,
                action.new_value,
                resolution.describe()
            );

            if let Some(outcome) = resolution.outcome() {
                report.counters.record(outcome);
            }
            report.results.push(ActionResult {
                index: position,
                resolution,
            });
        }

        log::info!(
            "Reconciled {} actions: {} renamed, {} warnings, {} failures, {} already applied",
            report.total(),
            report.counters.success,
            report.counters.warning,
            report.counters.failure,
            report.noop_count()
        );

        report
    }

    fn build_index(&self, doc: &Document) -> LabelIndex {
        let index = LabelIndex::build(doc, self.schema);
        if index.is_empty() {
            log::warn!("No <{}> elements found in document", self.schema.identifier_tag);
        } else {
            log::debug!(
                "Indexed {} identifiers ({} duplicates)",
                index.len(),
                index.duplicate_count()
            );
        }
        index
    }

    /// Whether rewriting `label` can change an identifier's text or detach one
    ///
    /// True when the label is itself an identifier element, sits inside one or
    /// contains one. Only then does the index need rebuilding.
    fn touches_identifiers(&self, doc: &Document, label: NodeId) -> bool {
        let tag = self.schema.identifier_tag.as_str();
        doc.is_element_named(label, tag)
            || doc.ancestors(label).any(|n| doc.is_element_named(n, tag))
            || doc.descendants_of(label).any(|n| doc.is_element_named(n, tag))
    }
}

/// Run a pass with the default schema and strategy
#[cfg(test)]
pub fn reconcile(doc: &mut Document, actions: &[RenameAction]) -> ReconciliationReport {
    let schema = DocumentSchema::default();
    ReconciliationEngine::new(&schema).reconcile(doc, actions)
}
