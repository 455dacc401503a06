// Rename reconciliation
//
// Pure logic: turns rule rows into actions, locates labels in a document and
// applies the actions, classifying each one. No file or terminal I/O here.

pub mod action;
pub mod engine;
pub mod locate;
pub mod outcome;

pub use action::{RenameAction, ShortRowPolicy, parse_actions};
pub use engine::{LocateStrategy, ReconciliationEngine, ReconciliationReport};
#[cfg(test)]
pub use engine::reconcile;
pub use locate::DocumentSchema;
pub use outcome::{Outcome, Resolution, ResultCounters};
