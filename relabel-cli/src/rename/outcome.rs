//! Per-action outcomes and the counters aggregated over a pass

use serde::Serialize;

/// Classification of one rename action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Label found with the expected value and renamed
    Success,
    /// Label found but holding neither the expected old value nor the new one
    Warning,
    /// Identifier or label not found
    Failure,
}

impl Outcome {
    /// Status glyph shown in the actions table
    pub fn glyph(&self) -> &'static str {
        match self {
            Outcome::Success => "✓",
            Outcome::Warning => "!",
            Outcome::Failure => "✕",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::Warning => write!(f, "warning"),
            Outcome::Failure => write!(f, "failure"),
        }
    }
}

/// Why an action ended the way it did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    Renamed,
    /// The label already holds the new value; nothing to do
    AlreadyApplied,
    ValueMismatch { current: String },
    IdentifierNotFound,
    LabelNotFound,
}

impl Resolution {
    /// The outcome this resolution counts as, `None` for the already-applied no-op
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Resolution::Renamed => Some(Outcome::Success),
            Resolution::AlreadyApplied => None,
            Resolution::ValueMismatch { .. } => Some(Outcome::Warning),
            Resolution::IdentifierNotFound | Resolution::LabelNotFound => Some(Outcome::Failure),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Resolution::Renamed => "renamed".to_string(),
            Resolution::AlreadyApplied => "already renamed".to_string(),
            Resolution::ValueMismatch { current } => format!("current name is \"{}\"", current),
            Resolution::IdentifierNotFound => "identifier not found".to_string(),
            Resolution::LabelNotFound => "no libelle after identifier".to_string(),
        }
    }
}

/// Success, warning and failure counts of a pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultCounters {
    pub success: usize,
    pub warning: usize,
    pub failure: usize,
}

impl ResultCounters {
    #[cfg(test)]
    pub fn new(success: usize, warning: usize, failure: usize) -> Self {
        ResultCounters {
            success,
            warning,
            failure,
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Success => self.success += 1,
            Outcome::Warning => self.warning += 1,
            Outcome::Failure => self.failure += 1,
        }
    }

    /// Actions that produced an outcome
    pub fn total(&self) -> usize {
        self.success + self.warning + self.failure
    }

    /// Actions out of `total_actions` that were silent no-ops
    pub fn noop_count(&self, total_actions: usize) -> usize {
        total_actions.saturating_sub(self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_increments_one_counter() {
        let mut counters = ResultCounters::default();
        counters.record(Outcome::Success);
        counters.record(Outcome::Failure);
        counters.record(Outcome::Failure);

        assert_eq!(counters, ResultCounters::new(1, 0, 2));
        assert_eq!(counters.total(), 3);
        assert_eq!(counters.noop_count(5), 2);
    }

    #[test]
    fn test_resolution_outcomes() {
        assert_eq!(Resolution::Renamed.outcome(), Some(Outcome::Success));
        assert_eq!(Resolution::AlreadyApplied.outcome(), None);
        assert_eq!(
            Resolution::ValueMismatch { current: "Zeta".into() }.outcome(),
            Some(Outcome::Warning)
        );
        assert_eq!(Resolution::LabelNotFound.outcome(), Some(Outcome::Failure));
    }
}
