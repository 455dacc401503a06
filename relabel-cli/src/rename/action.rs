//! Rename actions decoded from rule rows

use serde::{Deserialize, Serialize};

/// One rename request: change the label of `identifier` from
/// `expected_old_value` to `new_value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameAction {
    pub identifier: String,
    pub expected_old_value: String,
    pub new_value: String,
}

impl RenameAction {
    pub fn new(
        identifier: impl Into<String>,
        expected_old_value: impl Into<String>,
        new_value: impl Into<String>,
    ) -> Self {
        RenameAction {
            identifier: identifier.into(),
            expected_old_value: expected_old_value.into(),
            new_value: new_value.into(),
        }
    }
}

/// A rule row with fewer than the three required fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRowError {
    /// 1-based row number
    pub row: usize,
    pub field_count: usize,
}

impl std::fmt::Display for MalformedRowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Row {} has {} field(s), expected 3 (identifier, old name, new name)",
            self.row, self.field_count
        )
    }
}

impl std::error::Error for MalformedRowError {}

/// What to do with rows that have fewer than three fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortRowPolicy {
    /// Reject the whole rule set
    #[default]
    Fail,
    /// Drop the row and keep going
    Skip,
}

/// Map rows to actions by position (0: identifier, 1: old value, 2: new value)
///
/// With [`ShortRowPolicy::Fail`] any short row fails the whole parse so that a
/// rule set is never half-applied.
pub fn parse_actions(
    rows: &[Vec<String>],
    policy: ShortRowPolicy,
) -> Result<Vec<RenameAction>, MalformedRowError> {
    let mut actions = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        match row.as_slice() {
            [identifier, old, new, rest @ ..] => {
                if !rest.is_empty() {
                    log::debug!("Row {}: ignoring {} extra field(s)", index + 1, rest.len());
                }
                actions.push(RenameAction::new(identifier, old, new));
            }
            _ => {
                let err = MalformedRowError {
                    row: index + 1,
                    field_count: row.len(),
                };
                match policy {
                    ShortRowPolicy::Fail => return Err(err),
                    ShortRowPolicy::Skip => log::warn!("Skipping rule: {}", err),
                }
            }
        }
    }

    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|f| f.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_rows_map_by_position() {
        let actions = parse_actions(&rows(&[&["G1", "Alpha", "Beta"], &["G2", "X", "Y"]]), ShortRowPolicy::Fail).unwrap();

        assert_eq!(
            actions,
            vec![
                RenameAction::new("G1", "Alpha", "Beta"),
                RenameAction::new("G2", "X", "Y"),
            ]
        );
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let actions = parse_actions(&rows(&[&["G1", "Alpha", "Beta", "comment"]]), ShortRowPolicy::Fail).unwrap();
        assert_eq!(actions, vec![RenameAction::new("G1", "Alpha", "Beta")]);
    }

    #[test]
    fn test_short_row_fails_whole_parse() {
        let err = parse_actions(&rows(&[&["G1", "Alpha", "Beta"], &["G2", "X"]]), ShortRowPolicy::Fail)
            .unwrap_err();

        assert_eq!(err, MalformedRowError { row: 2, field_count: 2 });
        assert!(err.to_string().contains("Row 2"));
    }

    #[test]
    fn test_short_row_skipped_with_skip_policy() {
        let actions =
            parse_actions(&rows(&[&["G1"], &["G2", "X", "Y"]]), ShortRowPolicy::Skip).unwrap();

        assert_eq!(actions, vec![RenameAction::new("G2", "X", "Y")]);
    }

    #[test]
    fn test_values_are_not_trimmed() {
        let actions = parse_actions(&rows(&[&[" G1", "Alpha ", ""]]), ShortRowPolicy::Fail).unwrap();

        assert_eq!(actions[0].identifier, " G1");
        assert_eq!(actions[0].expected_old_value, "Alpha ");
        assert_eq!(actions[0].new_value, "");
    }
}
