//! Terminal rendering of actions and pass results

use colored::*;
use unicode_width::UnicodeWidthStr;

use crate::rename::{Outcome, ReconciliationReport, RenameAction, ResultCounters};

const HEADERS: [&str; 5] = ["#", "GUID", "Old name", "New name", "Status"];

/// Pad to a display width, counting wide and accented characters correctly
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{}{}", text, " ".repeat(fill))
}

/// Render the actions table; `statuses` holds one entry per action when a pass
/// has run, and is empty when only listing the loaded actions
fn render_rows(actions: &[RenameAction], statuses: &[Option<Outcome>]) -> String {
    let rows: Vec<[String; 5]> = actions
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let status = statuses
                .get(i)
                .copied()
                .flatten()
                .map(|o| o.glyph())
                .unwrap_or("");
            [
                (i + 1).to_string(),
                action.identifier.clone(),
                action.expected_old_value.clone(),
                action.new_value.clone(),
                status.to_string(),
            ]
        })
        .collect();

    let column_count = if statuses.is_empty() { 4 } else { 5 };
    let mut widths = [0usize; 5];
    for (col, header) in HEADERS.iter().enumerate() {
        widths[col] = UnicodeWidthStr::width(*header);
    }
    for row in &rows {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS[..column_count]
        .iter()
        .enumerate()
        .map(|(col, h)| pad(h, widths[col]))
        .collect();
    out.push_str(&header.join("  ").bold().to_string());
    out.push('\n');

    for (i, row) in rows.iter().enumerate() {
        let line = row[..column_count]
            .iter()
            .enumerate()
            .map(|(col, cell)| pad(cell, widths[col]))
            .collect::<Vec<_>>()
            .join("  ");
        let line = line.trim_end();

        let colored_line = match statuses.get(i).copied().flatten() {
            Some(Outcome::Success) => line.green(),
            Some(Outcome::Warning) => line.yellow(),
            Some(Outcome::Failure) => line.red(),
            None => line.normal(),
        };
        out.push_str(&colored_line.to_string());
        out.push('\n');
    }

    out
}

/// Table of the loaded actions, numbered from 1
pub fn render_actions(actions: &[RenameAction]) -> String {
    render_rows(actions, &[])
}

/// Table of the actions with their status after a pass
pub fn render_results(actions: &[RenameAction], report: &ReconciliationReport) -> String {
    render_rows(actions, &report.outcomes())
}

/// "1 modification loaded" / "N modifications loaded"
pub fn actions_loaded_label(count: usize) -> String {
    if count == 1 {
        "1 modification loaded".to_string()
    } else {
        format!("{} modifications loaded", count)
    }
}

/// Count followed by singular or plural wording, `None` when there is nothing to count
pub fn counter_badge(count: usize, singular: &str, plural: &str) -> Option<String> {
    match count {
        0 => None,
        1 => Some(format!("1 {}", singular)),
        n => Some(format!("{} {}", n, plural)),
    }
}

/// Summary badges for the counters of a pass, only for non-zero counts
pub fn render_badges(counters: &ResultCounters, noop: usize) -> String {
    let badges = [
        counter_badge(
            counters.success,
            "modification applied successfully",
            "modifications applied successfully",
        )
        .map(|b| b.on_green().black().to_string()),
        counter_badge(counters.warning, "name mismatch", "name mismatches")
            .map(|b| b.on_yellow().black().to_string()),
        counter_badge(counters.failure, "GUID not found", "GUIDs not found")
            .map(|b| b.on_red().white().to_string()),
        counter_badge(noop, "already up to date", "already up to date").map(|b| b.dimmed().to_string()),
    ];

    badges.into_iter().flatten().collect::<Vec<_>>().join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::rename::reconcile;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_counter_badge_wording() {
        assert_eq!(counter_badge(0, "GUID not found", "GUIDs not found"), None);
        assert_eq!(
            counter_badge(1, "GUID not found", "GUIDs not found"),
            Some("1 GUID not found".to_string())
        );
        assert_eq!(
            counter_badge(4, "GUID not found", "GUIDs not found"),
            Some("4 GUIDs not found".to_string())
        );
    }

    #[test]
    fn test_actions_loaded_label() {
        assert_eq!(actions_loaded_label(1), "1 modification loaded");
        assert_eq!(actions_loaded_label(0), "0 modifications loaded");
        assert_eq!(actions_loaded_label(12), "12 modifications loaded");
    }

    #[test]
    fn test_results_table_shows_status_glyphs() {
        plain();
        let mut doc = Document::parse(
            "<r><o><id>G1</id><libelle>Alpha</libelle></o><o><id>G2</id><libelle>Zeta</libelle></o><o><id>G4</id><libelle>Done</libelle></o></r>",
        )
        .unwrap();
        let actions = vec![
            RenameAction::new("G1", "Alpha", "Beta"),
            RenameAction::new("G2", "Alpha", "Beta"),
            RenameAction::new("G3", "X", "Y"),
            RenameAction::new("G4", "Old", "Done"),
        ];
        let report = reconcile(&mut doc, &actions);

        let table = render_results(&actions, &report);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("#  GUID  Old name  New name  Status"));
        assert!(lines[1].ends_with("✓"));
        assert!(lines[2].ends_with("!"));
        assert!(lines[3].ends_with("✕"));
        assert!(lines[4].ends_with("Done"));
    }

    #[test]
    fn test_columns_align_with_accents() {
        plain();
        let actions = vec![
            RenameAction::new("G1", "Élève", "Étudiant"),
            RenameAction::new("G2", "A", "B"),
        ];

        let table = render_actions(&actions);
        let lines: Vec<&str> = table.lines().collect();

        let position = |line: &str, needle: &str| UnicodeWidthStr::width(&line[..line.find(needle).unwrap()]);
        assert_eq!(position(lines[1], "Étudiant"), position(lines[2], "B"));
        assert!(!lines[0].contains("Status"));
    }

    #[test]
    fn test_badges_skip_zero_counts() {
        plain();
        let badges = render_badges(&ResultCounters::new(2, 0, 1), 0);
        assert_eq!(badges, "2 modifications applied successfully  1 GUID not found");
    }
}
