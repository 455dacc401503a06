//! Reporting of loaded actions and pass results (terminal table and JSON)

pub mod json;
pub mod table;

pub use json::{ReportContext, build_report};
pub use table::{actions_loaded_label, render_actions, render_badges, render_results};
