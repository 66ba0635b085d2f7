//! Coloured terminal presentation of tree snapshots.
//!
//! Consumes the read-only rows from [`BehaviourTree::snapshot`] and layers
//! per-status colour on top of the library's plain text conventions.
//!
//! [`BehaviourTree::snapshot`]: ticktree::BehaviourTree::snapshot

use std::fmt::Write;

use console::style;

use ticktree::{SnapshotRow, Status};

/// Indented, per-status coloured status dump.
pub fn coloured_tree(rows: &[SnapshotRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let indent = "    ".repeat(row.depth);
        let prefix = if row.kind.is_composite() { "[-]" } else { "-->" };
        let mut line = format!("{prefix} {} [{}]", row.name, row.status);
        if !row.feedback_message.is_empty() {
            let _ = write!(line, " -- {}", row.feedback_message);
        }
        let styled = match row.status {
            Status::Success => style(line).green(),
            Status::Running => style(line).cyan(),
            Status::Failure => style(line).red(),
            Status::Invalid => style(line).dim(),
        };
        let _ = writeln!(out, "{indent}{styled}");
    }
    out
}
