//! Text and graph renderings of a tree snapshot.
//!
//! Both functions consume the read-only [`SnapshotRow`]s produced by
//! [`BehaviourTree::snapshot`] and never touch the tree itself. Colour is
//! deliberately left to callers; the library emits plain text.
//!
//! [`BehaviourTree::snapshot`]: crate::BehaviourTree::snapshot

use std::fmt::Write;

use crate::tree::SnapshotRow;

/// Indented textual status dump of the whole tree.
///
/// Composites are prefixed `[-]`, leaves `-->`. With `show_status` each line
/// carries the node's status and, when present, its feedback message.
pub fn ascii_tree(rows: &[SnapshotRow], show_status: bool) -> String {
    let mut out = String::new();
    for row in rows {
        let indent = "    ".repeat(row.depth);
        let prefix = if row.kind.is_composite() { "[-]" } else { "-->" };
        let _ = write!(out, "{indent}{prefix} {}", row.name);
        if show_status {
            let _ = write!(out, " [{}]", row.status);
            if !row.feedback_message.is_empty() {
                let _ = write!(out, " -- {}", row.feedback_message);
            }
        }
        out.push('\n');
    }
    out
}

/// Graphviz description of the tree: shapes and colours by node kind.
pub fn dot_graph(rows: &[SnapshotRow]) -> String {
    let mut out = String::new();
    let name = rows
        .first()
        .map(|row| sanitise(&row.name))
        .unwrap_or_else(|| "tree".to_string());
    let _ = writeln!(out, "digraph {name} {{");
    out.push_str("    graph [fontname=\"times-roman\"];\n");
    out.push_str("    node [fontname=\"times-roman\"];\n");
    out.push_str("    edge [fontname=\"times-roman\"];\n");

    for (index, row) in rows.iter().enumerate() {
        let (shape, colour) = match row.kind {
            crate::NodeKind::Sequence => ("box", "orange"),
            crate::NodeKind::Selector => ("octagon", "cyan"),
            crate::NodeKind::Parallel => ("parallelogram", "gold"),
            crate::NodeKind::Leaf => ("ellipse", "gray"),
        };
        let _ = writeln!(
            out,
            "    n{index} [label=\"{}\", shape={shape}, style=filled, fillcolor={colour}];",
            row.name
        );
    }

    // Reconstruct edges from the depth-first row order.
    let mut stack: Vec<(usize, usize)> = Vec::new(); // (row index, depth)
    for (index, row) in rows.iter().enumerate() {
        while let Some(&(_, depth)) = stack.last() {
            if depth >= row.depth {
                stack.pop();
            } else {
                break;
            }
        }
        if let Some(&(parent, _)) = stack.last() {
            let _ = writeln!(out, "    n{parent} -> n{index};");
        }
        stack.push((index, row.depth));
    }

    out.push_str("}\n");
    out
}

fn sanitise(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if cleaned.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("_{cleaned}")
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviours::AlwaysRunning;
    use crate::composite::{Parallel, ParallelPolicy, Sequence};
    use crate::BehaviourTree;

    fn sample_rows() -> Vec<SnapshotRow> {
        let root = Parallel::new(
            "Parallel",
            ParallelPolicy::SucceedOnOne,
            vec![
                Box::new(AlwaysRunning::new("Context")),
                Box::new(Sequence::new(
                    "Sequence",
                    vec![Box::new(AlwaysRunning::new("Action 1"))],
                )),
            ],
        );
        BehaviourTree::new(Box::new(root)).snapshot()
    }

    #[test]
    fn ascii_tree_indents_by_depth() {
        let text = ascii_tree(&sample_rows(), true);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "[-] Parallel [INVALID]");
        assert_eq!(lines[1], "    --> Context [INVALID]");
        assert_eq!(lines[2], "    [-] Sequence [INVALID]");
        assert_eq!(lines[3], "        --> Action 1 [INVALID]");
    }

    #[test]
    fn dot_graph_has_one_edge_per_parent_child_pair() {
        let dot = dot_graph(&sample_rows());

        assert!(dot.starts_with("digraph Parallel {"));
        assert!(dot.contains("n0 -> n1;"));
        assert!(dot.contains("n0 -> n2;"));
        assert!(dot.contains("n2 -> n3;"));
        assert!(dot.contains("shape=parallelogram"));
    }
}
