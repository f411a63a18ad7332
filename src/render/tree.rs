//! Directory tree rendering from the walker's node sequence.

use crate::domain::{Decision, FileContent, NodeKind, TraversalNode};

pub const TREE_HEADER: &str = "Directory structure:";

/// Render nodes (in walk order) as an indented tree.
///
/// Every node gets exactly one line. Nodes that did not contribute content
/// carry a bracketed annotation saying why.
pub fn render_tree(nodes: &[TraversalNode]) -> String {
    let is_last = last_child_flags(nodes);
    let mut lines = Vec::with_capacity(nodes.len() + 1);
    lines.push(TREE_HEADER.to_string());

    // For each ancestor depth, whether that ancestor was the last child.
    let mut ancestor_last: Vec<bool> = Vec::new();
    for (node, &last) in nodes.iter().zip(&is_last) {
        ancestor_last.truncate(node.depth);
        let mut line: String = ancestor_last
            .iter()
            .map(|&done| if done { "    " } else { "│   " })
            .collect();
        line.push_str(if last { "└── " } else { "├── " });
        line.push_str(&node_label(node));
        if let Some(note) = annotation(node) {
            line.push(' ');
            line.push_str(&note);
        }
        lines.push(line);

        // Depths can only grow by one per step in a preorder walk.
        while ancestor_last.len() < node.depth {
            ancestor_last.push(false);
        }
        ancestor_last.push(last);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// A node is the last child when no later node shares its depth before the
/// walk climbs back above it.
fn last_child_flags(nodes: &[TraversalNode]) -> Vec<bool> {
    let mut flags = vec![false; nodes.len()];
    let mut sibling_after: Vec<bool> = Vec::new();
    for (idx, node) in nodes.iter().enumerate().rev() {
        let depth = node.depth;
        if sibling_after.len() <= depth {
            sibling_after.resize(depth + 1, false);
        }
        flags[idx] = !sibling_after[depth];
        sibling_after[depth] = true;
        sibling_after.truncate(depth + 1);
    }
    flags
}

fn node_label(node: &TraversalNode) -> String {
    match &node.kind {
        NodeKind::Directory => format!("{}/", node.name),
        NodeKind::File => node.name.clone(),
        NodeKind::Symlink { target, target_is_dir } => {
            let suffix = if *target_is_dir { "/" } else { "" };
            format!("{} -> {}{}", node.name, target, suffix)
        }
    }
}

fn annotation(node: &TraversalNode) -> Option<String> {
    match &node.decision {
        Decision::Excluded(reason) => Some(format!("[excluded: {reason}]")),
        Decision::Skipped(reason) => Some(format!("[skipped: {reason}]")),
        Decision::Errored(message) => Some(format!("[error: {message}]")),
        Decision::Included => match &node.content {
            Some(FileContent::Binary) => Some("[binary]".to_string()),
            Some(FileContent::Text { truncated: true, .. }) => Some("[truncated]".to_string()),
            _ => None,
        },
    }
}
