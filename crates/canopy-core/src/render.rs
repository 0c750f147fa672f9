//! Plain-text rendering of a tree for diagnostics.

use std::fmt::Write;

use tracing::debug;

use crate::Node;

/// Renders `root` and its descendants, one node per line.
///
/// Each line reads `name [kind] status`, indented two spaces per depth.
/// Nodes that were never updated show `-` as their status.
pub fn render_tree<B>(root: &dyn Node<B>) -> String {
    let mut out = String::new();
    render_into(&mut out, root, 0);
    out
}

fn render_into<B>(out: &mut String, node: &dyn Node<B>, depth: usize) {
    let status = node.status().map_or("-", |s| s.as_str());
    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "{:indent$}{} [{}] {}",
        "",
        node.name(),
        node.kind().as_str(),
        status,
        indent = depth * 2
    );
    for child in node.children() {
        render_into(out, child.as_ref(), depth + 1);
    }
}

/// Visitor that logs the rendered tree at `debug` after every step.
pub fn log_tree<B>(root: &dyn Node<B>) {
    debug!(target: "canopy::tree", "\n{}", render_tree(root));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{inverter, sequence, succeed};
    use crate::{TickContext, TickEvent, update};

    #[test]
    fn renders_nested_nodes_with_indentation() {
        let mut tree = sequence::<()>(vec![succeed(), inverter(succeed())]).unwrap();
        assert_eq!(
            render_tree(tree.as_ref()),
            "Sequence [composite] -\n  Succeed [leaf] -\n  Inverter [decorator] -\n    Succeed [leaf] -\n"
        );

        update(&mut tree, &TickContext::default(), &mut (), &TickEvent);
        let rendered = render_tree(tree.as_ref());
        assert!(rendered.starts_with("Sequence [composite] Failure\n"));
        assert!(rendered.contains("    Succeed [leaf] Success\n"));
    }
}
