//! Bounded, failure-tolerant walks over the accessibility tree.
//!
//! Any accessor error ends the walk at that point; nothing here returns an
//! error.

use crate::node::{AccessibilityNode, NodeRef};

/// Lowercased, non-empty names of `node` and up to `max_depth` ancestors.
///
/// The starting node's own name comes first, followed by each parent in turn.
/// Stops early at the root or at the first node whose name or parent cannot
/// be read.
pub fn ancestor_names(node: &dyn AccessibilityNode, max_depth: usize) -> Vec<String> {
    let mut names = Vec::new();

    if !push_name(node, &mut names) {
        return names;
    }

    let mut current = match node.parent() {
        Ok(Some(parent)) => parent,
        _ => return names,
    };

    for _ in 0..max_depth {
        if !push_name(current.as_ref(), &mut names) {
            break;
        }
        current = match current.parent() {
            Ok(Some(parent)) => parent,
            Ok(None) => break,
            Err(e) => {
                tracing::trace!(error = %e, "ancestor walk stopped");
                break;
            }
        };
    }

    names
}

/// Record the node's name; `false` if the node could not be read.
fn push_name(node: &dyn AccessibilityNode, names: &mut Vec<String>) -> bool {
    match node.name() {
        Ok(Some(name)) => {
            let name = name.trim().to_lowercase();
            if !name.is_empty() {
                names.push(name);
            }
            true
        }
        Ok(None) => true,
        Err(e) => {
            tracing::trace!(error = %e, "ancestor walk stopped");
            false
        }
    }
}

/// Follow focused children down from `root`, at most `max_depth` hops.
///
/// Returns the deepest node reached through focused children, or `None` if
/// no child of `root` is focused. A child whose focus state cannot be read
/// is skipped; a node whose children cannot be listed ends the walk.
pub fn deepest_focused(root: &NodeRef, max_depth: usize) -> Option<NodeRef> {
    let mut deepest: Option<NodeRef> = None;
    let mut current = NodeRef::clone(root);

    for _ in 0..max_depth {
        let children = match current.children() {
            Ok(children) => children,
            Err(e) => {
                tracing::trace!(error = %e, "focus descent stopped");
                break;
            }
        };

        let Some(next) = children
            .into_iter()
            .find(|child| child.is_focused().unwrap_or(false))
        else {
            break;
        };

        deepest = Some(NodeRef::clone(&next));
        current = next;
    }

    deepest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Role, StaticNode};
    use std::sync::Arc;

    /// desktop > Firefox > frame > "Bank Login" document > form > password entry
    fn browser_tree() -> (Arc<StaticNode>, Vec<Arc<StaticNode>>) {
        let desktop = StaticNode::named("main", Role::Unknown);
        let app = desktop.add_child(StaticNode::named("Firefox", Role::Application));
        let frame = app.add_child(StaticNode::named("Mozilla Firefox", Role::Frame));
        let doc = frame.add_child(StaticNode::named("Bank Login", Role::DocumentWeb));
        let form = doc.add_child(StaticNode::anonymous(Role::Form));
        let entry = form.add_child(StaticNode::named("Password", Role::PasswordText));
        (desktop, vec![app, frame, doc, form, entry])
    }

    #[test]
    fn test_ancestor_names_lowercases_and_skips_unnamed() {
        let (_desktop, nodes) = browser_tree();
        let entry = &nodes[4];

        let names = ancestor_names(&**entry, 5);
        assert_eq!(
            names,
            vec!["password", "bank login", "mozilla firefox", "firefox", "main"]
        );
    }

    #[test]
    fn test_ancestor_names_respects_depth() {
        let (_desktop, nodes) = browser_tree();
        let entry = &nodes[4];

        let names = ancestor_names(&**entry, 2);
        // entry, form (unnamed), document
        assert_eq!(names, vec!["password", "bank login"]);
    }

    #[test]
    fn test_ancestor_names_zero_depth_is_just_the_node() {
        let (_desktop, nodes) = browser_tree();
        assert_eq!(ancestor_names(&*nodes[4], 0), vec!["password"]);
    }

    #[test]
    fn test_ancestor_names_stops_at_defunct_ancestor() {
        let (_desktop, nodes) = browser_tree();
        nodes[2].set_defunct(true); // document

        let names = ancestor_names(&*nodes[4], 5);
        assert_eq!(names, vec!["password"]);
    }

    #[test]
    fn test_ancestor_names_defunct_source() {
        let (_desktop, nodes) = browser_tree();
        nodes[4].set_defunct(true);
        assert!(ancestor_names(&*nodes[4], 5).is_empty());
    }

    #[test]
    fn test_deepest_focused_follows_focus_chain() {
        let (desktop, nodes) = browser_tree();
        for node in &nodes {
            node.set_focused(true);
        }

        let found = deepest_focused(&desktop.as_node(), 20).unwrap();
        assert_eq!(found.name().unwrap().as_deref(), Some("Password"));
    }

    #[test]
    fn test_deepest_focused_stops_where_focus_ends() {
        let (desktop, nodes) = browser_tree();
        nodes[0].set_focused(true);
        nodes[1].set_focused(true);

        let found = deepest_focused(&desktop.as_node(), 20).unwrap();
        assert_eq!(found.name().unwrap().as_deref(), Some("Mozilla Firefox"));
    }

    #[test]
    fn test_deepest_focused_respects_depth() {
        let (desktop, nodes) = browser_tree();
        for node in &nodes {
            node.set_focused(true);
        }

        let found = deepest_focused(&desktop.as_node(), 2).unwrap();
        assert_eq!(found.name().unwrap().as_deref(), Some("Mozilla Firefox"));
    }

    #[test]
    fn test_deepest_focused_none_when_nothing_focused() {
        let (desktop, _nodes) = browser_tree();
        assert!(deepest_focused(&desktop.as_node(), 20).is_none());
    }

    #[test]
    fn test_deepest_focused_skips_unreadable_sibling() {
        let desktop = StaticNode::named("main", Role::Unknown);
        let broken = desktop.add_child(StaticNode::named("crashed", Role::Application));
        let good = desktop.add_child(StaticNode::named("Vault", Role::Application));
        broken.set_defunct(true);
        good.set_focused(true);

        let found = deepest_focused(&desktop.as_node(), 20).unwrap();
        assert_eq!(found.name().unwrap().as_deref(), Some("Vault"));
    }

    #[test]
    fn test_deepest_focused_defunct_root() {
        let desktop = StaticNode::named("main", Role::Unknown);
        desktop.set_defunct(true);
        assert!(deepest_focused(&desktop.as_node(), 20).is_none());
    }
}
