//! Accessible object abstraction.
//!
//! Nodes are owned by the accessibility service. The engine only reads them,
//! and only for the duration of a single traversal.

use crate::error::NodeError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, Weak};

/// Shared handle to an accessible object.
pub type NodeRef = Arc<dyn AccessibilityNode>;

/// Accessibility role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Application,
    Frame,
    Window,
    Dialog,
    Panel,
    Filler,
    ScrollPane,
    DocumentFrame,
    DocumentWeb,
    Section,
    Form,
    Entry,
    PasswordText,
    Text,
    Label,
    PushButton,
    MenuItem,
    #[default]
    Unknown,
}

impl Role {
    /// Document/frame-like containers.
    ///
    /// Focus landing on one of these is the only point where a sticky
    /// exclusion is re-evaluated for clearing.
    pub fn is_top_level_content(&self) -> bool {
        matches!(self, Role::Frame | Role::DocumentFrame | Role::DocumentWeb)
    }
}

/// Read-only view of an accessible object.
///
/// Every accessor may fail: objects can disappear between the event being
/// raised and the engine looking at it.
pub trait AccessibilityNode: Send + Sync {
    /// Accessible name, if it has one.
    fn name(&self) -> Result<Option<String>, NodeError>;

    fn role(&self) -> Result<Role, NodeError>;

    /// Parent object, `None` at the root.
    fn parent(&self) -> Result<Option<NodeRef>, NodeError>;

    fn children(&self) -> Result<Vec<NodeRef>, NodeError>;

    /// Whether the focused state is set on this object.
    fn is_focused(&self) -> Result<bool, NodeError>;
}

/// In-memory accessible object.
///
/// Builds a tree for replaying recorded sessions and for tests. Parents are
/// held weakly, so the root must be kept alive for ancestor walks to see it.
#[derive(Debug)]
pub struct StaticNode {
    name: Option<String>,
    role: Role,
    focused: AtomicBool,
    defunct: AtomicBool,
    parent: RwLock<Weak<StaticNode>>,
    children: RwLock<Vec<Arc<StaticNode>>>,
}

impl StaticNode {
    pub fn new(name: Option<&str>, role: Role) -> Arc<Self> {
        Arc::new(Self {
            name: name.map(str::to_string),
            role,
            focused: AtomicBool::new(false),
            defunct: AtomicBool::new(false),
            parent: RwLock::new(Weak::new()),
            children: RwLock::new(Vec::new()),
        })
    }

    pub fn named(name: &str, role: Role) -> Arc<Self> {
        Self::new(Some(name), role)
    }

    pub fn anonymous(role: Role) -> Arc<Self> {
        Self::new(None, role)
    }

    /// Attach `child` under `self` and return it.
    pub fn add_child(self: &Arc<Self>, child: Arc<StaticNode>) -> Arc<StaticNode> {
        *child
            .parent
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Arc::downgrade(self);
        self.children
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Arc::clone(&child));
        child
    }

    pub fn set_focused(&self, focused: bool) {
        self.focused.store(focused, Ordering::SeqCst);
    }

    /// Make every accessor fail with [`NodeError::Defunct`].
    pub fn set_defunct(&self, defunct: bool) {
        self.defunct.store(defunct, Ordering::SeqCst);
    }

    /// Upcast to a trait-object handle.
    pub fn as_node(self: &Arc<Self>) -> NodeRef {
        Arc::clone(self) as NodeRef
    }

    fn check(&self) -> Result<(), NodeError> {
        if self.defunct.load(Ordering::SeqCst) {
            Err(NodeError::Defunct)
        } else {
            Ok(())
        }
    }
}

impl AccessibilityNode for StaticNode {
    fn name(&self) -> Result<Option<String>, NodeError> {
        self.check()?;
        Ok(self.name.clone())
    }

    fn role(&self) -> Result<Role, NodeError> {
        self.check()?;
        Ok(self.role)
    }

    fn parent(&self) -> Result<Option<NodeRef>, NodeError> {
        self.check()?;
        let parent = self.parent.read().map_err(|_| NodeError::Defunct)?;
        Ok(parent.upgrade().map(|p| p as NodeRef))
    }

    fn children(&self) -> Result<Vec<NodeRef>, NodeError> {
        self.check()?;
        let children = self.children.read().map_err(|_| NodeError::Defunct)?;
        Ok(children.iter().map(|c| Arc::clone(c) as NodeRef).collect())
    }

    fn is_focused(&self) -> Result<bool, NodeError> {
        self.check()?;
        Ok(self.focused.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_content_roles() {
        assert!(Role::Frame.is_top_level_content());
        assert!(Role::DocumentWeb.is_top_level_content());
        assert!(Role::DocumentFrame.is_top_level_content());
        assert!(!Role::PasswordText.is_top_level_content());
        assert!(!Role::Entry.is_top_level_content());
        assert!(!Role::Unknown.is_top_level_content());
    }

    #[test]
    fn test_static_node_links_parent_and_children() {
        let root = StaticNode::named("Firefox", Role::Frame);
        let doc = root.add_child(StaticNode::named("Login", Role::DocumentWeb));

        let parent = doc.parent().unwrap().unwrap();
        assert_eq!(parent.name().unwrap().as_deref(), Some("Firefox"));
        assert_eq!(root.children().unwrap().len(), 1);
        assert!(root.parent().unwrap().is_none());
    }

    #[test]
    fn test_defunct_node_fails_every_accessor() {
        let node = StaticNode::named("gone", Role::Entry);
        node.set_defunct(true);

        assert_eq!(node.name(), Err(NodeError::Defunct));
        assert_eq!(node.role(), Err(NodeError::Defunct));
        assert!(node.parent().is_err());
        assert!(node.children().is_err());
        assert!(node.is_focused().is_err());
    }
}
