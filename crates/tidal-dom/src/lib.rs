//! Element tree for the Tidal layout engine.
//!
//! This crate provides an arena-based tree of layout elements. Each element
//! carries a tag name and optional raw text; styling and layout state live
//! with the layout engine, keyed by [`NodeId`].
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues.
//!
//! A node has at most one parent. Attaching a node that already has a parent
//! detaches it from that parent first, so the single-parent invariant is kept
//! by the tree itself rather than by callers.

use thiserror::Error;

/// A type-safe index into the element tree.
///
/// A disposed node's slot is recycled by the next node created, so a
/// `NodeId` must not be used once its node has been disposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tag name used for nodes created with [`DomTree::create_text`].
pub const TEXT_TAG: &str = "#text";

/// Errors raised by tree mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The node id does not refer to a live node.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    /// The mutation would make a node its own ancestor.
    #[error("cannot insert node {child} into {parent}: would create a cycle")]
    HierarchyRequest {
        /// The intended parent.
        parent: NodeId,
        /// The node being inserted.
        child: NodeId,
    },
    /// The node is not a child of the given parent.
    #[error("node {child} is not a child of {parent}")]
    NotAChild {
        /// The parent that was searched.
        parent: NodeId,
        /// The node that was expected among its children.
        child: NodeId,
    },
}

/// A single element in the tree.
///
/// Stores indices for parent/child relationships, enabling O(1) traversal
/// upwards and ordered traversal downwards.
#[derive(Debug, Clone)]
pub struct Node {
    /// Tag classification (`div`, `h1`, `span`, [`TEXT_TAG`], ...).
    pub tag_name: String,
    /// Raw text content, if the element carries any.
    pub text: Option<String>,
    /// The owning parent. A non-owning back-reference.
    pub parent: Option<NodeId>,
    /// Owned children, in document order.
    pub children: Vec<NodeId>,
}

impl Node {
    /// Returns `true` if this node was created as a text node.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.tag_name == TEXT_TAG
    }
}

/// Arena-based element tree with O(1) node access and traversal.
///
/// This structure stores all nodes in a contiguous vector, using indices
/// for all relationships. This provides:
/// - O(1) access to any node by `NodeId`
/// - O(1) parent traversal
/// - No borrowing issues (indices instead of references)
#[derive(Debug, Clone, Default)]
pub struct DomTree {
    /// All node slots, indexed by `NodeId`. `None` marks a disposed node.
    nodes: Vec<Option<Node>>,
    /// Vacant slots, reused before the arena grows.
    free: Vec<usize>,
}

impl DomTree {
    /// Create an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Returns `true` if `id` refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of slots, live or vacant.
    ///
    /// Side tables indexed by `NodeId` must be at least this long.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    /// Check if the tree has no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocate a new detached element and return its ID.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(Node {
            tag_name: tag_name.to_ascii_lowercase(),
            text: None,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Allocate a new detached text node and return its ID.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(Node {
            tag_name: TEXT_TAG.to_string(),
            text: Some(text.to_string()),
            parent: None,
            children: Vec::new(),
        })
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            self.nodes[index] = Some(node);
            return NodeId(index);
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(node));
        id
    }

    fn require(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.get(id).ok_or(TreeError::UnknownNode(id))
    }

    /// Check that `child` may become a child of `parent`.
    fn check_insertion(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let _ = self.require(parent)?;
        let _ = self.require(child)?;
        // A node cannot be inserted into itself or into one of its own
        // descendants.
        if parent == child || self.is_descendant_of(parent, child) {
            return Err(TreeError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// If `child` is already attached somewhere it is detached first.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if either node is missing and
    /// [`TreeError::HierarchyRequest`] if the append would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.insert_before(parent, child, None)
    }

    /// Inserts `child` into `parent` before `reference`, or at the end when
    /// `reference` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotAChild`] if `reference` is not a child of
    /// `parent`, plus the errors of [`DomTree::append_child`].
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), TreeError> {
        self.check_insertion(parent, child)?;
        if let Some(reference) = reference
            && !self.children(parent).contains(&reference)
        {
            return Err(TreeError::NotAChild {
                parent,
                child: reference,
            });
        }
        if reference == Some(child) {
            // Inserting a node before itself leaves the order unchanged.
            return Ok(());
        }

        self.detach(child);

        let Some(parent_node) = self.get_mut(parent) else {
            return Err(TreeError::UnknownNode(parent));
        };
        let index = reference
            .and_then(|r| parent_node.children.iter().position(|&c| c == r))
            .unwrap_or(parent_node.children.len());
        parent_node.children.insert(index, child);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = Some(parent);
        }
        Ok(())
    }

    /// Removes `child` from `parent`. The child stays alive, detached.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotAChild`] if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let _ = self.require(parent)?;
        let _ = self.require(child)?;
        if self.parent(child) != Some(parent) {
            return Err(TreeError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(())
    }

    /// Detaches every child of `parent`, returning them in their old order.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if `parent` is missing.
    pub fn clear_children(&mut self, parent: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let children = std::mem::take(
            &mut self
                .get_mut(parent)
                .ok_or(TreeError::UnknownNode(parent))?
                .children,
        );
        for &child in &children {
            if let Some(node) = self.get_mut(child) {
                node.parent = None;
            }
        }
        Ok(children)
    }

    /// Detach a node from its parent, if it has one.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
        }
    }

    /// Detach `id` and destroy it together with its whole subtree.
    ///
    /// Returns the ids that were disposed, in pre-order.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if `id` is missing.
    pub fn dispose(&mut self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let _ = self.require(id)?;
        self.detach(id);
        let doomed: Vec<NodeId> = self.descendants(id).collect();
        for &node in &doomed {
            if let Some(slot) = self.nodes.get_mut(node.0)
                && slot.take().is_some()
            {
                self.free.push(node.0);
            }
        }
        Ok(doomed)
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the tag name of a node.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|n| n.tag_name.as_str())
    }

    /// Get the raw text content of a node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| n.text.as_deref())
    }

    /// Replace the raw text content of a node.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if `id` is missing.
    pub fn set_text(&mut self, id: NodeId, text: Option<String>) -> Result<(), TreeError> {
        self.get_mut(id).ok_or(TreeError::UnknownNode(id))?.text = text;
        Ok(())
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|&c| c == id)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|&c| c == id)?;
        siblings.get(index + 1).copied()
    }

    /// Check if `descendant` is a strict descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over `id` and all of its descendants in document (pre-)order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: if self.contains(id) { vec![id] } else { Vec::new() },
        }
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over a subtree, starting with its root.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        // Push in reverse so the first child is visited next.
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
