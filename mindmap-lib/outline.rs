//! Arena-backed outline tree.
//!
//! Nodes are stored in a map keyed by [`NodeId`]. A node owns its children as
//! an ordered list of ids and refers back to its parent by id, so the
//! parent/child graph never forms an ownership cycle. The root is created
//! with the tree and can never be removed.

use std::{
  collections::{
    BTreeMap,
    BTreeSet,
  },
  fmt,
  num::NonZeroUsize,
};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(NonZeroUsize);

impl NodeId {
  pub const fn new(id: NonZeroUsize) -> Self {
    Self(id)
  }

  pub const fn get(self) -> NonZeroUsize {
    self.0
  }
}

impl From<NonZeroUsize> for NodeId {
  fn from(value: NonZeroUsize) -> Self {
    Self::new(value)
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// A single outline entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
  text:      String,
  children:  Vec<NodeId>,
  collapsed: bool,
  parent:    Option<NodeId>,
}

impl Node {
  fn new(text: impl Into<String>, parent: Option<NodeId>) -> Self {
    Self {
      text: text.into(),
      children: Vec::new(),
      collapsed: false,
      parent,
    }
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn children(&self) -> &[NodeId] {
    &self.children
  }

  pub fn has_children(&self) -> bool {
    !self.children.is_empty()
  }

  /// Raw collapse flag. Has no effect on visibility while the node is a leaf.
  pub fn is_collapsed(&self) -> bool {
    self.collapsed
  }

  pub fn parent(&self) -> Option<NodeId> {
    self.parent
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutlineError {
  #[error("unknown node {0}")]
  UnknownNode(NodeId),
  #[error("the root node has no parent")]
  RootHasNoParent,
  #[error("the root node cannot be removed")]
  RootRemoval,
}

pub type Result<T> = std::result::Result<T, OutlineError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantError {
  EmptyTree,
  MissingRoot,
  RootHasParent,
  ParentMismatch,
  MissingNode,
  DuplicateVisit,
  UnreachableNode,
}

#[derive(Debug, Clone)]
pub struct Outline {
  root:         NodeId,
  nodes:        BTreeMap<NodeId, Node>,
  next_node_id: NonZeroUsize,
}

impl Outline {
  pub fn new(root_text: impl Into<String>) -> Self {
    let root = NodeId::new(NonZeroUsize::MIN);
    let mut nodes = BTreeMap::new();
    nodes.insert(root, Node::new(root_text, None));

    Self {
      root,
      nodes,
      next_node_id: NonZeroUsize::MIN.saturating_add(1),
    }
  }

  pub fn root(&self) -> NodeId {
    self.root
  }

  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  pub fn contains(&self, id: NodeId) -> bool {
    self.nodes.contains_key(&id)
  }

  pub fn node(&self, id: NodeId) -> Option<&Node> {
    self.nodes.get(&id)
  }

  pub fn text(&self, id: NodeId) -> Option<&str> {
    self.node(id).map(Node::text)
  }

  /// Children of `id` in insertion order; empty for unknown ids.
  pub fn children(&self, id: NodeId) -> &[NodeId] {
    self.node(id).map(Node::children).unwrap_or(&[])
  }

  pub fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.node(id).and_then(Node::parent)
  }

  pub fn is_collapsed(&self, id: NodeId) -> bool {
    self.node(id).is_some_and(Node::is_collapsed)
  }

  /// Distance from the root; the root itself is at depth 0.
  pub fn depth(&self, id: NodeId) -> Option<usize> {
    let mut node = self.node(id)?;
    let mut depth = 0;
    while let Some(parent) = node.parent {
      node = self.node(parent)?;
      depth += 1;
    }
    Some(depth)
  }

  /// Number of nodes below `id`, not counting `id` itself.
  pub fn descendant_count(&self, id: NodeId) -> usize {
    let mut count = 0;
    let mut stack: Vec<NodeId> = self.children(id).to_vec();
    while let Some(next) = stack.pop() {
      count += 1;
      stack.extend_from_slice(self.children(next));
    }
    count
  }

  /// Index of `id` within its parent's children.
  pub fn position_in_parent(&self, id: NodeId) -> Option<usize> {
    let parent = self.parent(id)?;
    self
      .children(parent)
      .iter()
      .position(|child| *child == id)
  }

  pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
    self.node_mut(id)?.text = text.into();
    Ok(())
  }

  pub fn set_collapsed(&mut self, id: NodeId, collapsed: bool) -> Result<()> {
    self.node_mut(id)?.collapsed = collapsed;
    Ok(())
  }

  /// Flips the collapse flag of a node with children.
  ///
  /// Returns `Ok(false)` without touching anything when the node is a leaf.
  pub fn toggle_collapsed(&mut self, id: NodeId) -> Result<bool> {
    let node = self.node_mut(id)?;
    if node.children.is_empty() {
      return Ok(false);
    }
    node.collapsed = !node.collapsed;
    Ok(true)
  }

  /// Appends a new node as the last child of `parent`.
  pub fn append_child(&mut self, parent: NodeId, text: impl Into<String>) -> Result<NodeId> {
    if !self.contains(parent) {
      return Err(OutlineError::UnknownNode(parent));
    }

    let id = self.alloc_node_id();
    self.nodes.insert(id, Node::new(text, Some(parent)));
    self.node_mut(parent)?.children.push(id);

    debug_assert!(self.validate().is_ok());
    Ok(id)
  }

  /// Inserts a new node directly after `sibling` under the same parent.
  pub fn insert_after(&mut self, sibling: NodeId, text: impl Into<String>) -> Result<NodeId> {
    if !self.contains(sibling) {
      return Err(OutlineError::UnknownNode(sibling));
    }
    let parent = self.parent(sibling).ok_or(OutlineError::RootHasNoParent)?;
    let index = self
      .position_in_parent(sibling)
      .ok_or(OutlineError::UnknownNode(sibling))?;

    let id = self.alloc_node_id();
    self.nodes.insert(id, Node::new(text, Some(parent)));
    self.node_mut(parent)?.children.insert(index + 1, id);

    debug_assert!(self.validate().is_ok());
    Ok(id)
  }

  /// Detaches `id` from its parent and discards it with its whole subtree.
  ///
  /// Returns how many nodes were discarded.
  pub fn remove(&mut self, id: NodeId) -> Result<usize> {
    if !self.contains(id) {
      return Err(OutlineError::UnknownNode(id));
    }
    let parent = self.parent(id).ok_or(OutlineError::RootRemoval)?;

    self.node_mut(parent)?.children.retain(|child| *child != id);

    let mut removed = 0;
    let mut stack = vec![id];
    while let Some(next) = stack.pop() {
      if let Some(node) = self.nodes.remove(&next) {
        stack.extend(node.children);
        removed += 1;
      }
    }

    debug_assert!(self.validate().is_ok());
    Ok(removed)
  }

  pub fn validate(&self) -> std::result::Result<(), InvariantError> {
    if self.nodes.is_empty() {
      return Err(InvariantError::EmptyTree);
    }
    if !self.nodes.contains_key(&self.root) {
      return Err(InvariantError::MissingRoot);
    }
    if self.parent(self.root).is_some() {
      return Err(InvariantError::RootHasParent);
    }

    let mut visited = BTreeSet::new();
    let mut stack = vec![(self.root, None)];

    while let Some((id, expected_parent)) = stack.pop() {
      if !visited.insert(id) {
        return Err(InvariantError::DuplicateVisit);
      }
      let Some(node) = self.nodes.get(&id) else {
        return Err(InvariantError::MissingNode);
      };
      if node.parent != expected_parent {
        return Err(InvariantError::ParentMismatch);
      }
      for child in &node.children {
        stack.push((*child, Some(id)));
      }
    }

    if visited.len() != self.nodes.len() {
      return Err(InvariantError::UnreachableNode);
    }

    Ok(())
  }

  fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
    self.nodes.get_mut(&id).ok_or(OutlineError::UnknownNode(id))
  }

  fn alloc_node_id(&mut self) -> NodeId {
    let id = self.next_node_id;
    self.next_node_id = self.next_node_id.saturating_add(1);
    NodeId::new(id)
  }
}
