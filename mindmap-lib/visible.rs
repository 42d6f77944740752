//! Flattening of the outline into the rows a user can currently see.
//!
//! The visible sequence is a pre-order walk from the root that does not
//! descend into collapsed nodes. It is recomputed on every call and is the
//! only addressing space for the selection cursor.

use crate::outline::{
  NodeId,
  Outline,
};

/// Pre-order list of every node not hidden behind a collapsed ancestor.
///
/// The root is always the first entry.
pub fn visible_nodes(outline: &Outline) -> Vec<NodeId> {
  let mut visible = Vec::with_capacity(outline.node_count());
  let mut stack = vec![outline.root()];
  while let Some(id) = stack.pop() {
    visible.push(id);
    if outline.is_collapsed(id) {
      continue;
    }
    // Reverse so the first child is popped first.
    stack.extend(outline.children(id).iter().rev().copied());
  }
  visible
}

/// Position of `id` in the current visible sequence.
pub fn visible_index(outline: &Outline, id: NodeId) -> Option<usize> {
  visible_nodes(outline)
    .into_iter()
    .position(|visible| visible == id)
}

/// One painted line of the tree view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
  pub id:           NodeId,
  pub depth:        usize,
  /// Last child of its parent (`└──` rather than `├──`).
  pub is_last:      bool,
  /// For each ancestor between the root and this row's parent, whether a
  /// vertical guide continues through this row.
  pub guides:       Vec<bool>,
  pub has_children: bool,
  pub collapsed:    bool,
}

/// Same ordering as [`visible_nodes`], with the layout data a tree view needs.
pub fn visible_rows(outline: &Outline) -> Vec<VisibleRow> {
  let mut rows = Vec::with_capacity(outline.node_count());
  let mut stack = vec![(outline.root(), 0usize, true, Vec::new())];

  while let Some((id, depth, is_last, guides)) = stack.pop() {
    let Some(node) = outline.node(id) else {
      continue;
    };

    if !node.is_collapsed() {
      let mut child_guides = guides.clone();
      if depth > 0 {
        child_guides.push(!is_last);
      }
      let count = node.children().len();
      for (index, child) in node.children().iter().enumerate().rev() {
        stack.push((*child, depth + 1, index + 1 == count, child_guides.clone()));
      }
    }

    rows.push(VisibleRow {
      id,
      depth,
      is_last,
      guides,
      has_children: node.has_children(),
      collapsed: node.is_collapsed() && node.has_children(),
    });
  }

  rows
}
