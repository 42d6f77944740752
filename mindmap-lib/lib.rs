//! Outline model for the mindmap editor.
//!
//! A tree of headings with a collapsible, cursor-addressable view, plus the
//! conversion to and from heading-only markdown. Terminal concerns live in
//! `mindmap-term`.

pub mod command;
pub mod editor;
pub mod markdown;
pub mod outline;
pub mod status;
pub mod visible;

pub use command::{
  Command,
  command_from_name,
};
pub use editor::{
  EditKind,
  EditTarget,
  Editor,
  Mode,
  Outcome,
};
pub use outline::{
  Node,
  NodeId,
  Outline,
};
