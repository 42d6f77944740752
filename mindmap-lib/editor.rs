//! Editing session: the outline, the selection cursor and the input mode.
//!
//! The selection is a position in the visible sequence, not a node identity.
//! It may drift out of range after moves, deletes or collapses and is clamped
//! back whenever the selected node is resolved.

use std::{
  fs,
  io::{
    self,
    Write,
  },
  path::{
    Path,
    PathBuf,
  },
};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::{
  command::Command,
  markdown::{
    self,
    MAX_HEADING_LEVEL,
    ParseError,
  },
  outline::{
    NodeId,
    Outline,
  },
  status::StatusMessage,
  visible::{
    VisibleRow,
    visible_index,
    visible_nodes,
    visible_rows,
  },
};

pub const DEFAULT_FILE: &str = "mindmap.md";
pub const CHILD_PLACEHOLDER: &str = "New Node";
pub const SIBLING_PLACEHOLDER: &str = "New Sibling";
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Error)]
pub enum LoadError {
  #[error("failed to read {}: {source}", .path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("failed to load {}: {source}", .path.display())]
  Parse {
    path:   PathBuf,
    #[source]
    source: ParseError,
  },
}

#[derive(Debug, Error)]
pub enum SaveError {
  #[error("failed to write {}: {source}", .path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("failed to replace {}: {source}", .path.display())]
  Persist {
    path:   PathBuf,
    #[source]
    source: tempfile::PersistError,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
  Rename,
  NewChild,
  NewSibling,
}

/// The node a text-entry session writes to, captured when entry begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
  pub node:    NodeId,
  pub kind:    EditKind,
  pub prefill: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
  #[default]
  Navigation,
  TextEntry(EditTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Applied,
  /// The command was a no-op in the current state.
  Ignored,
  Quit,
}

#[derive(Debug)]
pub struct Editor {
  path:     PathBuf,
  outline:  Outline,
  selected: usize,
  mode:     Mode,
  status:   StatusMessage,
  modified: bool,
}

/// Label for the synthetic root: the file name component of `path`.
pub fn root_label(path: &Path) -> String {
  path
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_else(|| path.display().to_string())
}

impl Editor {
  /// A fresh session holding a single root node.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    let path = path.into();
    let outline = Outline::new(root_label(&path));
    Self::with_outline(path, outline)
  }

  pub fn with_outline(path: impl Into<PathBuf>, outline: Outline) -> Self {
    Self {
      path: path.into(),
      outline,
      selected: 0,
      mode: Mode::Navigation,
      status: StatusMessage::default(),
      modified: false,
    }
  }

  /// Loads `path` if it exists, otherwise starts from an empty outline.
  pub fn open(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
    let path = path.into();
    let text = match fs::read_to_string(&path) {
      Ok(text) => text,
      Err(err) if err.kind() == io::ErrorKind::NotFound => {
        log::info!("{} does not exist, starting a new outline", path.display());
        return Ok(Self::new(path));
      },
      Err(source) => return Err(LoadError::Io { path, source }),
    };

    let outline = match markdown::parse(&text, &root_label(&path)) {
      Ok(outline) => outline,
      Err(source) => return Err(LoadError::Parse { path, source }),
    };
    log::info!(
      "loaded {} nodes from {}",
      outline.node_count(),
      path.display()
    );
    Ok(Self::with_outline(path, outline))
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn outline(&self) -> &Outline {
    &self.outline
  }

  pub fn root(&self) -> NodeId {
    self.outline.root()
  }

  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn is_editing(&self) -> bool {
    matches!(self.mode, Mode::TextEntry(_))
  }

  pub fn edit_target(&self) -> Option<&EditTarget> {
    match &self.mode {
      Mode::TextEntry(target) => Some(target),
      Mode::Navigation => None,
    }
  }

  pub fn status(&self) -> &StatusMessage {
    &self.status
  }

  pub fn is_modified(&self) -> bool {
    self.modified
  }

  /// Raw selection index; may be out of range until the next resolve.
  pub fn selected_index(&self) -> usize {
    self.selected
  }

  pub fn visible_nodes(&self) -> Vec<NodeId> {
    visible_nodes(&self.outline)
  }

  pub fn visible_rows(&self) -> Vec<VisibleRow> {
    visible_rows(&self.outline)
  }

  /// Resolves the selection, storing the clamped index back.
  pub fn selected_node(&mut self) -> NodeId {
    let visible = self.visible_nodes();
    self.selected = self.selected.min(visible.len().saturating_sub(1));
    visible
      .get(self.selected)
      .copied()
      .unwrap_or_else(|| self.outline.root())
  }

  pub fn execute(&mut self, command: Command) -> Outcome {
    if self.is_editing() {
      log::debug!("ignoring {command} while editing");
      return Outcome::Ignored;
    }

    log::debug!("executing {command}");
    match command {
      Command::MoveUp => self.move_up(),
      Command::MoveDown => self.move_down(),
      Command::SelectFirst => self.select_first(),
      Command::SelectLast => self.select_last(),
      Command::Rename => self.rename(),
      Command::InsertChild => self.insert_child(),
      Command::InsertSibling => self.insert_sibling(),
      Command::Delete => self.delete(),
      Command::ToggleCollapse => self.toggle_collapse(),
      Command::Save => {
        match self.save() {
          Ok(()) => {
            self.status = StatusMessage::info(format!(" Saved: {} ", self.path.display()));
          },
          Err(err) => {
            log::error!("{err}");
            self.status = StatusMessage::error(format!(" {err} "));
          },
        }
        Outcome::Applied
      },
      Command::Quit => Outcome::Quit,
    }
  }

  pub fn move_up(&mut self) -> Outcome {
    self.selected = self.selected.saturating_sub(1);
    Outcome::Applied
  }

  pub fn move_down(&mut self) -> Outcome {
    self.selected = self.selected.saturating_add(1);
    Outcome::Applied
  }

  pub fn select_first(&mut self) -> Outcome {
    self.selected = 0;
    Outcome::Applied
  }

  pub fn select_last(&mut self) -> Outcome {
    self.selected = self.visible_nodes().len().saturating_sub(1);
    Outcome::Applied
  }

  pub fn rename(&mut self) -> Outcome {
    let node = self.selected_node();
    let prefill = self.outline.text(node).unwrap_or_default().to_owned();
    self.begin_edit(node, EditKind::Rename, prefill);
    Outcome::Applied
  }

  /// Adds a placeholder child under the selection and starts editing it.
  ///
  /// Ignored when the selection already sits at [`MAX_HEADING_LEVEL`].
  pub fn insert_child(&mut self) -> Outcome {
    let parent = self.selected_node();
    if self
      .outline
      .depth(parent)
      .is_some_and(|depth| depth >= MAX_HEADING_LEVEL)
    {
      self.status = StatusMessage::warning(format!(
        " Headings stop at level {MAX_HEADING_LEVEL} "
      ));
      return Outcome::Ignored;
    }
    let child = match self.outline.append_child(parent, CHILD_PLACEHOLDER) {
      Ok(child) => child,
      Err(err) => {
        log::warn!("insert child failed: {err}");
        return Outcome::Ignored;
      },
    };
    if let Err(err) = self.outline.set_collapsed(parent, false) {
      log::warn!("failed to expand {parent}: {err}");
    }
    self.modified = true;
    self.select(child);
    self.begin_edit(child, EditKind::NewChild, String::new());
    Outcome::Applied
  }

  pub fn insert_sibling(&mut self) -> Outcome {
    let current = self.selected_node();
    if current == self.outline.root() {
      return Outcome::Ignored;
    }
    let sibling = match self.outline.insert_after(current, SIBLING_PLACEHOLDER) {
      Ok(sibling) => sibling,
      Err(err) => {
        log::warn!("insert sibling failed: {err}");
        return Outcome::Ignored;
      },
    };
    self.modified = true;
    self.select(sibling);
    self.begin_edit(sibling, EditKind::NewSibling, String::new());
    Outcome::Applied
  }

  pub fn delete(&mut self) -> Outcome {
    let node = self.selected_node();
    if node == self.outline.root() {
      return Outcome::Ignored;
    }
    match self.outline.remove(node) {
      Ok(removed) => {
        log::debug!("deleted {removed} nodes");
        self.modified = true;
        Outcome::Applied
      },
      Err(err) => {
        log::warn!("delete failed: {err}");
        Outcome::Ignored
      },
    }
  }

  pub fn toggle_collapse(&mut self) -> Outcome {
    let node = self.selected_node();
    match self.outline.toggle_collapsed(node) {
      Ok(true) => Outcome::Applied,
      Ok(false) => Outcome::Ignored,
      Err(err) => {
        log::warn!("toggle collapse failed: {err}");
        Outcome::Ignored
      },
    }
  }

  /// Stores `text` into the captured target and returns to navigation.
  ///
  /// Surrounding whitespace and any trailing closing `#` sequence are
  /// dropped, and an empty result becomes [`UNTITLED`].
  pub fn commit_edit(&mut self, text: &str) -> Outcome {
    let Mode::TextEntry(target) = std::mem::take(&mut self.mode) else {
      return Outcome::Ignored;
    };

    let text = markdown::strip_closing_sequence(text.trim());
    let text = if text.is_empty() { UNTITLED } else { text };
    match self.outline.set_text(target.node, text) {
      Ok(()) => {
        self.modified = true;
        Outcome::Applied
      },
      Err(err) => {
        log::warn!("edit target vanished: {err}");
        Outcome::Ignored
      },
    }
  }

  /// Leaves text-entry mode without touching the target.
  pub fn cancel_edit(&mut self) -> Outcome {
    if !self.is_editing() {
      return Outcome::Ignored;
    }
    self.mode = Mode::Navigation;
    Outcome::Applied
  }

  /// Writes the outline to [`Self::path`].
  ///
  /// The document is written to a temporary file beside the target and then
  /// renamed over it. The in-memory outline is never modified.
  pub fn save(&mut self) -> Result<(), SaveError> {
    let contents = markdown::to_markdown(&self.outline);
    write_atomic(&self.path, contents.as_bytes())?;
    self.modified = false;
    log::info!("saved {}", self.path.display());
    Ok(())
  }

  fn select(&mut self, node: NodeId) {
    if let Some(index) = visible_index(&self.outline, node) {
      self.selected = index;
    }
  }

  fn begin_edit(&mut self, node: NodeId, kind: EditKind, prefill: String) {
    self.mode = Mode::TextEntry(EditTarget {
      node,
      kind,
      prefill,
    });
  }
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), SaveError> {
  let io_err = |source| {
    SaveError::Io {
      path: path.to_path_buf(),
      source,
    }
  };

  let dir = match path.parent() {
    Some(dir) if !dir.as_os_str().is_empty() => dir,
    _ => Path::new("."),
  };
  let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
  file.write_all(contents).map_err(io_err)?;
  file.as_file().sync_all().map_err(io_err)?;

  if let Ok(metadata) = fs::metadata(path) {
    file
      .as_file()
      .set_permissions(metadata.permissions())
      .map_err(io_err)?;
  }

  file.persist(path).map_err(|source| {
    SaveError::Persist {
      path: path.to_path_buf(),
      source,
    }
  })?;
  Ok(())
}
