//! Navigation-mode command set.
//!
//! Text-entry mode has exactly two transitions of its own (commit and
//! cancel), which live on [`crate::editor::Editor`] because commit carries
//! the typed text.

use std::{
  fmt,
  str::FromStr,
};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
  MoveUp,
  MoveDown,
  SelectFirst,
  SelectLast,
  Rename,
  InsertChild,
  InsertSibling,
  Delete,
  ToggleCollapse,
  Save,
  Quit,
}

impl Command {
  pub const ALL: &'static [Command] = &[
    Self::MoveUp,
    Self::MoveDown,
    Self::SelectFirst,
    Self::SelectLast,
    Self::Rename,
    Self::InsertChild,
    Self::InsertSibling,
    Self::Delete,
    Self::ToggleCollapse,
    Self::Save,
    Self::Quit,
  ];

  pub const fn name(self) -> &'static str {
    match self {
      Self::MoveUp => "move_up",
      Self::MoveDown => "move_down",
      Self::SelectFirst => "select_first",
      Self::SelectLast => "select_last",
      Self::Rename => "rename",
      Self::InsertChild => "insert_child",
      Self::InsertSibling => "insert_sibling",
      Self::Delete => "delete",
      Self::ToggleCollapse => "toggle_collapse",
      Self::Save => "save",
      Self::Quit => "quit",
    }
  }

  pub const fn doc(self) -> &'static str {
    match self {
      Self::MoveUp => "Select the previous visible node",
      Self::MoveDown => "Select the next visible node",
      Self::SelectFirst => "Select the root",
      Self::SelectLast => "Select the last visible node",
      Self::Rename => "Edit the text of the selected node",
      Self::InsertChild => "Add a child under the selected node and edit it",
      Self::InsertSibling => "Add a sibling after the selected node and edit it",
      Self::Delete => "Delete the selected node and everything below it",
      Self::ToggleCollapse => "Collapse or expand the selected node",
      Self::Save => "Write the outline to disk",
      Self::Quit => "Leave the editor",
    }
  }
}

pub fn command_from_name(name: &str) -> Option<Command> {
  Command::ALL
    .iter()
    .copied()
    .find(|command| command.name() == name)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command '{0}'")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
  type Err = UnknownCommand;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    command_from_name(s).ok_or_else(|| UnknownCommand(s.to_owned()))
  }
}

impl fmt::Display for Command {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
