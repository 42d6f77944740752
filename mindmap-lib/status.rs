//! Single-line status text shown beneath the tree.

pub const DEFAULT_HINT: &str =
  " Arrows: Nav | e: Edit | Tab: Add Child | Enter: Add Sibling | s: Save ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
  Info,
  Warning,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
  pub level: StatusLevel,
  pub text:  String,
}

impl Default for StatusMessage {
  fn default() -> Self {
    Self::info(DEFAULT_HINT)
  }
}

impl StatusMessage {
  pub fn new(level: StatusLevel, text: impl Into<String>) -> Self {
    Self {
      level,
      text: text.into(),
    }
  }

  pub fn info(text: impl Into<String>) -> Self {
    Self::new(StatusLevel::Info, text)
  }

  pub fn warning(text: impl Into<String>) -> Self {
    Self::new(StatusLevel::Warning, text)
  }

  pub fn error(text: impl Into<String>) -> Self {
    Self::new(StatusLevel::Error, text)
  }

  pub fn is_error(&self) -> bool {
    self.level == StatusLevel::Error
  }
}
