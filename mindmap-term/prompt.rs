//! Single-line draft buffer behind the "Node Text" popup.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
  text:   String,
  /// Byte offset of the caret, always on a char boundary.
  cursor: usize,
}

impl Prompt {
  /// A draft holding `text` with the caret at the end.
  pub fn new(text: impl Into<String>) -> Self {
    let text = text.into();
    let cursor = text.len();
    Self { text, cursor }
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn insert_char(&mut self, c: char) {
    self.text.insert(self.cursor, c);
    self.cursor += c.len_utf8();
  }

  pub fn delete_backward(&mut self) {
    if let Some(prev) = self.prev_boundary() {
      self.text.replace_range(prev..self.cursor, "");
      self.cursor = prev;
    }
  }

  pub fn delete_forward(&mut self) {
    if let Some(next) = self.next_boundary() {
      self.text.replace_range(self.cursor..next, "");
    }
  }

  pub fn move_left(&mut self) {
    if let Some(prev) = self.prev_boundary() {
      self.cursor = prev;
    }
  }

  pub fn move_right(&mut self) {
    if let Some(next) = self.next_boundary() {
      self.cursor = next;
    }
  }

  pub fn move_home(&mut self) {
    self.cursor = 0;
  }

  pub fn move_end(&mut self) {
    self.cursor = self.text.len();
  }

  fn prev_boundary(&self) -> Option<usize> {
    self.text[..self.cursor]
      .char_indices()
      .next_back()
      .map(|(index, _)| index)
  }

  fn next_boundary(&self) -> Option<usize> {
    self.text[self.cursor..]
      .chars()
      .next()
      .map(|c| self.cursor + c.len_utf8())
  }
}
