//! Application context (state).

use mindmap_lib::{
  Command,
  Editor,
  Outcome,
};
use mindmap_loader::Config;

use crate::{
  keymap::{
    Key,
    KeyBinding,
    Keymap,
    KeymapResult,
  },
  prompt::Prompt,
  theme::Theme,
};

pub struct Ctx {
  pub editor:       Editor,
  pub keymap:       Keymap,
  pub theme:        Theme,
  /// Draft text while the editor is in text-entry mode.
  pub prompt:       Prompt,
  /// First visible row of the tree view.
  pub scroll:       usize,
  pub should_quit:  bool,
  pub needs_render: bool,
}

impl Ctx {
  pub fn new(editor: Editor, config: &Config) -> Self {
    Self {
      editor,
      keymap: Keymap::with_overrides(&config.keys),
      theme: Theme::from_config(&config.theme),
      prompt: Prompt::default(),
      scroll: 0,
      should_quit: false,
      needs_render: true,
    }
  }

  pub fn handle_key(&mut self, key: KeyBinding) {
    if self.editor.is_editing() {
      self.handle_text_entry(key);
    } else {
      self.handle_navigation(key);
    }
    self.needs_render = true;
  }

  fn handle_navigation(&mut self, key: KeyBinding) {
    match self.keymap.get(key) {
      KeymapResult::Matched(command) => self.execute(command),
      KeymapResult::Pending => {},
      KeymapResult::Cancelled(keys) => {
        log::trace!("cancelled pending keys {keys:?}");
      },
      KeymapResult::NotFound => {
        log::trace!("no binding for {key}");
      },
    }
  }

  pub fn execute(&mut self, command: Command) {
    match self.editor.execute(command) {
      Outcome::Quit => self.should_quit = true,
      Outcome::Applied | Outcome::Ignored => {},
    }
    if let Some(target) = self.editor.edit_target() {
      self.prompt = Prompt::new(target.prefill.clone());
    }
  }

  fn handle_text_entry(&mut self, key: KeyBinding) {
    if key.ctrl || key.alt {
      return;
    }
    match key.code {
      Key::Enter => {
        let text = std::mem::take(&mut self.prompt);
        self.editor.commit_edit(text.text());
      },
      Key::Escape => {
        self.prompt = Prompt::default();
        self.editor.cancel_edit();
      },
      Key::Char(c) => self.prompt.insert_char(c),
      Key::Backspace => self.prompt.delete_backward(),
      Key::Delete => self.prompt.delete_forward(),
      Key::Left => self.prompt.move_left(),
      Key::Right => self.prompt.move_right(),
      Key::Home => self.prompt.move_home(),
      Key::End => self.prompt.move_end(),
      Key::Tab | Key::Up | Key::Down | Key::PageUp | Key::PageDown => {},
    }
  }
}
