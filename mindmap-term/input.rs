//! Input handling - maps crossterm key events onto key bindings.

use crossterm::event::{
  KeyCode,
  KeyEvent as CrosstermKeyEvent,
  KeyEventKind,
  KeyModifiers,
};

use crate::{
  Ctx,
  keymap::{
    Key,
    KeyBinding,
  },
};

pub fn handle_key(ctx: &mut Ctx, event: CrosstermKeyEvent) {
  if event.kind == KeyEventKind::Release {
    return;
  }
  let Some(key) = to_binding(event) else {
    return;
  };
  ctx.handle_key(key);
}

/// Shift is folded into the character itself (`G`, not `shift-g`).
fn to_binding(event: CrosstermKeyEvent) -> Option<KeyBinding> {
  let code = to_key(event.code)?;
  Some(KeyBinding {
    code,
    ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
    alt: event.modifiers.contains(KeyModifiers::ALT),
  })
}

fn to_key(code: KeyCode) -> Option<Key> {
  match code {
    KeyCode::Char(c) => Some(Key::Char(c)),
    KeyCode::Enter => Some(Key::Enter),
    KeyCode::Tab => Some(Key::Tab),
    KeyCode::Esc => Some(Key::Escape),
    KeyCode::Backspace => Some(Key::Backspace),
    KeyCode::Delete => Some(Key::Delete),
    KeyCode::Home => Some(Key::Home),
    KeyCode::End => Some(Key::End),
    KeyCode::PageUp => Some(Key::PageUp),
    KeyCode::PageDown => Some(Key::PageDown),
    KeyCode::Left => Some(Key::Left),
    KeyCode::Right => Some(Key::Right),
    KeyCode::Up => Some(Key::Up),
    KeyCode::Down => Some(Key::Down),
    _ => None,
  }
}
