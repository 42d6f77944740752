//! Navigation-mode key bindings, including multi-key chords like `d d`.

use std::{
  collections::{
    BTreeMap,
    HashMap,
  },
  fmt,
  str::FromStr,
};

use mindmap_lib::{
  Command,
  command_from_name,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
  Char(char),
  Enter,
  Escape,
  Backspace,
  Tab,
  Delete,
  Home,
  End,
  PageUp,
  PageDown,
  Left,
  Right,
  Up,
  Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
  pub code: Key,
  pub ctrl: bool,
  pub alt:  bool,
}

impl KeyBinding {
  pub const fn new(code: Key) -> Self {
    Self {
      code,
      ctrl: false,
      alt: false,
    }
  }

  pub const fn ctrl(code: Key) -> Self {
    Self {
      code,
      ctrl: true,
      alt: false,
    }
  }
}

impl fmt::Display for KeyBinding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.ctrl {
      f.write_str("ctrl-")?;
    }
    if self.alt {
      f.write_str("alt-")?;
    }
    match self.code {
      Key::Char(' ') => f.write_str("space"),
      Key::Char(c) => write!(f, "{c}"),
      Key::Enter => f.write_str("enter"),
      Key::Escape => f.write_str("esc"),
      Key::Backspace => f.write_str("backspace"),
      Key::Tab => f.write_str("tab"),
      Key::Delete => f.write_str("delete"),
      Key::Home => f.write_str("home"),
      Key::End => f.write_str("end"),
      Key::PageUp => f.write_str("pageup"),
      Key::PageDown => f.write_str("pagedown"),
      Key::Left => f.write_str("left"),
      Key::Right => f.write_str("right"),
      Key::Up => f.write_str("up"),
      Key::Down => f.write_str("down"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseKeyError {
  #[error("empty key notation")]
  Empty,
  #[error("invalid key modifier '{0}-'")]
  Modifier(String),
  #[error("repeated key modifier '{0}-'")]
  RepeatedModifier(String),
  #[error("unknown key '{0}'")]
  Key(String),
}

impl FromStr for KeyBinding {
  type Err = ParseKeyError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
      return Err(ParseKeyError::Empty);
    }
    if trimmed == "-" {
      return Ok(Self::new(Key::Char('-')));
    }

    let mut tokens: Vec<_> = trimmed.split('-').collect();
    let key_token = tokens.pop().unwrap_or_default();
    let mut binding = Self::new(parse_key_token(key_token)?);

    for token in tokens {
      let flag = match token.to_ascii_lowercase().as_str() {
        "c" | "ctrl" | "control" => &mut binding.ctrl,
        "a" | "alt" => &mut binding.alt,
        _ => return Err(ParseKeyError::Modifier(token.to_owned())),
      };
      if *flag {
        return Err(ParseKeyError::RepeatedModifier(token.to_owned()));
      }
      *flag = true;
    }

    Ok(binding)
  }
}

fn parse_key_token(token: &str) -> Result<Key, ParseKeyError> {
  let mut chars = token.chars();
  if let (Some(c), None) = (chars.next(), chars.next()) {
    return Ok(Key::Char(c));
  }

  match token.to_ascii_lowercase().as_str() {
    "space" => Ok(Key::Char(' ')),
    "minus" => Ok(Key::Char('-')),
    "enter" | "ret" | "return" => Ok(Key::Enter),
    "esc" | "escape" => Ok(Key::Escape),
    "backspace" | "bs" => Ok(Key::Backspace),
    "tab" => Ok(Key::Tab),
    "delete" | "del" => Ok(Key::Delete),
    "home" => Ok(Key::Home),
    "end" => Ok(Key::End),
    "pageup" | "pgup" => Ok(Key::PageUp),
    "pagedown" | "pgdown" => Ok(Key::PageDown),
    "left" => Ok(Key::Left),
    "right" => Ok(Key::Right),
    "up" => Ok(Key::Up),
    "down" => Ok(Key::Down),
    "" => Err(ParseKeyError::Empty),
    _ => Err(ParseKeyError::Key(token.to_owned())),
  }
}

/// Parses a whitespace separated chord such as `"d d"`.
pub fn parse_sequence(notation: &str) -> Result<Vec<KeyBinding>, ParseKeyError> {
  let keys = notation
    .split_whitespace()
    .map(KeyBinding::from_str)
    .collect::<Result<Vec<_>, _>>()?;
  if keys.is_empty() {
    return Err(ParseKeyError::Empty);
  }
  Ok(keys)
}

#[derive(Debug, Clone)]
pub enum KeyTrie {
  Command(Command),
  Node(HashMap<KeyBinding, KeyTrie>),
}

impl KeyTrie {
  pub fn search(&self, keys: &[KeyBinding]) -> Option<&KeyTrie> {
    let mut trie = self;
    for key in keys {
      trie = match trie {
        Self::Node(map) => map.get(key)?,
        Self::Command(_) => return None,
      };
    }
    Some(trie)
  }

  /// Binds `keys` to `command`, replacing whatever was on that path.
  fn insert(&mut self, keys: &[KeyBinding], command: Command) {
    let Some((first, rest)) = keys.split_first() else {
      *self = Self::Command(command);
      return;
    };
    if let Self::Command(_) = self {
      *self = Self::Node(HashMap::new());
    }
    if let Self::Node(map) = self {
      map
        .entry(*first)
        .or_insert_with(|| Self::Node(HashMap::new()))
        .insert(rest, command);
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymapResult {
  Matched(Command),
  /// A chord prefix was typed; more keys are needed.
  Pending,
  NotFound,
  /// The pending chord was abandoned by a key that does not continue it.
  Cancelled(Vec<KeyBinding>),
}

#[derive(Debug, Clone)]
pub struct Keymap {
  root:  KeyTrie,
  state: Vec<KeyBinding>,
}

impl Default for Keymap {
  fn default() -> Self {
    let mut keymap = Self {
      root:  KeyTrie::Node(HashMap::new()),
      state: Vec::new(),
    };
    for (keys, command) in default_bindings() {
      keymap.bind(&keys, command);
    }
    keymap
  }
}

fn default_bindings() -> Vec<(Vec<KeyBinding>, Command)> {
  let key = |code| vec![KeyBinding::new(code)];
  let ch = |c| key(Key::Char(c));
  vec![
    (ch('q'), Command::Quit),
    (key(Key::Up), Command::MoveUp),
    (ch('k'), Command::MoveUp),
    (key(Key::Down), Command::MoveDown),
    (ch('j'), Command::MoveDown),
    (ch('e'), Command::Rename),
    (key(Key::Tab), Command::InsertChild),
    (key(Key::Enter), Command::InsertSibling),
    (
      vec![
        KeyBinding::new(Key::Char('d')),
        KeyBinding::new(Key::Char('d')),
      ],
      Command::Delete,
    ),
    (ch(' '), Command::ToggleCollapse),
    (ch('s'), Command::Save),
    (key(Key::Home), Command::SelectFirst),
    (ch('g'), Command::SelectFirst),
    (key(Key::End), Command::SelectLast),
    (ch('G'), Command::SelectLast),
  ]
}

impl Keymap {
  /// The default keymap with user overrides from the `[keys]` table.
  ///
  /// Entries with unknown keys or commands are skipped with a warning.
  pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
    let mut keymap = Self::default();
    for (notation, name) in overrides {
      let keys = match parse_sequence(notation) {
        Ok(keys) => keys,
        Err(err) => {
          log::warn!("skipping key binding '{notation}': {err}");
          continue;
        },
      };
      let Some(command) = command_from_name(name) else {
        log::warn!("skipping key binding '{notation}': unknown command '{name}'");
        continue;
      };
      keymap.bind(&keys, command);
    }
    keymap
  }

  pub fn bind(&mut self, keys: &[KeyBinding], command: Command) {
    if keys.is_empty() {
      return;
    }
    self.root.insert(keys, command);
  }

  /// Keys typed so far in an unfinished chord.
  pub fn pending(&self) -> &[KeyBinding] {
    &self.state
  }

  pub fn reset(&mut self) {
    self.state.clear();
  }

  pub fn get(&mut self, key: KeyBinding) -> KeymapResult {
    if key.code == Key::Escape && !self.state.is_empty() {
      return KeymapResult::Cancelled(self.state.drain(..).collect());
    }

    self.state.push(key);
    match self.root.search(&self.state) {
      Some(KeyTrie::Command(command)) => {
        self.state.clear();
        KeymapResult::Matched(*command)
      },
      Some(KeyTrie::Node(_)) => KeymapResult::Pending,
      None if self.state.len() == 1 => {
        self.state.clear();
        KeymapResult::NotFound
      },
      None => {
        self.state.pop();
        KeymapResult::Cancelled(self.state.drain(..).collect())
      },
    }
  }
}
