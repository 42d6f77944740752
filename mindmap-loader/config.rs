//! User configuration read from `config.toml`.

use std::{
  collections::BTreeMap,
  path::Path,
};

use eyre::{
  Result,
  WrapErr,
};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
  pub editor: EditorConfig,
  pub theme:  ThemeConfig,
  /// Key notation to command name, layered over the built-in keymap.
  pub keys:   BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EditorConfig {
  pub default_file: String,
}

impl Default for EditorConfig {
  fn default() -> Self {
    Self {
      default_file: "mindmap.md".to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ThemeConfig {
  pub root:             String,
  pub selected:         String,
  pub status_fg:        String,
  pub status_bg:        String,
  pub border:           String,
  pub collapsed_marker: String,
  pub guides:           bool,
}

impl Default for ThemeConfig {
  fn default() -> Self {
    Self {
      root:             "yellow".to_string(),
      selected:         "cyan".to_string(),
      status_fg:        "black".to_string(),
      status_bg:        "gray".to_string(),
      border:           "blue".to_string(),
      collapsed_marker: "[+] ".to_string(),
      guides:           true,
    }
  }
}

impl Config {
  pub fn from_toml(text: &str) -> Result<Self> {
    toml::from_str(text).wrap_err("invalid config.toml")
  }

  /// Reads `path`, falling back to defaults when the file does not exist.
  pub fn load(path: &Path) -> Result<Self> {
    let text = match std::fs::read_to_string(path) {
      Ok(text) => text,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(Self::default());
      },
      Err(err) => {
        return Err(err).wrap_err_with(|| format!("failed to read {}", path.display()));
      },
    };
    Self::from_toml(&text).wrap_err_with(|| format!("failed to load {}", path.display()))
  }

  /// Loads the file chosen by [`crate::initialize_config_file`].
  pub fn load_default() -> Result<Self> {
    Self::load(&crate::config_file())
  }
}
