pub mod config;

use std::{
  borrow::Cow,
  path::{
    Path,
    PathBuf,
  },
  sync::OnceLock,
};

use etcetera::base_strategy::{
  BaseStrategy,
  choose_base_strategy,
};

pub use config::{
  Config,
  EditorConfig,
  ThemeConfig,
};

const APP_DIR: &str = "mindmap";

static CONFIG_FILE: OnceLock<PathBuf> = OnceLock::new();

static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

pub fn initialize_config_file(specified_file: Option<PathBuf>) {
  let config_file = specified_file.unwrap_or_else(default_config_file);
  ensure_parent_dir(&config_file);
  CONFIG_FILE.set(config_file).ok();
}

pub fn initialize_log_file(specified_file: Option<PathBuf>) {
  let log_file = specified_file.unwrap_or_else(default_log_file);
  ensure_parent_dir(&log_file);
  LOG_FILE.set(log_file).ok();
}

/// `MINDMAP_CONFIG_DIR` if set, otherwise the platform config directory.
///
/// Falls back to the working directory when no home directory can be found.
pub fn config_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("MINDMAP_CONFIG_DIR") {
    return expand_tilde(Path::new(&dir)).into_owned();
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.config_dir().join(APP_DIR),
    Err(err) => {
      log::warn!("unable to find the config directory: {err}");
      PathBuf::from(".")
    },
  }
}

/// `MINDMAP_CACHE_DIR` if set, otherwise the platform cache directory.
pub fn cache_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("MINDMAP_CACHE_DIR") {
    return expand_tilde(Path::new(&dir)).into_owned();
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.cache_dir().join(APP_DIR),
    Err(err) => {
      log::warn!("unable to find the cache directory: {err}");
      PathBuf::from(".")
    },
  }
}

pub fn config_file() -> PathBuf {
  CONFIG_FILE.get_or_init(default_config_file).clone()
}

pub fn log_file() -> PathBuf {
  LOG_FILE
    .get_or_init(|| {
      let path = default_log_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

pub fn default_config_file() -> PathBuf {
  config_dir().join("config.toml")
}

pub fn default_log_file() -> PathBuf {
  cache_dir().join("mindmap.log")
}

fn ensure_parent_dir(path: &Path) {
  if let Some(parent) = path.parent() {
    if !parent.as_os_str().is_empty() && !parent.exists() {
      std::fs::create_dir_all(parent).ok();
    }
  }
}

fn expand_tilde(path: &Path) -> Cow<'_, Path> {
  let Ok(rest) = path.strip_prefix("~") else {
    return Cow::Borrowed(path);
  };
  match choose_base_strategy() {
    Ok(strategy) => Cow::Owned(strategy.home_dir().join(rest)),
    Err(_) => Cow::Borrowed(path),
  }
}
