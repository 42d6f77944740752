//! Colours and markers for the tree view, built from the `[theme]` table.

use std::str::FromStr;

use mindmap_loader::ThemeConfig;
use ratatui::style::{
  Color,
  Modifier,
  Style,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
  pub root:             Style,
  pub node:             Style,
  pub selected:         Style,
  pub status:           Style,
  pub status_error:     Style,
  pub status_warning:   Style,
  pub border:           Style,
  pub collapsed_marker: String,
  pub guides:           bool,
}

impl Default for Theme {
  fn default() -> Self {
    Self::from_config(&ThemeConfig::default())
  }
}

impl Theme {
  pub fn from_config(config: &ThemeConfig) -> Self {
    let defaults = ThemeConfig::default();
    let color = |value: &str, fallback: &str| {
      parse_color(value).unwrap_or_else(|| {
        log::warn!("unknown colour '{value}', using '{fallback}'");
        parse_color(fallback).unwrap_or(Color::Reset)
      })
    };

    let root = color(&config.root, &defaults.root);
    let selected = color(&config.selected, &defaults.selected);
    let status_fg = color(&config.status_fg, &defaults.status_fg);
    let status_bg = color(&config.status_bg, &defaults.status_bg);
    let border = color(&config.border, &defaults.border);

    Self {
      root:             Style::default().fg(root).add_modifier(Modifier::BOLD),
      node:             Style::default(),
      selected:         Style::default()
        .fg(selected)
        .add_modifier(Modifier::REVERSED),
      status:           Style::default().fg(status_fg).bg(status_bg),
      status_error:     Style::default().fg(Color::White).bg(Color::Red),
      status_warning:   Style::default().fg(Color::Black).bg(Color::Yellow),
      border:           Style::default().fg(border),
      collapsed_marker: config.collapsed_marker.clone(),
      guides:           config.guides,
    }
  }
}

fn parse_color(name: &str) -> Option<Color> {
  Color::from_str(name.trim()).ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_theme_uses_named_colours() {
    let theme = Theme::default();
    assert_eq!(theme.root.fg, Some(Color::Yellow));
    assert!(theme.root.add_modifier.contains(Modifier::BOLD));
    assert_eq!(theme.selected.fg, Some(Color::Cyan));
    assert_eq!(theme.status.bg, Some(Color::Gray));
    assert_eq!(theme.collapsed_marker, "[+] ");
    assert!(theme.guides);
  }

  #[test]
  fn unknown_colour_falls_back() {
    let config = ThemeConfig {
      root: "not-a-colour".into(),
      border: "#ff0000".into(),
      ..ThemeConfig::default()
    };
    let theme = Theme::from_config(&config);
    assert_eq!(theme.root.fg, Some(Color::Yellow));
    assert_eq!(theme.border.fg, Some(Color::Rgb(0xff, 0, 0)));
  }
}
