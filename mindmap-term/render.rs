//! Rendering - draws the tree view, the status bar and the edit popup.

use eyre::Result;
use mindmap_lib::{
  Mode,
  status::StatusLevel,
  visible::VisibleRow,
};
use ratatui::{
  Frame,
  layout::{
    Constraint,
    Layout,
    Rect,
  },
  text::{
    Line,
    Span,
  },
  widgets::{
    Block,
    Clear,
    Paragraph,
  },
};
use unicode_width::UnicodeWidthChar;

use crate::{
  Ctx,
  terminal::Terminal,
  theme::Theme,
};

const POPUP_TITLE: &str = " Node Text ";

pub fn render(ctx: &mut Ctx, terminal: &mut Terminal) -> Result<()> {
  terminal.draw(|frame| draw(frame, ctx))
}

pub fn draw(frame: &mut Frame, ctx: &mut Ctx) {
  let [tree_area, status_area] =
    Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

  draw_tree(frame, ctx, tree_area);
  draw_status(frame, ctx, status_area);
  if ctx.editor.is_editing() {
    draw_prompt(frame, ctx, tree_area);
  }
}

/// First row to show so that `selected` lies inside a window of `height`.
pub fn scroll_offset(scroll: usize, selected: usize, height: usize) -> usize {
  if height == 0 {
    return selected;
  }
  if selected < scroll {
    selected
  } else if selected >= scroll + height {
    selected + 1 - height
  } else {
    scroll
  }
}

fn draw_tree(frame: &mut Frame, ctx: &mut Ctx, area: Rect) {
  let selected = ctx.editor.selected_node();
  let rows = ctx.editor.visible_rows();
  let selected_index = rows
    .iter()
    .position(|row| row.id == selected)
    .unwrap_or_default();

  ctx.scroll = scroll_offset(ctx.scroll, selected_index, area.height as usize);
  let outline = ctx.editor.outline();

  let lines: Vec<Line> = rows
    .iter()
    .skip(ctx.scroll)
    .take(area.height as usize)
    .map(|row| {
      let text = outline.text(row.id).unwrap_or_default();
      let line = tree_line(&ctx.theme, row, text);
      if row.id == selected {
        line.patch_style(ctx.theme.selected)
      } else {
        line
      }
    })
    .collect();

  frame.render_widget(Paragraph::new(lines), area);
}

fn tree_line<'a>(theme: &Theme, row: &VisibleRow, text: &'a str) -> Line<'a> {
  if row.depth == 0 {
    return Line::from(Span::styled(text, theme.root));
  }

  let mut prefix = String::new();
  for guide in &row.guides {
    prefix.push_str(match (theme.guides, *guide) {
      (true, true) => "│   ",
      _ => "    ",
    });
  }
  prefix.push_str(match (theme.guides, row.is_last) {
    (false, _) => "    ",
    (true, true) => "└── ",
    (true, false) => "├── ",
  });
  if row.collapsed {
    prefix.push_str(&theme.collapsed_marker);
  }

  Line::from(vec![
    Span::raw(prefix),
    Span::styled(text, theme.node),
  ])
}

fn draw_status(frame: &mut Frame, ctx: &Ctx, area: Rect) {
  let status = ctx.editor.status();
  let style = match status.level {
    StatusLevel::Info => ctx.theme.status,
    StatusLevel::Warning => ctx.theme.status_warning,
    StatusLevel::Error => ctx.theme.status_error,
  };

  let mode = match ctx.editor.mode() {
    Mode::Navigation => " NAV ",
    Mode::TextEntry(_) => " EDIT ",
  };
  let mut spans = vec![
    Span::styled(mode, ctx.theme.status.patch(ctx.theme.root)),
    Span::raw(status.text.as_str()),
  ];
  if ctx.editor.is_modified() {
    spans.push(Span::raw("[modified] "));
  }
  let pending = ctx.keymap.pending();
  if !pending.is_empty() {
    let keys: Vec<String> = pending.iter().map(ToString::to_string).collect();
    spans.push(Span::raw(format!("{} ", keys.join(" "))));
  }

  frame.render_widget(Paragraph::new(Line::from(spans)).style(style), area);
}

fn draw_prompt(frame: &mut Frame, ctx: &Ctx, area: Rect) {
  let popup = centered(area, 60, 3);
  let block = Block::bordered()
    .title(POPUP_TITLE)
    .border_style(ctx.theme.border);
  let inner = block.inner(popup);

  let (visible, column) = visible_draft(ctx.prompt.text(), ctx.prompt.cursor(), inner.width);

  frame.render_widget(Clear, popup);
  frame.render_widget(Paragraph::new(visible).block(block), popup);
  if inner.width > 0 && inner.height > 0 {
    frame.set_cursor_position((inner.x + column, inner.y));
  }
}

/// The tail of `text` that keeps the caret inside `width` columns, and the
/// caret column within it.
fn visible_draft(text: &str, cursor: usize, width: u16) -> (&str, u16) {
  let width = usize::from(width.max(1));
  let mut start = 0;
  let mut column: usize = text[..cursor]
    .chars()
    .map(|c| c.width().unwrap_or_default())
    .sum();

  for c in text[..cursor].chars() {
    if column < width {
      break;
    }
    column -= c.width().unwrap_or_default();
    start += c.len_utf8();
  }

  let column = u16::try_from(column).unwrap_or(u16::MAX);
  (&text[start..], column)
}

/// A `height` tall rect spanning `percent` of `area`'s width, centred.
fn centered(area: Rect, percent: u16, height: u16) -> Rect {
  let [_, middle, _] = Layout::vertical([
    Constraint::Fill(1),
    Constraint::Length(height),
    Constraint::Fill(1),
  ])
  .areas(area);
  let [_, popup, _] = Layout::horizontal([
    Constraint::Percentage((100 - percent) / 2),
    Constraint::Percentage(percent),
    Constraint::Percentage((100 - percent) / 2),
  ])
  .areas(middle);
  popup
}
