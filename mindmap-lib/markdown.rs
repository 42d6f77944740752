//! Conversion between markdown headings and an [`Outline`].
//!
//! Only headings take part: every heading becomes a node nested under the
//! closest preceding heading with a smaller level. Paragraphs, lists, code
//! blocks and the rest of the document are ignored on import and never
//! produced on export.

use std::ops::Range;

use pulldown_cmark::{
  Event,
  HeadingLevel,
  Options,
  Parser,
  Tag,
  TagEnd,
};
use thiserror::Error;

use crate::outline::{
  NodeId,
  Outline,
};

pub const HEADING_MARKER: char = '#';
/// Deepest heading markdown can express; deeper nodes would not re-import.
pub const MAX_HEADING_LEVEL: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  #[error("malformed document: heading at byte {offset} has no readable text")]
  MalformedDocument { offset: usize },
}

pub type Result<T> = std::result::Result<T, ParseError>;

fn heading_level_number(level: HeadingLevel) -> u8 {
  match level {
    HeadingLevel::H1 => 1,
    HeadingLevel::H2 => 2,
    HeadingLevel::H3 => 3,
    HeadingLevel::H4 => 4,
    HeadingLevel::H5 => 5,
    HeadingLevel::H6 => 6,
  }
}

#[derive(Debug)]
struct OpenHeading {
  level:   u8,
  /// Source span of the whole heading, markers included.
  span:    Range<usize>,
  /// Furthest byte reached by any inline event inside the heading.
  content: Option<usize>,
}

impl OpenHeading {
  fn extend(&mut self, range: Range<usize>) {
    self.content = Some(self.content.map_or(range.end, |end| end.max(range.end)));
  }
}

/// Builds an outline from the headings of `text`.
///
/// The root is labelled `root_name` and every level-1 heading becomes one of
/// its children. Skipped levels nest directly under the nearest shallower
/// heading.
pub fn parse(text: &str, root_name: &str) -> Result<Outline> {
  let mut outline = Outline::new(root_name);
  let root = outline.root();
  let mut stack: Vec<(u8, NodeId)> = vec![(0, root)];
  let mut open: Option<OpenHeading> = None;

  for (event, range) in Parser::new_ext(text, Options::empty()).into_offset_iter() {
    match event {
      Event::Start(Tag::Heading { level, .. }) => {
        if open.is_some() {
          return Err(ParseError::MalformedDocument {
            offset: range.start,
          });
        }
        open = Some(OpenHeading {
          level:   heading_level_number(level),
          span:    range,
          content: None,
        });
      },
      Event::End(TagEnd::Heading(level)) => {
        let heading = open
          .take()
          .filter(|heading| heading.level == heading_level_number(level))
          .ok_or(ParseError::MalformedDocument {
            offset: range.start,
          })?;
        let label = heading_text(text, &heading)?;

        while stack.last().is_some_and(|(top, _)| *top >= heading.level) {
          stack.pop();
        }
        let parent = stack.last().map(|(_, id)| *id).unwrap_or(root);
        let node = outline
          .append_child(parent, label)
          .map_err(|_| ParseError::MalformedDocument {
            offset: heading.span.start,
          })?;
        stack.push((heading.level, node));
      },
      _ => {
        if let Some(heading) = open.as_mut() {
          heading.extend(range);
        }
      },
    }
  }

  if let Some(heading) = open {
    return Err(ParseError::MalformedDocument {
      offset: heading.span.start,
    });
  }

  log::debug!(
    "parsed {} headings into outline '{root_name}'",
    outline.node_count() - 1
  );
  Ok(outline)
}

/// Raw inline source of a heading, with setext line breaks folded to spaces.
///
/// The label runs from the end of the ATX opening sequence (or the start of
/// the first setext line) to the end of the last inline event.
fn heading_text(source: &str, heading: &OpenHeading) -> Result<String> {
  let Some(end) = heading.content else {
    return Ok(String::new());
  };
  let malformed = || {
    ParseError::MalformedDocument {
      offset: heading.span.start,
    }
  };
  let start = content_start(source, &heading.span).ok_or_else(malformed)?;
  let raw = source.get(start..end.max(start)).ok_or_else(malformed)?;

  Ok(
    raw
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .collect::<Vec<_>>()
      .join(" "),
  )
}

/// Byte offset where the inline content of the heading at `span` begins.
fn content_start(source: &str, span: &Range<usize>) -> Option<usize> {
  let line = source.get(span.clone())?;
  let rest = line.trim_start_matches([' ', '\t']);
  let indent = line.len() - rest.len();

  let after = rest.trim_start_matches(HEADING_MARKER);
  let markers = rest.len() - after.len();
  let is_atx = (1..=MAX_HEADING_LEVEL).contains(&markers)
    && (after.is_empty() || after.starts_with([' ', '\t', '\n', '\r']));
  if !is_atx {
    return Some(span.start + indent);
  }

  let gap = after.len() - after.trim_start_matches([' ', '\t']).len();
  Some(span.start + indent + markers + gap)
}

/// `text` without any trailing closing sequence (` ##`) an ATX heading
/// would drop on import, repeated until none is left.
pub fn strip_closing_sequence(text: &str) -> &str {
  let mut text = text.trim_end();
  loop {
    let without = text.trim_end_matches(HEADING_MARKER);
    if without.len() == text.len() {
      return text;
    }
    if !(without.is_empty() || without.ends_with(char::is_whitespace)) {
      return text;
    }
    text = without.trim_end();
  }
}

/// One heading line per non-root node, in pre-order.
///
/// A node at distance `d` from the root is written with `d` markers.
pub fn serialize(outline: &Outline) -> Vec<String> {
  let mut lines = Vec::with_capacity(outline.node_count().saturating_sub(1));
  let mut stack: Vec<(NodeId, usize)> = outline
    .children(outline.root())
    .iter()
    .rev()
    .map(|child| (*child, 1))
    .collect();

  while let Some((id, depth)) = stack.pop() {
    let text = outline.text(id).unwrap_or_default();
    let mut line = String::with_capacity(depth + 1 + text.len());
    line.extend(std::iter::repeat_n(HEADING_MARKER, depth));
    line.push(' ');
    line.push_str(text);
    lines.push(line);

    stack.extend(
      outline
        .children(id)
        .iter()
        .rev()
        .map(|child| (*child, depth + 1)),
    );
  }

  lines
}

/// Serialized document text: the heading lines joined by single newlines.
pub fn to_markdown(outline: &Outline) -> String {
  serialize(outline).join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn labels(outline: &Outline, id: NodeId) -> Vec<&str> {
    outline
      .children(id)
      .iter()
      .filter_map(|child| outline.text(*child))
      .collect()
  }

  #[test]
  fn nested_headings_build_tree() {
    let outline = parse("# A\n## B\n## C\n### D\n# E\n", "doc.md").unwrap();
    let root = outline.root();
    assert_eq!(outline.text(root), Some("doc.md"));
    assert_eq!(labels(&outline, root), ["A", "E"]);

    let a = outline.children(root)[0];
    assert_eq!(labels(&outline, a), ["B", "C"]);
    let c = outline.children(a)[1];
    assert_eq!(labels(&outline, c), ["D"]);
    assert_eq!(outline.validate(), Ok(()));
  }

  #[test]
  fn export_reproduces_heading_lines() {
    let outline = parse("#   A\n##  B\n## C\n###    D\n# E\n", "doc.md").unwrap();
    assert_eq!(serialize(&outline), ["# A", "## B", "## C", "### D", "# E"]);
    assert_eq!(to_markdown(&outline), "# A\n## B\n## C\n### D\n# E");
  }

  #[test]
  fn document_without_headings_yields_bare_root() {
    let outline = parse("just a paragraph\n\n- a list\n", "doc.md").unwrap();
    assert_eq!(outline.node_count(), 1);
    assert!(serialize(&outline).is_empty());
    assert_eq!(to_markdown(&outline), "");
  }

  #[test]
  fn level_jump_nests_under_nearest_shallower_heading() {
    let outline = parse("# A\n### deep\n## mid\n", "doc.md").unwrap();
    let a = outline.children(outline.root())[0];
    assert_eq!(labels(&outline, a), ["deep", "mid"]);
    assert_eq!(serialize(&outline), ["# A", "## deep", "## mid"]);
  }

  #[test]
  fn document_starting_below_level_one_attaches_to_root() {
    let outline = parse("## B\n# A\n", "doc.md").unwrap();
    assert_eq!(labels(&outline, outline.root()), ["B", "A"]);
  }

  #[test]
  fn non_heading_content_is_ignored() {
    let text = "# A\nsome text\n\n```\n# not a heading\n```\n\n- item\n## B\n";
    let outline = parse(text, "doc.md").unwrap();
    assert_eq!(serialize(&outline), ["# A", "## B"]);
  }

  #[test]
  fn inline_markup_is_kept_verbatim() {
    let outline = parse("# Hello *world* and `code`\n## closed ##\n", "doc.md").unwrap();
    assert_eq!(
      serialize(&outline),
      ["# Hello *world* and `code`", "## closed"]
    );
  }

  #[test]
  fn leading_escape_is_kept() {
    let outline = parse("# \\*x\n", "doc.md").unwrap();
    assert_eq!(labels(&outline, outline.root()), ["\\*x"]);
    assert_eq!(to_markdown(&outline), "# \\*x");

    let outline = parse("# \\*important\\*\n", "doc.md").unwrap();
    assert_eq!(to_markdown(&outline), "# \\*important\\*");
  }

  #[test]
  fn escaped_bracket_survives_renesting() {
    let outline = parse("## \\[draft] notes\n", "doc.md").unwrap();
    assert_eq!(labels(&outline, outline.root()), ["\\[draft] notes"]);
    assert_eq!(to_markdown(&outline), "# \\[draft] notes");
  }

  #[test]
  fn inner_escapes_are_kept() {
    let outline = parse("# a \\*b\\*\n### \\#tag \\#\n", "doc.md").unwrap();
    assert_eq!(serialize(&outline), ["# a \\*b\\*", "## \\#tag \\#"]);
  }

  #[test]
  fn indented_and_setext_escapes_are_kept() {
    let outline = parse("   #  \\_x_\n\n\\- item\n===\n", "doc.md").unwrap();
    assert_eq!(serialize(&outline), ["# \\_x_", "# \\- item"]);
  }

  #[test]
  fn closing_sequences_are_stripped() {
    assert_eq!(strip_closing_sequence("A #"), "A");
    assert_eq!(strip_closing_sequence("A ## #  "), "A");
    assert_eq!(strip_closing_sequence("###"), "");
    assert_eq!(strip_closing_sequence("A\u{c}#"), "A");
    assert_eq!(strip_closing_sequence("A#"), "A#");
    assert_eq!(strip_closing_sequence("A \\#"), "A \\#");
    assert_eq!(strip_closing_sequence("plain"), "plain");
  }

  #[test]
  fn setext_headings_are_headings() {
    let outline = parse("Title\n=====\n\nSub\npart\n---\n", "doc.md").unwrap();
    assert_eq!(serialize(&outline), ["# Title", "## Sub part"]);
  }

  #[test]
  fn empty_heading_yields_empty_label() {
    let outline = parse("#\n## child\n", "doc.md").unwrap();
    let root = outline.root();
    assert_eq!(labels(&outline, root), [""]);
    assert_eq!(serialize(&outline), ["# ", "## child"]);
  }

  #[test]
  fn export_round_trips_structure() {
    let mut outline = Outline::new("root");
    let root = outline.root();
    let x = outline.append_child(root, "x").unwrap();
    let y = outline.append_child(x, "y").unwrap();
    outline.append_child(y, "z").unwrap();
    outline.append_child(root, "w").unwrap();

    let reparsed = parse(&to_markdown(&outline), "other").unwrap();
    assert_eq!(serialize(&reparsed), serialize(&outline));
    assert_eq!(reparsed.text(reparsed.root()), Some("other"));
  }

  #[test]
  fn collapsed_nodes_are_still_exported() {
    let mut outline = parse("# A\n## B\n", "doc.md").unwrap();
    let a = outline.children(outline.root())[0];
    outline.set_collapsed(a, true).unwrap();
    assert_eq!(serialize(&outline), ["# A", "## B"]);
  }
}
