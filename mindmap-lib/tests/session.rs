//! End-to-end editing sessions against the outline model.

use mindmap_lib::{
  Command,
  Editor,
  NodeId,
  Outcome,
  Outline,
  editor::{
    CHILD_PLACEHOLDER,
    LoadError,
  },
  markdown,
  status::StatusLevel,
};

#[derive(Debug, PartialEq, Eq)]
struct Shape {
  text:     String,
  children: Vec<Shape>,
}

fn shape(outline: &Outline, id: NodeId) -> Shape {
  Shape {
    text:     outline.text(id).unwrap_or_default().to_owned(),
    children: outline
      .children(id)
      .iter()
      .map(|child| shape(outline, *child))
      .collect(),
  }
}

fn child_shapes(outline: &Outline) -> Vec<Shape> {
  shape(outline, outline.root()).children
}

/// Drives the editor with one command per byte, committing every new node.
fn run_ops(editor: &mut Editor, ops: &[u8], with_collapse: bool) {
  for (step, op) in ops.iter().enumerate() {
    apply_op(editor, *op, &format!("node {step}"), with_collapse);
  }
}

/// Like [`run_ops`], but every new node is committed with its own label.
///
/// Line breaks are flattened since a heading is a single line.
fn run_labelled_ops(editor: &mut Editor, ops: &[(u8, String)]) {
  for (op, label) in ops {
    let label = label.replace(['\n', '\r'], " ");
    apply_op(editor, *op, &label, true);
  }
}

fn apply_op(editor: &mut Editor, op: u8, label: &str, with_collapse: bool) {
  match op % 8 {
    0 => {
      editor.execute(Command::MoveUp);
    },
    1 => {
      editor.execute(Command::MoveDown);
    },
    2 => {
      if editor.execute(Command::InsertChild) == Outcome::Applied {
        editor.commit_edit(label);
      }
    },
    3 => {
      if editor.execute(Command::InsertSibling) == Outcome::Applied {
        editor.commit_edit(label);
      }
    },
    4 => {
      editor.execute(Command::Delete);
    },
    5 if with_collapse => {
      editor.execute(Command::ToggleCollapse);
    },
    6 => {
      editor.execute(Command::SelectFirst);
    },
    _ => {
      editor.execute(Command::SelectLast);
    },
  }
  assert!(!editor.is_editing());
}

quickcheck::quickcheck! {
  fn round_trip_preserves_structure(ops: Vec<(u8, String)>) -> bool {
    let mut editor = Editor::new("prop.md");
    run_labelled_ops(&mut editor, &ops);

    let text = markdown::to_markdown(editor.outline());
    let reparsed = markdown::parse(&text, "anything").unwrap();
    child_shapes(&reparsed) == child_shapes(editor.outline())
  }

  fn selection_always_lands_on_visible_node(ops: Vec<u8>) -> bool {
    let mut editor = Editor::new("prop.md");
    let mut ok = true;
    for op in ops {
      run_ops(&mut editor, &[op], true);
      let selected = editor.selected_node();
      ok &= editor.visible_nodes().contains(&selected);
      ok &= editor.selected_index() < editor.visible_nodes().len();
    }
    ok
  }

  fn toggling_changes_visible_count_by_subtree_size(ops: Vec<u8>) -> bool {
    let mut editor = Editor::new("prop.md");
    run_ops(&mut editor, &ops, false);

    let mut outline = editor.outline().clone();
    let before = mindmap_lib::visible::visible_nodes(&outline).len();
    let candidates: Vec<NodeId> = mindmap_lib::visible::visible_nodes(&outline)
      .into_iter()
      .filter(|id| !outline.children(*id).is_empty())
      .collect();

    candidates.into_iter().all(|id| {
      let subtree = outline.descendant_count(id);
      outline.toggle_collapsed(id).unwrap();
      let collapsed = mindmap_lib::visible::visible_nodes(&outline).len();
      outline.toggle_collapsed(id).unwrap();
      let restored = mindmap_lib::visible::visible_nodes(&outline).len();
      collapsed + subtree == before && restored == before
    })
  }
}

#[test]
fn escaped_and_marked_up_labels_round_trip() {
  let labels = [
    "\\*x",
    "\\#x",
    "\\[draft] notes",
    "a \\*b\\*",
    "`code` and <b>html</b>",
    "tail \\",
    "# not a marker",
    "C# and F#",
  ];
  let mut editor = Editor::new("labels.md");
  for label in labels {
    editor.execute(Command::SelectFirst);
    editor.execute(Command::InsertChild);
    editor.commit_edit(label);
  }

  let text = markdown::to_markdown(editor.outline());
  let reparsed = markdown::parse(&text, "labels.md").unwrap();
  let texts: Vec<_> = child_shapes(&reparsed)
    .into_iter()
    .map(|shape| shape.text)
    .collect();
  assert_eq!(texts, labels);
  assert_eq!(markdown::to_markdown(&reparsed), text);
}

#[test]
fn child_then_sibling_from_empty_root() {
  let mut editor = Editor::new("mindmap.md");
  editor.execute(Command::InsertChild);
  editor.commit_edit("X");
  editor.execute(Command::InsertSibling);
  editor.commit_edit("Y");

  let shapes = child_shapes(editor.outline());
  assert_eq!(shapes.len(), 2);
  assert_eq!(shapes[0].text, "X");
  assert_eq!(shapes[1].text, "Y");
  assert!(shapes.iter().all(|shape| shape.children.is_empty()));
  assert_eq!(markdown::to_markdown(editor.outline()), "# X\n# Y");
}

#[test]
fn sample_document_round_trips() {
  let source = "# A\n## B\n## C\n### D\n# E\n";
  let outline = markdown::parse(source, "doc.md").unwrap();
  let expected = Shape {
    text:     "doc.md".into(),
    children: vec![
      Shape {
        text:     "A".into(),
        children: vec![
          Shape {
            text:     "B".into(),
            children: vec![],
          },
          Shape {
            text:     "C".into(),
            children: vec![Shape {
              text:     "D".into(),
              children: vec![],
            }],
          },
        ],
      },
      Shape {
        text:     "E".into(),
        children: vec![],
      },
    ],
  };
  assert_eq!(shape(&outline, outline.root()), expected);
  assert_eq!(
    markdown::to_markdown(&outline),
    source.trim_end_matches('\n')
  );
}

#[test]
fn open_missing_file_starts_fresh() {
  let dir = tempfile::tempdir().expect("create temp dir");
  let path = dir.path().join("fresh.md");

  let mut editor = Editor::open(&path).expect("open missing file");
  assert_eq!(editor.outline().node_count(), 1);
  assert_eq!(editor.outline().text(editor.root()), Some("fresh.md"));
  assert_eq!(editor.selected_node(), editor.root());
  assert!(!path.exists());
}

#[test]
fn save_then_open_restores_outline() {
  let dir = tempfile::tempdir().expect("create temp dir");
  let path = dir.path().join("plan.md");

  let mut editor = Editor::open(&path).unwrap();
  editor.execute(Command::InsertChild);
  editor.commit_edit("Goals");
  editor.execute(Command::InsertChild);
  editor.commit_edit("Ship it");
  assert!(editor.is_modified());

  assert_eq!(editor.execute(Command::Save), Outcome::Applied);
  assert!(!editor.is_modified());
  assert_eq!(editor.status().level, StatusLevel::Info);
  assert!(editor.status().text.contains("Saved"));
  assert_eq!(
    std::fs::read_to_string(&path).unwrap(),
    "# Goals\n## Ship it"
  );

  let reopened = Editor::open(&path).unwrap();
  assert_eq!(child_shapes(reopened.outline()), child_shapes(editor.outline()));
}

#[test]
fn save_overwrites_existing_document() {
  let dir = tempfile::tempdir().expect("create temp dir");
  let path = dir.path().join("notes.md");
  std::fs::write(&path, "# Old\nprose that will be dropped\n").unwrap();

  let mut editor = Editor::open(&path).unwrap();
  editor.execute(Command::SelectLast);
  editor.execute(Command::Rename);
  editor.commit_edit("New");
  editor.save().unwrap();

  assert_eq!(std::fs::read_to_string(&path).unwrap(), "# New");
}

#[test]
fn failed_save_reports_error_and_keeps_tree() {
  let dir = tempfile::tempdir().expect("create temp dir");
  let path = dir.path().join("missing-dir").join("out.md");

  let mut editor = Editor::new(&path);
  editor.execute(Command::InsertChild);
  editor.commit_edit("keep me");
  let before = child_shapes(editor.outline());

  assert!(editor.save().is_err());
  assert_eq!(editor.execute(Command::Save), Outcome::Applied);
  assert!(editor.status().is_error());
  assert!(editor.is_modified());
  assert_eq!(child_shapes(editor.outline()), before);
  assert!(!path.exists());
}

#[test]
fn open_directory_is_an_io_error() {
  let dir = tempfile::tempdir().expect("create temp dir");
  let err = Editor::open(dir.path()).unwrap_err();
  assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn insert_child_under_collapsed_node_stays_visible() {
  let mut editor = Editor::with_outline(
    "doc.md",
    markdown::parse("# A\n## B\n## C\n", "doc.md").unwrap(),
  );
  editor.execute(Command::MoveDown);
  editor.execute(Command::ToggleCollapse);
  assert_eq!(editor.visible_nodes().len(), 2);

  editor.execute(Command::InsertChild);
  let target = editor.edit_target().unwrap().node;
  editor.cancel_edit();

  assert!(editor.visible_nodes().contains(&target));
  assert_eq!(editor.outline().text(target), Some(CHILD_PLACEHOLDER));
  assert_eq!(editor.visible_nodes().len(), 5);
}
