// Integration tests - typing, shortcuts, persistence, and rendering together

mod common;

use common::{press, press_ctrl, test_editor, type_str};
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::backend::TestBackend;
use ratatui::style::Color;
use ratatui::Terminal;

use jot::app::persistence::{self, STORAGE_KEY};
use jot::app::Editor;
use jot::config::Config;
use jot::model::{BlockId, Document};
use jot::services::storage::{FileStore, KeyValueStore, MemoryStore};
use jot::style::StyleId;

/// Type shortcut flows end to end and check the visible text and styles.
#[test]
fn test_shortcut_typing_flow() {
    common::tracing::init_tracing_from_env();
    let mut editor = test_editor();

    type_str(&mut editor, "Title# My notes");
    press(&mut editor, KeyCode::Enter);
    type_str(&mut editor, "red** warning");

    assert_eq!(editor.document().to_plain_text(), "TitleMy notes\nredwarning");

    let heading = editor.document().block(BlockId(0));
    assert!(heading.range_has_style(5..13, StyleId::HeadingOne));
    assert!(!heading.style_at(0).contains(StyleId::HeadingOne));

    let red = editor.document().block(BlockId(1));
    assert!(red.range_has_style(3..10, StyleId::RedColor));
    assert!(!red.range_has_style(3..10, StyleId::Bold));
}

/// `Note**` + space toggles red, not bold (the disambiguation rule), while
/// a lone `*` after a non-star still bolds.
#[test]
fn test_star_family_disambiguation() {
    let mut editor = test_editor();
    type_str(&mut editor, "Note** r");
    assert!(editor
        .document()
        .block(BlockId(0))
        .style_at(4)
        .contains(StyleId::RedColor));

    let mut editor = test_editor();
    type_str(&mut editor, "Note* b");
    assert!(editor
        .document()
        .block(BlockId(0))
        .style_at(4)
        .contains(StyleId::Bold));
}

/// Save then load in a fresh "session" reproduces the same visible text and
/// styles.
#[test]
fn test_save_load_roundtrip_through_memory_store() {
    let mut editor = test_editor();
    type_str(&mut editor, "Head# line one");
    press(&mut editor, KeyCode::Enter);
    type_str(&mut editor, "mark``` boxed");
    press_ctrl(&mut editor, 's');
    assert!(!editor.is_dirty());

    // Simulate a fresh session: a new store seeded with the saved value.
    let saved = editor.store().get(STORAGE_KEY).unwrap().expect("saved value");
    let mut next_store = MemoryStore::new();
    next_store.set(STORAGE_KEY, &saved).unwrap();
    let restored = Editor::new(&Config::default(), Box::new(next_store), true);

    assert_eq!(
        restored.document().to_plain_text(),
        editor.document().to_plain_text()
    );
    let head = restored.document().block(BlockId(0));
    assert!(head.range_has_style(4..12, StyleId::HeadingOne));
    let boxed = restored.document().block(BlockId(1));
    assert!(boxed.range_has_style(4..9, StyleId::Highlighted));
}

/// The same round trip through the on-disk store.
#[test]
fn test_save_load_roundtrip_through_file_store() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = FileStore::open(dir.path()).unwrap();
        let mut editor = Editor::new(&Config::default(), Box::new(store), true);
        type_str(&mut editor, "persisted* text");
        press_ctrl(&mut editor, 's');
    }

    let store = FileStore::open(dir.path()).unwrap();
    let editor = Editor::new(&Config::default(), Box::new(store), true);
    assert_eq!(editor.document().to_plain_text(), "persistedtext");
    assert!(editor
        .document()
        .block(BlockId(0))
        .range_has_style(9..13, StyleId::Bold));
}

/// No prior saved state yields an empty, unstyled document.
#[test]
fn test_load_without_saved_state() {
    let editor = test_editor();
    assert_eq!(editor.document().to_plain_text(), "");
    assert_eq!(editor.document().block_count(), 1);
    assert!(editor.document().current_styles().is_empty());
}

/// Corrupt saved state falls back to an empty document instead of failing.
#[test]
fn test_load_with_corrupt_saved_state() {
    let mut store = MemoryStore::new();
    store.set(STORAGE_KEY, "{\"blocks\": 42}").unwrap();
    let editor = Editor::new(&Config::default(), Box::new(store), true);
    assert_eq!(editor.document().to_plain_text(), "");
}

/// `--no-restore` semantics: an editor built without restore ignores the
/// saved state.
#[test]
fn test_restore_disabled_starts_empty() {
    let mut store = MemoryStore::new();
    let mut doc = Document::new();
    doc.insert_text("old content");
    persistence::save(&doc, &mut store).unwrap();

    let editor = Editor::new(&Config::default(), Box::new(store), false);
    assert_eq!(editor.document().to_plain_text(), "");
}

/// A shortcut undoes as one unit even when driven through key events.
#[test]
fn test_undo_restores_trigger_and_style_together() {
    let mut editor = test_editor();
    type_str(&mut editor, "x``` ");
    assert_eq!(editor.document().to_plain_text(), "x");
    assert!(editor.document().current_styles().contains(StyleId::Highlighted));

    press_ctrl(&mut editor, 'z');
    assert_eq!(editor.document().to_plain_text(), "x```");
    assert!(!editor.document().current_styles().contains(StyleId::Highlighted));
}

/// Render into a test backend and verify the styled text and the status bar
/// reach the screen.
#[test]
fn test_rendering_applies_style_map() {
    let mut editor = test_editor();
    type_str(&mut editor, "red** hot");

    let backend = TestBackend::new(40, 6);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| editor.render(frame)).unwrap();

    let buffer = terminal.backend().buffer().clone();
    let cell = |x: usize, y: usize| &buffer.content[y * 40 + x];
    let row_text = |y: usize| -> String { (0..40).map(|x| cell(x, y).symbol()).collect() };

    assert!(row_text(0).starts_with("redhot"));

    // "hot" (cols 3..6) renders red; "red" (cols 0..3) does not.
    assert_eq!(cell(3, 0).style().fg, Some(Color::Red));
    assert_eq!(cell(0, 0).style().fg, Some(Color::Reset));

    let status = row_text(5);
    assert!(status.contains("[ Save ]"));
    assert!(status.contains("RED_COLOR"));
}

/// Clicking the status-bar save button persists the document.
#[test]
fn test_save_button_click() {
    let mut editor = test_editor();
    type_str(&mut editor, "click to save");

    let backend = TestBackend::new(40, 6);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| editor.render(frame)).unwrap();

    // The button occupies the right edge of the status row.
    let changed = editor.handle_mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 34,
        row: 5,
        modifiers: KeyModifiers::empty(),
    });
    assert!(changed);
    assert!(!editor.is_dirty());
    assert!(editor.store().get(STORAGE_KEY).unwrap().is_some());
}

/// Clicking in the text area moves the cursor there.
#[test]
fn test_click_positions_cursor() {
    let mut editor = test_editor();
    type_str(&mut editor, "abcdef");
    press(&mut editor, KeyCode::Enter);
    type_str(&mut editor, "second");

    let backend = TestBackend::new(40, 6);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| editor.render(frame)).unwrap();

    editor.handle_mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 3,
        row: 0,
        modifiers: KeyModifiers::empty(),
    });
    let sel = editor.document().selection();
    assert_eq!(sel.block, BlockId(0));
    assert_eq!(sel.focus, 3);
    assert!(sel.collapsed());
}

/// Pasted text lands as one undo unit and splits into blocks at newlines.
#[test]
fn test_paste_is_one_transaction() {
    let mut editor = test_editor();
    editor.paste_text("one\ntwo");
    assert_eq!(editor.document().block_count(), 2);

    press_ctrl(&mut editor, 'z');
    assert_eq!(editor.document().to_plain_text(), "");
}
