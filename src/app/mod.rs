//! The editor: document state, undo history, and event dispatch.
//!
//! All handling is synchronous on the UI thread: one event is processed to
//! completion before the next is read, so the document has exactly one
//! writer at any time. Edits never mutate in place from the editor's point
//! of view; each transaction snapshots the document first, and the snapshot
//! stack is the undo history.

pub mod persistence;

use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

use crate::config::Config;
use crate::input::{apply_shortcut, InputDisposition};
use crate::model::{BlockId, Document, Selection};
use crate::services::storage::KeyValueStore;
use crate::style::StyleMap;

pub struct Editor {
    pub(crate) doc: Document,
    undo_stack: Vec<Document>,
    redo_stack: Vec<Document>,
    undo_depth: usize,
    store: Box<dyn KeyValueStore>,
    pub(crate) style_map: StyleMap,
    pub(crate) status_message: String,
    pub(crate) dirty: bool,
    should_quit: bool,
    /// (first visible block, chars scrolled off the left edge)
    pub(crate) scroll: (usize, usize),
    /// Layout from the last render, for mouse hit-testing.
    pub(crate) text_area: Rect,
    pub(crate) save_button_area: Rect,
}

impl Editor {
    /// Create an editor over the given store. When `restore` is set, the
    /// previously saved document is loaded; otherwise the editor starts
    /// empty either way (an absent or malformed saved state is not an error).
    pub fn new(config: &Config, store: Box<dyn KeyValueStore>, restore: bool) -> Self {
        let doc = if restore {
            persistence::load_or_default(store.as_ref())
        } else {
            Document::new()
        };
        Self {
            doc,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            undo_depth: config.editor.undo_depth,
            store,
            style_map: config.style_map(),
            status_message: String::new(),
            dirty: false,
            should_quit: false,
            scroll: (0, 0),
            text_area: Rect::default(),
            save_button_area: Rect::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Handle one keyboard event.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let extend = modifiers.contains(KeyModifiers::SHIFT);
        match (code, modifiers) {
            (KeyCode::Char('q'), KeyModifiers::CONTROL) => self.should_quit = true,
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => self.save(),
            (KeyCode::Char('z'), KeyModifiers::CONTROL) => self.undo(),
            (KeyCode::Char('y'), KeyModifiers::CONTROL) => self.redo(),
            (KeyCode::Char(c), m) if m == KeyModifiers::NONE || m == KeyModifiers::SHIFT => {
                self.type_char(c)
            }
            (KeyCode::Enter, _) => self.edit(|doc| doc.split_block()),
            (KeyCode::Backspace, _) => self.edit(|doc| doc.backspace()),
            (KeyCode::Delete, _) => self.edit(|doc| doc.delete_forward()),
            (KeyCode::Left, _) => self.doc.move_left(extend),
            (KeyCode::Right, _) => self.doc.move_right(extend),
            (KeyCode::Up, _) => self.doc.move_up(extend),
            (KeyCode::Down, _) => self.doc.move_down(extend),
            (KeyCode::Home, _) => self.doc.move_line_start(extend),
            (KeyCode::End, _) => self.doc.move_line_end(extend),
            _ => {}
        }
    }

    /// Handle one mouse event. Returns true if anything changed.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self
                    .save_button_area
                    .contains(Position::new(mouse.column, mouse.row))
                {
                    self.save();
                    return true;
                }
                if let Some((block, offset)) = self.position_at(mouse.column, mouse.row) {
                    self.doc.set_selection(Selection::caret(block, offset));
                    return true;
                }
                false
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((block, offset)) = self.position_at(mouse.column, mouse.row) {
                    let sel = self.doc.selection();
                    // Drags within the block extend the selection; a drag
                    // into another block just moves the cursor there.
                    if sel.block == block {
                        self.doc.set_selection(Selection {
                            block,
                            anchor: sel.anchor,
                            focus: offset,
                        });
                    } else {
                        self.doc.set_selection(Selection::caret(block, offset));
                    }
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    /// Insert pasted text at the cursor as one transaction.
    pub fn paste_text(&mut self, text: &str) {
        self.edit(|doc| doc.insert_text(text));
    }

    /// Serialize the document to the store. Failures go to the status bar
    /// and the log; nothing is fatal.
    pub fn save(&mut self) {
        match persistence::save(&self.doc, self.store.as_mut()) {
            Ok(()) => {
                self.dirty = false;
                self.status_message = "Saved".to_string();
            }
            Err(e) => {
                tracing::warn!("Save failed: {e:#}");
                self.status_message = format!("Save failed: {e}");
            }
        }
    }

    pub fn undo(&mut self) {
        if let Some(prev) = self.undo_stack.pop() {
            let current = std::mem::replace(&mut self.doc, prev);
            self.redo_stack.push(current);
            self.dirty = true;
        }
    }

    pub fn redo(&mut self) {
        if let Some(next) = self.redo_stack.pop() {
            let current = std::mem::replace(&mut self.doc, next);
            self.undo_stack.push(current);
            self.dirty = true;
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        crate::view::render(frame, self);
    }

    /// One character insertion attempt: the shortcut interpreter gets first
    /// refusal; an unhandled character is inserted as ordinary text. Either
    /// way this is a single transaction, so a shortcut's deletion and style
    /// toggle undo together.
    fn type_char(&mut self, ch: char) {
        self.edit(|doc| {
            let selection = doc.selection();
            if apply_shortcut(doc, &selection, ch) == InputDisposition::NotHandled {
                doc.insert_char(ch);
            }
        });
    }

    /// Run one edit transaction: snapshot, apply, and record the snapshot
    /// as an undo unit if the document actually changed.
    fn edit(&mut self, f: impl FnOnce(&mut Document)) {
        let snapshot = self.doc.clone();
        f(&mut self.doc);
        if self.doc != snapshot {
            self.push_undo(snapshot);
            self.dirty = true;
        }
    }

    fn push_undo(&mut self, snapshot: Document) {
        self.redo_stack.clear();
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > self.undo_depth {
            self.undo_stack.remove(0);
        }
    }

    /// Map a screen position to a document position, honoring scroll and
    /// character display widths. Clicks below the last block land on it.
    fn position_at(&self, column: u16, row: u16) -> Option<(BlockId, usize)> {
        let area = self.text_area;
        if !area.contains(Position::new(column, row)) {
            return None;
        }
        let row_index = self.scroll.0 + (row - area.y) as usize;
        let block_index = row_index.min(self.doc.block_count() - 1);
        let block = self.doc.block(BlockId(block_index));

        let target = (column - area.x) as usize;
        let mut offset = self.scroll.1.min(block.len());
        let mut width = 0usize;
        for (ch, _) in block.chars_with_styles().skip(offset) {
            let w = ch.width().unwrap_or(0);
            if width + w > target {
                break;
            }
            width += w;
            offset += 1;
        }
        Some((BlockId(block_index), offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::MemoryStore;
    use crate::style::StyleId;

    fn test_editor() -> Editor {
        Editor::new(&Config::default(), Box::new(MemoryStore::new()), true)
    }

    fn type_str(editor: &mut Editor, text: &str) {
        for ch in text.chars() {
            editor.handle_key(KeyCode::Char(ch), KeyModifiers::NONE);
        }
    }

    #[test]
    fn test_typing_shortcut_through_key_events() {
        let mut editor = test_editor();
        type_str(&mut editor, "Hello# big");
        // The trigger and its space are both consumed; what follows is
        // heading text.
        assert_eq!(editor.document().to_plain_text(), "Hellobig");
        let block = editor.document().block(BlockId(0));
        assert!(block.range_has_style(5..8, StyleId::HeadingOne));
        assert!(!block.style_at(0).contains(StyleId::HeadingOne));
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_shortcut_undoes_as_one_unit() {
        let mut editor = test_editor();
        type_str(&mut editor, "Hello# ");
        assert_eq!(editor.document().to_plain_text(), "Hello");

        // One undo restores both the trigger text and the style state.
        editor.handle_key(KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(editor.document().to_plain_text(), "Hello#");
        assert!(!editor.document().current_styles().contains(StyleId::HeadingOne));

        editor.handle_key(KeyCode::Char('y'), KeyModifiers::CONTROL);
        assert_eq!(editor.document().to_plain_text(), "Hello");
        assert!(editor.document().current_styles().contains(StyleId::HeadingOne));
    }

    #[test]
    fn test_plain_movement_does_not_pollute_undo() {
        let mut editor = test_editor();
        type_str(&mut editor, "ab");
        editor.handle_key(KeyCode::Left, KeyModifiers::NONE);
        editor.handle_key(KeyCode::Char('z'), KeyModifiers::CONTROL);
        // The undo reverts the last *edit*, not the cursor motion.
        assert_eq!(editor.document().to_plain_text(), "a");
    }

    #[test]
    fn test_save_clears_dirty_and_sets_status() {
        let mut editor = test_editor();
        type_str(&mut editor, "note");
        assert!(editor.is_dirty());
        editor.handle_key(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(!editor.is_dirty());
        assert_eq!(editor.status_message(), "Saved");
        assert!(editor
            .store()
            .get(persistence::STORAGE_KEY)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_quit_key() {
        let mut editor = test_editor();
        assert!(!editor.should_quit());
        editor.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(editor.should_quit());
    }

    #[test]
    fn test_backspace_on_empty_document_is_not_an_edit() {
        let mut editor = test_editor();
        editor.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        assert!(!editor.is_dirty());
        editor.handle_key(KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(editor.document().to_plain_text(), "");
    }

    #[test]
    fn test_shift_extends_selection() {
        let mut editor = test_editor();
        type_str(&mut editor, "hello");
        editor.handle_key(KeyCode::Home, KeyModifiers::NONE);
        editor.handle_key(KeyCode::Right, KeyModifiers::SHIFT);
        editor.handle_key(KeyCode::Right, KeyModifiers::SHIFT);
        let sel = editor.document().selection();
        assert_eq!(sel.range(), 0..2);
    }
}
