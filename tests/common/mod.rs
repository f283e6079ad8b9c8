pub mod tracing;

use crossterm::event::{KeyCode, KeyModifiers};
use jot::app::Editor;
use jot::config::Config;
use jot::services::storage::MemoryStore;

/// An editor over a fresh in-memory store.
pub fn test_editor() -> Editor {
    Editor::new(&Config::default(), Box::new(MemoryStore::new()), true)
}

/// Feed a string through the editor one keystroke at a time.
pub fn type_str(editor: &mut Editor, text: &str) {
    for ch in text.chars() {
        editor.handle_key(KeyCode::Char(ch), KeyModifiers::NONE);
    }
}

pub fn press(editor: &mut Editor, code: KeyCode) {
    editor.handle_key(code, KeyModifiers::NONE);
}

pub fn press_ctrl(editor: &mut Editor, ch: char) {
    editor.handle_key(KeyCode::Char(ch), KeyModifiers::CONTROL);
}
