//! Markdown-style typing shortcuts.
//!
//! On every character insertion attempt the editor asks this module first.
//! When the typed character is a space and the text immediately before the
//! cursor ends in one of the trigger suffixes, the suffix is removed and the
//! matching style toggled, as one transaction; the space itself is swallowed.
//! Anything else is reported as not handled and inserted normally.
//!
//! The rules are data, not code: a fixed, ordered table evaluated top to
//! bottom, first match wins. Each `*`-family rule carries a guard character
//! that must not appear immediately before the matched suffix, which is what
//! keeps `*`, `**` and `***` apart. The backtick rule carries no guard.

use std::ops::Range;

use crate::model::{BlockId, Document, Selection};
use crate::style::StyleId;

/// The capabilities the interpreter needs from a document. Kept narrow on
/// purpose: read one block's text, delete a range, toggle a style.
pub trait DocumentOps {
    /// The text of one block.
    fn text(&self, block: BlockId) -> &str;

    /// Delete a char range from a block, moving the cursor with it.
    fn delete_range(&mut self, block: BlockId, range: Range<usize>);

    /// Toggle a style at the current cursor/selection.
    fn toggle_style(&mut self, style: StyleId);
}

impl DocumentOps for Document {
    fn text(&self, block: BlockId) -> &str {
        self.block(block).text()
    }

    fn delete_range(&mut self, block: BlockId, range: Range<usize>) {
        Document::delete_range(self, block, range);
    }

    fn toggle_style(&mut self, style: StyleId) {
        Document::toggle_style(self, style);
    }
}

/// Whether the typed character was consumed by a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDisposition {
    /// A rule fired; the caller must not insert the character.
    Handled,
    /// No rule fired; the caller inserts the character as usual.
    NotHandled,
}

/// One trigger rule: a literal suffix, an optional guard character that must
/// NOT immediately precede the suffix, and the style to toggle.
#[derive(Debug, Clone, Copy)]
pub struct TriggerRule {
    pub suffix: &'static [char],
    pub guard: Option<char>,
    pub style: StyleId,
}

/// The shortcut table, in priority order.
pub const TRIGGER_RULES: &[TriggerRule] = &[
    TriggerRule {
        suffix: &['#'],
        guard: None,
        style: StyleId::HeadingOne,
    },
    TriggerRule {
        suffix: &['*'],
        guard: Some('*'),
        style: StyleId::Bold,
    },
    TriggerRule {
        suffix: &['*', '*'],
        guard: Some('*'),
        style: StyleId::RedColor,
    },
    TriggerRule {
        suffix: &['*', '*', '*'],
        guard: Some('*'),
        style: StyleId::Underline,
    },
    TriggerRule {
        suffix: &['`', '`', '`'],
        guard: None,
        style: StyleId::Highlighted,
    },
];

impl TriggerRule {
    /// Match against the chars immediately before the cursor. A window
    /// shorter than the suffix never matches; a missing guard position
    /// passes the guard.
    fn matches(&self, window: &[char]) -> bool {
        let n = self.suffix.len();
        if window.len() < n || &window[window.len() - n..] != self.suffix {
            return false;
        }
        match self.guard {
            Some(guard) => window.len() < n + 1 || window[window.len() - n - 1] != guard,
            None => true,
        }
    }
}

/// Run the shortcut interpreter for one character insertion attempt.
///
/// Only a typed space can fire a rule. On a match the trigger characters are
/// deleted (the range ends at the cursor) and the style is toggled; the
/// caller must then swallow the space.
pub fn apply_shortcut<D: DocumentOps>(
    doc: &mut D,
    selection: &Selection,
    ch: char,
) -> InputDisposition {
    if ch != ' ' {
        return InputDisposition::NotHandled;
    }

    let cursor = selection.focus;
    // The longest suffix is three chars and the guard inspects one more.
    let window = tail_window(doc.text(selection.block), cursor, 4);
    let Some(rule) = TRIGGER_RULES.iter().find(|rule| rule.matches(&window)) else {
        return InputDisposition::NotHandled;
    };

    doc.delete_range(selection.block, cursor - rule.suffix.len()..cursor);
    doc.toggle_style(rule.style);
    tracing::debug!(style = %rule.style, "Applied typing shortcut");
    InputDisposition::Handled
}

/// The last `n` chars before `cursor` (fewer if the text is shorter).
fn tail_window(text: &str, cursor: usize, n: usize) -> Vec<char> {
    let skip = cursor.saturating_sub(n);
    text.chars().skip(skip).take(cursor - skip).collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::model::Document;
    use proptest::prelude::*;

    fn doc_with(text: &str) -> Document {
        let mut doc = Document::new();
        doc.insert_text(text);
        doc
    }

    proptest! {
        /// Text ending in none of the trigger characters never fires a rule,
        /// and a miss leaves the document untouched.
        #[test]
        fn miss_leaves_document_unchanged(text in "[a-zA-Z0-9 .,]*") {
            let mut doc = doc_with(&text);
            let before = doc.clone();
            let selection = doc.selection();
            prop_assert_eq!(apply_shortcut(&mut doc, &selection, ' '), InputDisposition::NotHandled);
            prop_assert_eq!(doc, before);
        }

        /// A trailing `#` is always stripped, whatever precedes it.
        #[test]
        fn heading_strips_exactly_the_hash(prefix in "[a-zA-Z0-9 ]*") {
            let mut doc = doc_with(&format!("{prefix}#"));
            let selection = doc.selection();
            prop_assert_eq!(apply_shortcut(&mut doc, &selection, ' '), InputDisposition::Handled);
            prop_assert_eq!(doc.to_plain_text(), prefix);
            prop_assert!(doc.current_styles().contains(StyleId::HeadingOne));
        }

        /// A fired rule removes exactly the suffix: the text shrinks by the
        /// suffix length and nothing else moves.
        #[test]
        fn hit_removes_exactly_the_suffix(prefix in "[a-zA-Z0-9]*", rule_idx in 0usize..TRIGGER_RULES.len()) {
            let rule = &TRIGGER_RULES[rule_idx];
            let suffix: String = rule.suffix.iter().collect();
            let mut doc = doc_with(&format!("{prefix}{suffix}"));
            let selection = doc.selection();
            prop_assert_eq!(apply_shortcut(&mut doc, &selection, ' '), InputDisposition::Handled);
            prop_assert_eq!(doc.to_plain_text(), prefix);
        }
    }
}
