//! The owned document model.
//!
//! A `Document` is an ordered list of blocks (paragraphs) of styled text,
//! plus the current selection and the typing-style override. Every edit goes
//! through the methods here; the editor snapshots the whole document before
//! each transaction, so one snapshot is one undo unit.
//!
//! Offsets are char offsets into a block's text. Cursor motion is
//! grapheme-cluster aware so multi-char clusters are never split by the
//! arrow keys, while editing primitives stay char-addressed.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use super::selection::{BlockId, Selection};
use crate::style::{StyleId, StyleSet};

/// One paragraph of text with a style set per character.
///
/// `styles` always has one entry per char of `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    text: String,
    styles: Vec<StyleSet>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    /// A block whose every character carries `set`.
    pub fn from_text(text: &str, set: StyleSet) -> Self {
        let styles = vec![set; text.chars().count()];
        Self {
            text: text.to_string(),
            styles,
        }
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset of the given char offset (text length when past the end).
    fn byte_offset(&self, offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Style set of the char at `offset`, or the empty set past the end.
    pub fn style_at(&self, offset: usize) -> StyleSet {
        self.styles.get(offset).copied().unwrap_or(StyleSet::EMPTY)
    }

    pub fn insert_char(&mut self, offset: usize, ch: char, set: StyleSet) {
        let byte = self.byte_offset(offset);
        self.text.insert(byte, ch);
        self.styles.insert(offset, set);
    }

    pub fn insert_str(&mut self, offset: usize, s: &str, set: StyleSet) {
        let byte = self.byte_offset(offset);
        self.text.insert_str(byte, s);
        let count = s.chars().count();
        self.styles
            .splice(offset..offset, std::iter::repeat(set).take(count));
    }

    /// Remove the chars in `range`. The range must be clamped to `len()`.
    pub fn delete_range(&mut self, range: Range<usize>) {
        let start = self.byte_offset(range.start);
        let end = self.byte_offset(range.end);
        self.text.replace_range(start..end, "");
        self.styles.drain(range);
    }

    /// Split the block at `offset`, returning the tail.
    pub fn split_off(&mut self, offset: usize) -> Block {
        let byte = self.byte_offset(offset);
        let text = self.text.split_off(byte);
        let styles = self.styles.split_off(offset);
        Block { text, styles }
    }

    pub fn append(&mut self, mut other: Block) {
        self.text.push_str(&other.text);
        self.styles.append(&mut other.styles);
    }

    /// Chars paired with their style sets, for rendering and interchange.
    pub fn chars_with_styles(&self) -> impl Iterator<Item = (char, StyleSet)> + '_ {
        self.text.chars().zip(self.styles.iter().copied())
    }

    /// Does every char in `range` carry `id`? Empty ranges do not.
    pub fn range_has_style(&self, range: Range<usize>, id: StyleId) -> bool {
        let range = clamp_range(range, self.len());
        !range.is_empty() && self.styles[range].iter().all(|set| set.contains(id))
    }

    pub fn set_style_in_range(&mut self, range: Range<usize>, id: StyleId, on: bool) {
        let range = clamp_range(range, self.len());
        for set in &mut self.styles[range] {
            if on {
                set.insert(id);
            } else {
                set.remove(id);
            }
        }
    }

    /// Char offset of the grapheme boundary at or before `offset - 1`.
    pub fn prev_boundary(&self, offset: usize) -> usize {
        let mut start = 0;
        for g in self.text.graphemes(true) {
            let glen = g.chars().count();
            if start + glen >= offset {
                return start;
            }
            start += glen;
        }
        start
    }

    /// Char offset of the grapheme boundary after `offset`.
    pub fn next_boundary(&self, offset: usize) -> usize {
        let mut start = 0;
        for g in self.text.graphemes(true) {
            let glen = g.chars().count();
            if start + glen > offset {
                return start + glen;
            }
            start += glen;
        }
        start
    }
}

fn clamp_range(range: Range<usize>, len: usize) -> Range<usize> {
    let start = range.start.min(len);
    let end = range.end.min(len).max(start);
    start..end
}

/// The full document: blocks, selection, and the typing-style override.
///
/// There is always at least one block. The typing override is what a style
/// toggle at a collapsed cursor flips; when it is unset, newly typed text
/// inherits the style of the character before the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
    selection: Selection,
    typing_override: Option<StyleSet>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document: one empty block, cursor at its start.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::new()],
            selection: Selection::caret(BlockId(0), 0),
            typing_override: None,
        }
    }

    /// Build a document from decoded blocks. The cursor starts at the top.
    pub fn from_blocks(mut blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            blocks.push(Block::new());
        }
        Self {
            blocks,
            selection: Selection::caret(BlockId(0), 0),
            typing_override: None,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Move the selection, clamping it to the document. Clears the typing
    /// override, as any explicit cursor motion does.
    pub fn set_selection(&mut self, sel: Selection) {
        let block = BlockId(sel.block.0.min(self.blocks.len() - 1));
        let len = self.blocks[block.0].len();
        self.selection = Selection {
            block,
            anchor: sel.anchor.min(len),
            focus: sel.focus.min(len),
        };
        self.typing_override = None;
    }

    /// The styles newly typed text would carry: the typing override if one is
    /// set, otherwise inherited from the character before the cursor (or the
    /// first character, at the start of a non-empty block).
    pub fn current_styles(&self) -> StyleSet {
        if let Some(set) = self.typing_override {
            return set;
        }
        let block = &self.blocks[self.selection.block.0];
        let at = self.selection.start();
        if at > 0 {
            block.style_at(at - 1)
        } else {
            block.style_at(0)
        }
    }

    /// Insert one char at the cursor with the current typing styles,
    /// replacing the selection if one is active.
    pub fn insert_char(&mut self, ch: char) {
        if !self.selection.collapsed() {
            self.delete_selection();
        }
        let set = self.current_styles();
        let at = self.selection.focus;
        self.blocks[self.selection.block.0].insert_char(at, ch, set);
        self.selection = Selection::caret(self.selection.block, at + 1);
        self.typing_override = None;
    }

    /// Insert text at the cursor, splitting into new blocks at newlines.
    /// The whole insertion carries the current typing styles.
    pub fn insert_text(&mut self, text: &str) {
        if !self.selection.collapsed() {
            self.delete_selection();
        }
        let set = self.current_styles();
        let mut parts = text.split('\n');
        if let Some(first) = parts.next() {
            let at = self.selection.focus;
            self.blocks[self.selection.block.0].insert_str(at, first, set);
            self.selection = Selection::caret(self.selection.block, at + first.chars().count());
        }
        for part in parts {
            self.split_block();
            self.blocks[self.selection.block.0].insert_str(0, part, set);
            self.selection = Selection::caret(self.selection.block, part.chars().count());
        }
        self.typing_override = None;
    }

    /// Split the current block at the cursor (Enter).
    pub fn split_block(&mut self) {
        if !self.selection.collapsed() {
            self.delete_selection();
        }
        let b = self.selection.block.0;
        let rest = self.blocks[b].split_off(self.selection.focus);
        self.blocks.insert(b + 1, rest);
        self.selection = Selection::caret(BlockId(b + 1), 0);
        self.typing_override = None;
    }

    /// Delete the selected range, collapsing the cursor to its start.
    pub fn delete_selection(&mut self) {
        if self.selection.collapsed() {
            return;
        }
        let block = self.selection.block;
        let range = self.selection.range();
        self.delete_range(block, range);
    }

    /// Delete a char range from a block, shifting the selection to match.
    pub fn delete_range(&mut self, block: BlockId, range: Range<usize>) {
        let range = clamp_range(range, self.blocks[block.0].len());
        if range.is_empty() {
            return;
        }
        self.blocks[block.0].delete_range(range.clone());
        if self.selection.block == block {
            self.selection.anchor = shift_for_delete(self.selection.anchor, &range);
            self.selection.focus = shift_for_delete(self.selection.focus, &range);
        }
        self.typing_override = None;
    }

    /// Toggle a style: at a collapsed cursor, flip the typing override; over
    /// a selection, style the whole range unless it is already fully styled,
    /// in which case clear it.
    pub fn toggle_style(&mut self, id: StyleId) {
        if self.selection.collapsed() {
            self.typing_override = Some(self.current_styles().toggled(id));
        } else {
            let range = self.selection.range();
            let block = &mut self.blocks[self.selection.block.0];
            let on = !block.range_has_style(range.clone(), id);
            block.set_style_in_range(range, id, on);
        }
    }

    /// Backspace: delete the selection, the previous grapheme, or merge with
    /// the previous block when at offset 0.
    pub fn backspace(&mut self) {
        if !self.selection.collapsed() {
            self.delete_selection();
            return;
        }
        let b = self.selection.block.0;
        let at = self.selection.focus;
        if at > 0 {
            let start = self.blocks[b].prev_boundary(at);
            self.delete_range(BlockId(b), start..at);
        } else if b > 0 {
            let merged = self.blocks.remove(b);
            let prev_len = self.blocks[b - 1].len();
            self.blocks[b - 1].append(merged);
            self.selection = Selection::caret(BlockId(b - 1), prev_len);
            self.typing_override = None;
        }
    }

    /// Forward delete: the selection, the next grapheme, or the following
    /// block boundary when at the end of a block.
    pub fn delete_forward(&mut self) {
        if !self.selection.collapsed() {
            self.delete_selection();
            return;
        }
        let b = self.selection.block.0;
        let at = self.selection.focus;
        if at < self.blocks[b].len() {
            let end = self.blocks[b].next_boundary(at);
            self.delete_range(BlockId(b), at..end);
        } else if b + 1 < self.blocks.len() {
            let next = self.blocks.remove(b + 1);
            self.blocks[b].append(next);
            self.typing_override = None;
        }
    }

    pub fn move_left(&mut self, extend: bool) {
        if !extend && !self.selection.collapsed() {
            let at = self.selection.start();
            self.set_selection(Selection::caret(self.selection.block, at));
            return;
        }
        let b = self.selection.block.0;
        let focus = self.selection.focus;
        let (block, focus) = if focus > 0 {
            (b, self.blocks[b].prev_boundary(focus))
        } else if b > 0 {
            (b - 1, self.blocks[b - 1].len())
        } else {
            (b, 0)
        };
        self.apply_motion(BlockId(block), focus, extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        if !extend && !self.selection.collapsed() {
            let at = self.selection.end();
            self.set_selection(Selection::caret(self.selection.block, at));
            return;
        }
        let b = self.selection.block.0;
        let focus = self.selection.focus;
        let (block, focus) = if focus < self.blocks[b].len() {
            (b, self.blocks[b].next_boundary(focus))
        } else if b + 1 < self.blocks.len() {
            (b + 1, 0)
        } else {
            (b, focus)
        };
        self.apply_motion(BlockId(block), focus, extend);
    }

    pub fn move_up(&mut self, extend: bool) {
        let b = self.selection.block.0;
        if b == 0 {
            self.apply_motion(BlockId(0), 0, extend);
            return;
        }
        let focus = self.selection.focus.min(self.blocks[b - 1].len());
        self.apply_motion(BlockId(b - 1), focus, extend);
    }

    pub fn move_down(&mut self, extend: bool) {
        let b = self.selection.block.0;
        if b + 1 >= self.blocks.len() {
            let len = self.blocks[b].len();
            self.apply_motion(BlockId(b), len, extend);
            return;
        }
        let focus = self.selection.focus.min(self.blocks[b + 1].len());
        self.apply_motion(BlockId(b + 1), focus, extend);
    }

    pub fn move_line_start(&mut self, extend: bool) {
        self.apply_motion(self.selection.block, 0, extend);
    }

    pub fn move_line_end(&mut self, extend: bool) {
        let len = self.blocks[self.selection.block.0].len();
        self.apply_motion(self.selection.block, len, extend);
    }

    fn apply_motion(&mut self, block: BlockId, focus: usize, extend: bool) {
        // Extension across block boundaries is not representable in a
        // single-block selection; the anchor is dropped when the block changes.
        let anchor = if extend && block == self.selection.block {
            self.selection.anchor
        } else {
            focus
        };
        self.selection = Selection {
            block,
            anchor,
            focus,
        };
        self.typing_override = None;
    }

    /// The visible text of the document, blocks joined with newlines.
    pub fn to_plain_text(&self) -> String {
        let texts: Vec<&str> = self.blocks.iter().map(|b| b.text()).collect();
        texts.join("\n")
    }
}

fn shift_for_delete(offset: usize, deleted: &Range<usize>) -> usize {
    if offset <= deleted.start {
        offset
    } else if offset >= deleted.end {
        offset - (deleted.end - deleted.start)
    } else {
        deleted.start
    }
}
