//! Terminal rendering.
//!
//! Draws the document with the style map applied per run of identically
//! styled characters, a one-line status bar with the `[ Save ]` button, and
//! the terminal cursor at the selection focus. The layout rects computed
//! here are written back to the editor for mouse hit-testing.

use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

use crate::app::Editor;
use crate::model::BlockId;
use crate::style::StyleSet;

/// Width of the rendered `[ Save ]` button.
const SAVE_BUTTON_WIDTH: u16 = 8;

pub fn render(frame: &mut Frame, editor: &mut Editor) {
    let area = frame.area();
    if area.height == 0 || area.width == 0 {
        return;
    }
    let text_area = Rect::new(area.x, area.y, area.width, area.height.saturating_sub(1));
    let status_area = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);

    scroll_to_cursor(editor, text_area);
    editor.text_area = text_area;

    render_document(frame, editor, text_area);
    render_status_bar(frame, editor, status_area);
    place_cursor(frame, editor, text_area);
}

/// Bring the selection focus into view, adjusting the stored scroll.
fn scroll_to_cursor(editor: &mut Editor, text_area: Rect) {
    let sel = editor.doc.selection();
    let (mut scroll_y, mut scroll_x) = editor.scroll;

    let height = text_area.height as usize;
    let block = sel.block.0;
    if block < scroll_y {
        scroll_y = block;
    } else if height > 0 && block >= scroll_y + height {
        scroll_y = block + 1 - height;
    }

    // Keep the cursor column on screen, leaving one cell for the trailing
    // cursor position past the last character.
    let width = (text_area.width as usize).saturating_sub(1);
    if sel.focus < scroll_x {
        scroll_x = sel.focus;
    }
    let current = editor.doc.block(sel.block);
    while scroll_x < sel.focus && display_width(current, scroll_x, sel.focus) > width {
        scroll_x += 1;
    }

    editor.scroll = (scroll_y, scroll_x);
}

/// Display width of the chars in `[from, to)` of a block.
fn display_width(block: &crate::model::Block, from: usize, to: usize) -> usize {
    block
        .chars_with_styles()
        .skip(from)
        .take(to.saturating_sub(from))
        .map(|(ch, _)| ch.width().unwrap_or(0))
        .sum()
}

fn render_document(frame: &mut Frame, editor: &Editor, text_area: Rect) {
    let (scroll_y, scroll_x) = editor.scroll;
    let sel = editor.doc.selection();

    let mut lines = Vec::new();
    for row in 0..text_area.height as usize {
        let index = scroll_y + row;
        if index >= editor.doc.block_count() {
            break;
        }
        let block = editor.doc.block(BlockId(index));
        let selected = (!sel.collapsed() && sel.block.0 == index).then(|| sel.range());
        lines.push(block_line(editor, block, scroll_x, selected));
    }

    frame.render_widget(Text::from(lines), text_area);
}

/// Build one display line: group consecutive chars with the same style set
/// (and selection membership) into spans.
fn block_line(
    editor: &Editor,
    block: &crate::model::Block,
    scroll_x: usize,
    selected: Option<std::ops::Range<usize>>,
) -> Line<'static> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_key: Option<(StyleSet, bool)> = None;

    for (i, (ch, set)) in block.chars_with_styles().enumerate().skip(scroll_x) {
        let in_selection = selected.as_ref().is_some_and(|r| r.contains(&i));
        let key = (set, in_selection);
        if run_key != Some(key) {
            if let Some((prev_set, prev_sel)) = run_key.take() {
                spans.push(styled_span(
                    editor,
                    std::mem::take(&mut run),
                    prev_set,
                    prev_sel,
                ));
            }
            run_key = Some(key);
        }
        run.push(ch);
    }
    if let Some((set, in_selection)) = run_key {
        spans.push(styled_span(editor, run, set, in_selection));
    }

    Line::from(spans)
}

fn styled_span(editor: &Editor, text: String, set: StyleSet, in_selection: bool) -> Span<'static> {
    let mut style = editor.style_map.terminal_style(set);
    if in_selection {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Span::styled(text, style)
}

fn render_status_bar(frame: &mut Frame, editor: &mut Editor, status_area: Rect) {
    let sel = editor.doc.selection();
    let mut left = format!("Ln {}, Col {}", sel.block.0 + 1, sel.focus + 1);
    if editor.dirty {
        left.push_str("  *");
    }
    let styles: Vec<&str> = editor.doc.current_styles().iter().map(|id| id.as_str()).collect();
    if !styles.is_empty() {
        left.push_str("  ");
        left.push_str(&styles.join(" "));
    }
    if !editor.status_message.is_empty() {
        left.push_str("  ");
        left.push_str(&editor.status_message);
    }

    frame.render_widget(
        Line::from(Span::styled(left, Style::default().add_modifier(Modifier::DIM))),
        status_area,
    );

    // The save button sits at the right edge of the status bar.
    let button_area = if status_area.width > SAVE_BUTTON_WIDTH {
        Rect::new(
            status_area.right() - SAVE_BUTTON_WIDTH,
            status_area.y,
            SAVE_BUTTON_WIDTH,
            1,
        )
    } else {
        Rect::default()
    };
    editor.save_button_area = button_area;
    if button_area.width > 0 {
        frame.render_widget(
            Line::from(Span::styled(
                "[ Save ]",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            button_area,
        );
    }
}

fn place_cursor(frame: &mut Frame, editor: &Editor, text_area: Rect) {
    let sel = editor.doc.selection();
    let (scroll_y, scroll_x) = editor.scroll;
    if sel.block.0 < scroll_y {
        return;
    }
    let row = sel.block.0 - scroll_y;
    if row >= text_area.height as usize {
        return;
    }
    let block = editor.doc.block(sel.block);
    let col = display_width(block, scroll_x, sel.focus).min(text_area.width as usize - 1);
    frame.set_cursor_position(Position::new(
        text_area.x + col as u16,
        text_area.y + row as u16,
    ));
}
