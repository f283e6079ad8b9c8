//! Raw content-interchange representation.
//!
//! A plain, serializable snapshot of the document: per block, the text and a
//! list of `{offset, length, style}` ranges. This is the only format the
//! store ever sees. Decoding is forgiving: unknown style names and
//! out-of-range offsets are skipped or clamped, never fatal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::{Block, Document};
use crate::style::{StyleId, StyleSet};

/// One inline style run in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: String,
}

/// One block of the interchange snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBlock {
    pub text: String,
    #[serde(default)]
    pub inline_style_ranges: Vec<RawStyleRange>,
}

/// The persisted envelope: blocks plus the time they were saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContent {
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
    pub blocks: Vec<RawBlock>,
}

impl RawContent {
    /// Snapshot a document, stamped with the current time.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            saved_at: Some(Utc::now()),
            blocks: doc.blocks().iter().map(raw_block).collect(),
        }
    }

    /// Rebuild a document. The cursor lands at the start, matching a fresh
    /// session. Unknown styles are skipped with a warning.
    pub fn into_document(self) -> Document {
        let blocks = self
            .blocks
            .into_iter()
            .map(|raw| {
                let mut block = Block::from_text(&raw.text, StyleSet::EMPTY);
                for range in raw.inline_style_ranges {
                    match StyleId::parse(&range.style) {
                        Some(id) => {
                            let end = range.offset.saturating_add(range.length);
                            block.set_style_in_range(range.offset..end, id, true);
                        }
                        None => {
                            tracing::warn!("Skipping unknown style {:?} in saved content", range.style);
                        }
                    }
                }
                block
            })
            .collect();
        Document::from_blocks(blocks)
    }
}

fn raw_block(block: &Block) -> RawBlock {
    let mut ranges = Vec::new();
    for id in StyleId::ALL {
        let mut run_start = None;
        let mut i = 0;
        for (_, set) in block.chars_with_styles() {
            match (set.contains(id), run_start) {
                (true, None) => run_start = Some(i),
                (false, Some(start)) => {
                    ranges.push(RawStyleRange {
                        offset: start,
                        length: i - start,
                        style: id.as_str().to_string(),
                    });
                    run_start = None;
                }
                _ => {}
            }
            i += 1;
        }
        if let Some(start) = run_start {
            ranges.push(RawStyleRange {
                offset: start,
                length: i - start,
                style: id.as_str().to_string(),
            });
        }
    }
    ranges.sort_by(|a, b| (a.offset, &a.style).cmp(&(b.offset, &b.style)));
    RawBlock {
        text: block.text().to_string(),
        inline_style_ranges: ranges,
    }
}
