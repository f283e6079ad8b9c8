//! Inline style identifiers and the style map.
//!
//! The five style identifiers are the only rendering protocol this crate
//! exposes to the view layer. The editing model records *which* styles cover
//! each character; `StyleMap` describes how each identifier renders in the
//! terminal and is consulted only when drawing.

use once_cell::sync::Lazy;
use ratatui::style::{Color, Modifier, Style};
use std::fmt;

/// Inline style identifiers.
///
/// The wire names (`HEADING_ONE`, `BOLD`, ...) are used in the raw content
/// representation and in config overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleId {
    /// Large, bold heading text (triggered by `# `)
    HeadingOne,
    /// Bold text (triggered by `* `)
    Bold,
    /// Underlined text (triggered by `*** `)
    Underline,
    /// Red text (triggered by `** `)
    RedColor,
    /// Highlighted box: dark background, light text (triggered by ``` + space)
    Highlighted,
}

impl StyleId {
    /// All style identifiers, in a fixed order used for set iteration and
    /// style-map indexing.
    pub const ALL: [StyleId; 5] = [
        StyleId::HeadingOne,
        StyleId::Bold,
        StyleId::Underline,
        StyleId::RedColor,
        StyleId::Highlighted,
    ];

    /// The wire name of this style.
    pub fn as_str(self) -> &'static str {
        match self {
            StyleId::HeadingOne => "HEADING_ONE",
            StyleId::Bold => "BOLD",
            StyleId::Underline => "UNDERLINE",
            StyleId::RedColor => "RED_COLOR",
            StyleId::Highlighted => "HIGHLIGHTED",
        }
    }

    /// Parse a wire name. Returns None for unknown names so callers can skip
    /// styles persisted by a newer version instead of failing the load.
    pub fn parse(name: &str) -> Option<StyleId> {
        StyleId::ALL.iter().copied().find(|id| id.as_str() == name)
    }

    fn bit(self) -> u8 {
        match self {
            StyleId::HeadingOne => 1 << 0,
            StyleId::Bold => 1 << 1,
            StyleId::Underline => 1 << 2,
            StyleId::RedColor => 1 << 3,
            StyleId::Highlighted => 1 << 4,
        }
    }

    fn index(self) -> usize {
        match self {
            StyleId::HeadingOne => 0,
            StyleId::Bold => 1,
            StyleId::Underline => 2,
            StyleId::RedColor => 3,
            StyleId::Highlighted => 4,
        }
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of inline styles attached to one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleSet(u8);

impl StyleSet {
    /// The empty set.
    pub const EMPTY: StyleSet = StyleSet(0);

    pub fn contains(self, id: StyleId) -> bool {
        self.0 & id.bit() != 0
    }

    pub fn insert(&mut self, id: StyleId) {
        self.0 |= id.bit();
    }

    pub fn remove(&mut self, id: StyleId) {
        self.0 &= !id.bit();
    }

    /// This set with membership of `id` flipped.
    pub fn toggled(self, id: StyleId) -> StyleSet {
        StyleSet(self.0 ^ id.bit())
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the styles in the set, in `StyleId::ALL` order.
    pub fn iter(self) -> impl Iterator<Item = StyleId> {
        StyleId::ALL.into_iter().filter(move |id| self.contains(*id))
    }
}

impl FromIterator<StyleId> for StyleSet {
    fn from_iter<T: IntoIterator<Item = StyleId>>(iter: T) -> Self {
        let mut set = StyleSet::EMPTY;
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// How one style identifier renders in the terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStyle {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub underline: bool,
}

/// Mapping from style identifier to terminal rendering attributes.
///
/// Immutable at runtime apart from config overrides applied at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleMap {
    entries: [RenderStyle; 5],
}

/// Default visuals, mirroring the editor's stock appearance: headings and
/// bold text render bold, `RED_COLOR` is red text, `HIGHLIGHTED` is white on
/// black.
static DEFAULT_STYLE_MAP: Lazy<StyleMap> = Lazy::new(|| {
    let mut map = StyleMap {
        entries: [RenderStyle::default(); 5],
    };
    map.set(
        StyleId::HeadingOne,
        RenderStyle {
            bold: true,
            ..Default::default()
        },
    );
    map.set(
        StyleId::Bold,
        RenderStyle {
            bold: true,
            ..Default::default()
        },
    );
    map.set(
        StyleId::Underline,
        RenderStyle {
            underline: true,
            ..Default::default()
        },
    );
    map.set(
        StyleId::RedColor,
        RenderStyle {
            fg: Some(Color::Red),
            ..Default::default()
        },
    );
    map.set(
        StyleId::Highlighted,
        RenderStyle {
            fg: Some(Color::White),
            bg: Some(Color::Black),
            ..Default::default()
        },
    );
    map
});

impl Default for StyleMap {
    fn default() -> Self {
        DEFAULT_STYLE_MAP.clone()
    }
}

impl StyleMap {
    pub fn get(&self, id: StyleId) -> RenderStyle {
        self.entries[id.index()]
    }

    pub fn set(&mut self, id: StyleId, style: RenderStyle) {
        self.entries[id.index()] = style;
    }

    /// Merge the rendering attributes of every style in `set` into one
    /// ratatui style. When two styles both set a color, the later one in
    /// `StyleId::ALL` order wins.
    pub fn terminal_style(&self, set: StyleSet) -> Style {
        let mut style = Style::default();
        for id in set.iter() {
            let entry = self.get(id);
            if let Some(fg) = entry.fg {
                style = style.fg(fg);
            }
            if let Some(bg) = entry.bg {
                style = style.bg(bg);
            }
            if entry.bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            if entry.underline {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
        }
        style
    }
}
