//! Document model: blocks of styled text, the selection, and the raw
//! interchange representation.

pub mod document;
pub mod raw;
pub mod selection;

pub use document::{Block, Document};
pub use raw::RawContent;
pub use selection::{BlockId, Selection};
