//! Input interpretation: the typing-shortcut interpreter.

pub mod shortcuts;

pub use shortcuts::{apply_shortcut, DocumentOps, InputDisposition, TriggerRule, TRIGGER_RULES};
