//! Save and load of the document through the key-value store.
//!
//! One fixed key holds the serialized raw content. Loading is best-effort:
//! no saved state or a malformed value both fall back to an empty document.

use anyhow::{Context, Result};

use crate::model::{Document, RawContent};
use crate::services::storage::KeyValueStore;

/// The fixed key the document is persisted under.
pub const STORAGE_KEY: &str = "editor-content";

/// Serialize the document and write it to the store.
pub fn save(doc: &Document, store: &mut dyn KeyValueStore) -> Result<()> {
    let raw = RawContent::from_document(doc);
    let json = serde_json::to_string(&raw).context("Failed to serialize document")?;
    store.set(STORAGE_KEY, &json)?;
    tracing::info!(blocks = raw.blocks.len(), "Saved document");
    Ok(())
}

/// Load the previously saved document, or start empty when there is none or
/// the stored value does not parse.
pub fn load_or_default(store: &dyn KeyValueStore) -> Document {
    let value = match store.get(STORAGE_KEY) {
        Ok(Some(value)) => value,
        Ok(None) => {
            tracing::debug!("No saved document found");
            return Document::new();
        }
        Err(e) => {
            tracing::warn!("Failed to read saved document: {e:#}");
            return Document::new();
        }
    };
    match serde_json::from_str::<RawContent>(&value) {
        Ok(raw) => {
            tracing::info!("Restored saved document");
            raw.into_document()
        }
        Err(e) => {
            tracing::warn!("Ignoring malformed saved document: {e}");
            Document::new()
        }
    }
}
