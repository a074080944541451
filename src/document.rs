//! Portable graph document: export and import
//!
//! The document is the serializable subset of the store's state:
//! exactly the `nodes` and `edges` collections. Viewport state and
//! in-flight execution state never travel with it. Import is
//! all-or-nothing: the payload is parsed and validated before the store
//! is touched.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::store::GraphStore;
use crate::types::{PipelineEdge, PipelineNode};

/// The serialization unit: the graph's nodes and edges
///
/// Unknown extra fields are ignored on import for forward
/// compatibility; a missing `nodes` or `edges` collection is a
/// validation failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    /// All nodes, in iteration order
    pub nodes: Vec<PipelineNode>,
    /// All edges, orphans included
    pub edges: Vec<PipelineEdge>,
}

/// Snapshot the store into a document
pub fn export(store: &GraphStore) -> GraphDocument {
    GraphDocument {
        nodes: store.nodes().cloned().collect(),
        edges: store.edges().cloned().collect(),
    }
}

/// Serialize a document to pretty-printed JSON
pub fn to_json(document: &GraphDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parse a document from a JSON payload
///
/// Any shape mismatch (wrong top-level structure, missing required
/// fields, wrong field types) is reported as a validation error.
pub fn from_json(payload: &str) -> Result<GraphDocument> {
    serde_json::from_str(payload)
        .map_err(|e| EditorError::validation(format!("malformed graph document: {e}")))
}

/// Import a JSON payload into the store, replacing its contents
///
/// All-or-nothing: on any parse or validation error the store is left
/// exactly as it was.
pub fn import(store: &mut GraphStore, payload: &str) -> Result<()> {
    let document = from_json(payload)?;
    store.replace_all(document)
}

/// Write the store's document to a file
pub fn save_to_path(store: &GraphStore, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let content = to_json(&export(store))?;
    std::fs::write(path, content)?;
    log::debug!("Saved graph document to {:?}", path);
    Ok(())
}

/// Load a document file into the store, replacing its contents
pub fn load_from_path(store: &mut GraphStore, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    import(store, &content).inspect_err(|e| {
        log::warn!("Rejected graph document from {:?}: {}", path, e);
    })
}
