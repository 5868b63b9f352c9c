//! Row-to-domain conversion for the SQLite reference store.

use std::collections::BTreeMap;

use rusqlite::Row;

use crate::error::{LineageError, Result};
use crate::types::{Edge, Vertex};

/// Decode a nullable JSON text column into a property map.
fn decode_properties(raw: Option<String>) -> Result<BTreeMap<String, String>> {
    match raw {
        Some(text) if !text.is_empty() => {
            serde_json::from_str(&text).map_err(LineageError::Serialize)
        }
        _ => Ok(BTreeMap::new()),
    }
}

/// Encode a property map for storage; empty maps become SQL NULL.
pub fn encode_properties(properties: &BTreeMap<String, String>) -> Result<Option<String>> {
    if properties.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(properties)?))
}

/// Convert a `vertices` row into a [`Vertex`].
///
/// Stored vertices are never synthetic; condensed boundary vertices exist
/// only inside query results.
pub fn row_to_vertex(row: &Row<'_>) -> Result<Vertex> {
    Ok(Vertex {
        node_id: row.get("node_id")?,
        guid: row.get("guid")?,
        label: row.get("label")?,
        display_name: row.get("display_name")?,
        properties: decode_properties(row.get("properties")?)?,
        synthetic: false,
    })
}

/// Convert an `edges` row into an [`Edge`].
pub fn row_to_edge(row: &Row<'_>) -> Result<Edge> {
    Ok(Edge {
        label: row.get("label")?,
        from: row.get("from_id")?,
        to: row.get("to_id")?,
        properties: decode_properties(row.get("properties")?)?,
    })
}
