//! Core domain types for LineageGraph.
//!
//! A lineage graph is a directed property graph: vertices are data elements,
//! process steps, glossary terms, and whatever else the catalog produces
//! (the label set is open); edges carry a label resolved per view and flow
//! from producer to consumer. Queries return an immutable [`LineageSubgraph`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Reserved identifiers
// ---------------------------------------------------------------------------

/// Node id of the synthetic boundary vertex on the provenance side.
pub const CONDENSED_SOURCE_ID: &str = "condensed-source";

/// Node id of the synthetic boundary vertex on the impact side.
pub const CONDENSED_DESTINATION_ID: &str = "condensed-destination";

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// The five supported traversal scopes. A closed set: anything else is
/// rejected as [`InvalidScope`](crate::error::LineageError::InvalidScope)
/// before traversal begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// Backward walk to the terminal producers of the queried vertex.
    UltimateSource,
    /// Forward walk to the terminal consumers of the queried vertex.
    UltimateDestination,
    /// Union of the two partial walks, each condensed independently.
    SourceAndDestination,
    /// Full bidirectional connected component, intermediates included.
    EndToEnd,
    /// Related glossary terms plus the queried term's own assignments.
    Glossary,
}

impl Scope {
    /// Canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UltimateSource => "ultimate-source",
            Self::UltimateDestination => "ultimate-destination",
            Self::SourceAndDestination => "source-and-destination",
            Self::EndToEnd => "end-to-end",
            Self::Glossary => "glossary",
        }
    }

    /// Parse from a loose string (case-insensitive, `-` or `_` separators).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "ultimate-source" => Some(Self::UltimateSource),
            "ultimate-destination" => Some(Self::UltimateDestination),
            "source-and-destination" => Some(Self::SourceAndDestination),
            "end-to-end" | "endtoend" => Some(Self::EndToEnd),
            "glossary" | "vertical" => Some(Self::Glossary),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Granularity selector determining which edge labels a traversal uses.
///
/// `Dataset` walks movement between whole datasets; `Field` walks the
/// column-level flow. The glossary labels are shared by both granularities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Dataset,
    Field,
}

impl View {
    /// Canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dataset => "dataset",
            Self::Field => "field",
        }
    }

    /// Parse from a loose string (case-insensitive, common aliases accepted).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dataset" | "table" => Some(Self::Dataset),
            "field" | "column" => Some(Self::Field),
            _ => None,
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Vertex
// ---------------------------------------------------------------------------

/// A vertex in the lineage graph.
///
/// `node_id` is stable within one query graph; `guid` is the optional global
/// identifier assigned by the upstream catalog. `synthetic` is true only for
/// condensed boundary vertices fabricated at query time, which also removes
/// any collision risk with store-assigned node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    pub node_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    pub label: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub synthetic: bool,
}

impl Vertex {
    /// Build a plain (store-backed) vertex with no guid and no properties.
    pub fn new(
        node_id: impl Into<String>,
        label: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            guid: None,
            label: label.into(),
            display_name: display_name.into(),
            properties: BTreeMap::new(),
            synthetic: false,
        }
    }

    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = Some(guid.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// A directed, labeled edge between two vertices, identified by
/// `(label, from, to)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub label: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl Edge {
    pub fn new(label: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            from: from.into(),
            to: to.into(),
            properties: BTreeMap::new(),
        }
    }

    /// The identity of this edge within a result set.
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.label, &self.from, &self.to)
    }
}

// ---------------------------------------------------------------------------
// LineageSubgraph
// ---------------------------------------------------------------------------

/// The complete, immutable result of one lineage query.
///
/// Vertices are unique by `node_id` and edges by `(label, from, to)`; both
/// lists are sorted so that repeated queries over an unmodified graph are
/// byte-identical. `truncated` is set when the per-query vertex budget cut
/// the walk short.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageSubgraph {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub truncated: bool,
}

impl LineageSubgraph {
    /// The empty result, returned when the queried vertex is not found.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty()
    }

    pub fn contains_vertex(&self, node_id: &str) -> bool {
        self.vertices.iter().any(|v| v.node_id == node_id)
    }

    /// Node ids of all vertices, in result order.
    pub fn vertex_ids(&self) -> Vec<&str> {
        self.vertices.iter().map(|v| v.node_id.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
