//! Graph source contract and the SQLite reference adapter.
//!
//! The traversal engine only ever talks to a [`GraphSource`]: vertex lookup
//! plus labeled in/out edge reads. Implementations must be read-only from
//! the engine's perspective, safe for concurrent reads, and deterministic
//! (stable result ordering), since result determinism is part of the query
//! contract.
//!
//! [`SqliteGraphStore`] is the bundled implementation. Every query goes
//! through [`Connection::prepare_cached`], so the first call compiles the
//! statement and subsequent calls reuse it from an internal LRU cache.

use rusqlite::{params, Connection};

use crate::db::converters::{encode_properties, row_to_edge, row_to_vertex};
use crate::db::schema::initialize_database;
use crate::error::Result;
use crate::types::{Edge, Vertex};

// ---------------------------------------------------------------------------
// GraphSource
// ---------------------------------------------------------------------------

/// Read-only view of a lineage graph, as consumed by the traversal engine.
pub trait GraphSource {
    /// Look up a vertex by node id. `None` means "not found", which the
    /// engine translates into an empty result rather than an error.
    fn find_vertex(&self, node_id: &str) -> Result<Option<Vertex>>;

    /// Outgoing edges of `node_id` carrying `label`, in stable order.
    fn out_edges(&self, node_id: &str, label: &str) -> Result<Vec<Edge>>;

    /// Incoming edges of `node_id` carrying `label`, in stable order.
    fn in_edges(&self, node_id: &str, label: &str) -> Result<Vec<Edge>>;
}

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Aggregate statistics about the stored graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct GraphStats {
    pub vertices: usize,
    pub edges: usize,
}

// ---------------------------------------------------------------------------
// SqliteGraphStore
// ---------------------------------------------------------------------------

/// Typed wrapper around the lineage SQLite database.
///
/// The write surface (upserts) exists for the loader and for tests; the
/// traversal engine uses only the [`GraphSource`] methods. One store per
/// thread: open additional connections to the same file for concurrent
/// queries.
pub struct SqliteGraphStore {
    pub conn: Connection,
}

impl std::fmt::Debug for SqliteGraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteGraphStore").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// SQL constants
// ---------------------------------------------------------------------------

const UPSERT_VERTEX_SQL: &str = "\
INSERT INTO vertices (node_id, guid, label, display_name, properties)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT(node_id) DO UPDATE SET
  guid = excluded.guid,
  label = excluded.label,
  display_name = excluded.display_name,
  properties = excluded.properties";

const UPSERT_EDGE_SQL: &str = "\
INSERT INTO edges (label, from_id, to_id, properties)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT(label, from_id, to_id) DO UPDATE SET
  properties = excluded.properties";

const FIND_VERTEX_SQL: &str = "\
SELECT node_id, guid, label, display_name, properties
FROM vertices WHERE node_id = ?1";

const OUT_EDGES_SQL: &str = "\
SELECT label, from_id, to_id, properties
FROM edges WHERE from_id = ?1 AND label = ?2
ORDER BY to_id ASC";

const IN_EDGES_SQL: &str = "\
SELECT label, from_id, to_id, properties
FROM edges WHERE to_id = ?1 AND label = ?2
ORDER BY from_id ASC";

impl SqliteGraphStore {
    /// Open (or create) a store at `path`, applying the schema.
    pub fn open(path: &str) -> Result<Self> {
        Ok(Self {
            conn: initialize_database(path)?,
        })
    }

    /// In-memory store, used throughout the test suite.
    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    /// Wrap an existing connection (schema must already be applied).
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Insert or update a single vertex.
    pub fn upsert_vertex(&self, vertex: &Vertex) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(UPSERT_VERTEX_SQL)?;
        stmt.execute(params![
            vertex.node_id,
            vertex.guid,
            vertex.label,
            vertex.display_name,
            encode_properties(&vertex.properties)?,
        ])?;
        Ok(())
    }

    /// Insert or update a batch of vertices.
    pub fn upsert_vertices(&self, vertices: &[Vertex]) -> Result<()> {
        for vertex in vertices {
            self.upsert_vertex(vertex)?;
        }
        Ok(())
    }

    /// Insert or update a single edge.
    pub fn upsert_edge(&self, edge: &Edge) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(UPSERT_EDGE_SQL)?;
        stmt.execute(params![
            edge.label,
            edge.from,
            edge.to,
            encode_properties(&edge.properties)?,
        ])?;
        Ok(())
    }

    /// Insert or update a batch of edges.
    pub fn upsert_edges(&self, edges: &[Edge]) -> Result<()> {
        for edge in edges {
            self.upsert_edge(edge)?;
        }
        Ok(())
    }

    /// Vertex and edge counts.
    pub fn stats(&self) -> Result<GraphStats> {
        let vertices: usize =
            self.conn
                .query_row("SELECT count(*) FROM vertices", [], |row| row.get(0))?;
        let edges: usize = self
            .conn
            .query_row("SELECT count(*) FROM edges", [], |row| row.get(0))?;
        Ok(GraphStats { vertices, edges })
    }
}

impl GraphSource for SqliteGraphStore {
    fn find_vertex(&self, node_id: &str) -> Result<Option<Vertex>> {
        let mut stmt = self.conn.prepare_cached(FIND_VERTEX_SQL)?;
        let mut rows = stmt.query_and_then(params![node_id], row_to_vertex)?;
        rows.next().transpose()
    }

    fn out_edges(&self, node_id: &str, label: &str) -> Result<Vec<Edge>> {
        let mut stmt = self.conn.prepare_cached(OUT_EDGES_SQL)?;
        let rows = stmt.query_and_then(params![node_id, label], row_to_edge)?;
        rows.collect()
    }

    fn in_edges(&self, node_id: &str, label: &str) -> Result<Vec<Edge>> {
        let mut stmt = self.conn.prepare_cached(IN_EDGES_SQL)?;
        let rows = stmt.query_and_then(params![node_id, label], row_to_edge)?;
        rows.collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
