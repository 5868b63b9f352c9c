//! SQLite schema initialization for the reference lineage store.
//!
//! Two tables: `vertices` keyed by node id, `edges` unique on
//! `(label, from_id, to_id)`. Properties are stored as JSON text columns so
//! the open-ended key/value maps survive round-trips without a schema change.

use rusqlite::Connection;

use crate::error::Result;

// ---------------------------------------------------------------------------
// DDL constants — kept as separate strings so each statement can be executed
// individually and failures name the statement that broke.
// ---------------------------------------------------------------------------

const CREATE_VERTICES: &str = "\
CREATE TABLE IF NOT EXISTS vertices (
  node_id TEXT PRIMARY KEY,
  guid TEXT,
  label TEXT NOT NULL,
  display_name TEXT NOT NULL,
  properties TEXT
)";

const CREATE_EDGES: &str = "\
CREATE TABLE IF NOT EXISTS edges (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  label TEXT NOT NULL,
  from_id TEXT NOT NULL,
  to_id TEXT NOT NULL,
  properties TEXT,
  UNIQUE (label, from_id, to_id)
)";

// Indexes ----------------------------------------------------------------

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_vertices_label ON vertices(label)",
    "CREATE INDEX IF NOT EXISTS idx_vertices_guid ON vertices(guid)",
    "CREATE INDEX IF NOT EXISTS idx_edges_from ON edges(from_id, label)",
    "CREATE INDEX IF NOT EXISTS idx_edges_to ON edges(to_id, label)",
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Open (or create) a lineage database at `path` and apply the schema.
///
/// Pass `":memory:"` for an in-memory database, which is what the test
/// suite does throughout.
pub fn initialize_database(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;
    apply_schema(&conn)?;
    Ok(conn)
}

/// Apply the schema to an already-open connection. Idempotent.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    // WAL keeps concurrent readers cheap on file-backed stores; a no-op for
    // in-memory databases. The pragma returns the resulting mode as a row,
    // so it must go through query_row rather than execute.
    let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.execute(CREATE_VERTICES, [])?;
    conn.execute(CREATE_EDGES, [])?;
    for ddl in CREATE_INDEXES {
        conn.execute(ddl, [])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_creates_tables() {
        let conn = initialize_database(":memory:").unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name IN ('vertices', 'edges')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn apply_schema_is_idempotent() {
        let conn = initialize_database(":memory:").unwrap();
        apply_schema(&conn).unwrap();
        apply_schema(&conn).unwrap();
    }

    #[test]
    fn edge_identity_is_enforced() {
        let conn = initialize_database(":memory:").unwrap();
        conn.execute(
            "INSERT INTO edges (label, from_id, to_id) VALUES ('flow-dataset', 'a', 'b')",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO edges (label, from_id, to_id) VALUES ('flow-dataset', 'a', 'b')",
            [],
        );
        assert!(dup.is_err(), "duplicate (label, from, to) must be rejected");
    }
}
