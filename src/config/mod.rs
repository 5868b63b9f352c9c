//! Configuration for LineageGraph.
//!
//! A small YAML file covering the query budget and the database location.
//! Every field has a serde default, so a missing file, an empty file, and a
//! partial file all behave sensibly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LineageError, Result};

fn default_version() -> String {
    "1.0".to_string()
}

fn default_max_vertices() -> usize {
    10_000
}

fn default_database_path() -> String {
    "lineage.db".to_string()
}

// ---------------------------------------------------------------------------
// QueryLimits
// ---------------------------------------------------------------------------

/// Per-query resource budget.
///
/// The visited set already bounds a query to its connected component; this
/// budget additionally caps the number of vertices one walk may touch, since
/// component sizes are not bounded by the graph design. A walk that hits the
/// cap returns a partial result with the `truncated` flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryLimits {
    #[serde(default = "default_max_vertices")]
    pub max_vertices: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            max_vertices: default_max_vertices(),
        }
    }
}

// ---------------------------------------------------------------------------
// DatabaseConfig
// ---------------------------------------------------------------------------

/// Location of the SQLite reference store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// LineageConfig
// ---------------------------------------------------------------------------

/// Root configuration, loaded from YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageConfig {
    /// Config format version (currently "1.0").
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub limits: QueryLimits,

    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            limits: QueryLimits::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl LineageConfig {
    /// Parse a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| LineageError::Config(e.to_string()))
    }
}

/// Load configuration from `path`, or defaults when `path` is `None` or the
/// file does not exist.
pub fn load_config(path: Option<&Path>) -> Result<LineageConfig> {
    let Some(path) = path else {
        return Ok(LineageConfig::default());
    };
    if !path.exists() {
        return Ok(LineageConfig::default());
    }
    let text = std::fs::read_to_string(path)?;
    LineageConfig::from_yaml(&text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
