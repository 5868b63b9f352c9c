//! LineageGraph command-line interface.
//!
//! Thin front end over the library: open the SQLite reference store, run a
//! lineage query, and print the result as JSON. Also bulk-loads graph
//! documents and reports store statistics.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use lineagegraph::config::{load_config, QueryLimits};
use lineagegraph::error::Result;
use lineagegraph::graph::store::SqliteGraphStore;
use lineagegraph::graph::traversal::LineageTraversal;
use lineagegraph::observability::init_logging;
use lineagegraph::types::LineageSubgraph;

#[derive(Parser)]
#[command(
    name = "lineagegraph",
    version,
    about = "Provenance and impact queries over a data-movement property graph"
)]
struct Cli {
    /// Path to a YAML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path (overrides the config file).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a lineage query and print the subgraph as JSON.
    Query {
        /// Node id of the vertex to query.
        node_id: String,

        /// Traversal scope: ultimate-source, ultimate-destination,
        /// source-and-destination, end-to-end, or glossary.
        #[arg(long, default_value = "end-to-end")]
        scope: String,

        /// Granularity view: dataset or field.
        #[arg(long, default_value = "dataset")]
        view: String,

        /// Override the per-query vertex budget.
        #[arg(long)]
        max_vertices: Option<usize>,
    },

    /// Bulk-load vertices and edges from a JSON document
    /// (`{"vertices": [...], "edges": [...]}`).
    Load { file: PathBuf },

    /// Print vertex and edge counts.
    Stats,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let db_path = cli
        .db
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.database.path.clone());
    let store = SqliteGraphStore::open(&db_path)?;

    match cli.command {
        Command::Query {
            node_id,
            scope,
            view,
            max_vertices,
        } => {
            let limits = QueryLimits {
                max_vertices: max_vertices.unwrap_or(config.limits.max_vertices),
            };
            let engine = LineageTraversal::with_limits(&store, limits);
            let result = engine.query_str(&scope, &view, &node_id)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Load { file } => {
            let text = std::fs::read_to_string(&file)?;
            let document: LineageSubgraph = serde_json::from_str(&text)?;
            // Synthetic vertices exist only inside query results; a document
            // carrying them would collide with the reserved boundary ids.
            for vertex in document.vertices.iter().filter(|v| !v.synthetic) {
                store.upsert_vertex(vertex)?;
            }
            store.upsert_edges(&document.edges)?;
            info!(
                vertices = document.vertices.len(),
                edges = document.edges.len(),
                "load complete"
            );
        }
        Command::Stats => {
            let stats = store.stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
