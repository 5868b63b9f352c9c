//! Cycle-safe lineage traversal — the five query scopes.
//!
//! Every scope is an explicit-stack walk guarded by a request-local visited
//! set keyed by node id, so traversal terminates on fully cyclic input and
//! never overflows the call stack on deep components. The visited set also
//! bounds work to the connected component touched by the query, with an
//! additional configurable vertex budget for graphs whose components are
//! themselves unbounded.
//!
//! Partial scopes (ultimate source / destination) report only the queried
//! vertex and the discovered terminal leaves; the unexpanded middle is
//! summarized by a synthetic condensed vertex (see
//! [`condense`](crate::graph::condense)). The end-to-end and glossary scopes
//! return every vertex and edge they touch and never condense.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::QueryLimits;
use crate::error::{LineageError, Result};
use crate::graph::assemble::SubgraphBuilder;
use crate::graph::condense;
use crate::graph::store::GraphSource;
use crate::graph::views::{self, ViewLabels};
use crate::types::{Edge, LineageSubgraph, Scope, Vertex, View};

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Which way a partial walk follows flow edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Against the flow, toward producers (provenance).
    Upstream,
    /// With the flow, toward consumers (impact).
    Downstream,
}

impl Direction {
    fn edges<S: GraphSource>(self, source: &S, node_id: &str, label: &str) -> Result<Vec<Edge>> {
        match self {
            Self::Upstream => source.in_edges(node_id, label),
            Self::Downstream => source.out_edges(node_id, label),
        }
    }

    fn far_endpoint(self, edge: &Edge) -> &str {
        match self {
            Self::Upstream => &edge.from,
            Self::Downstream => &edge.to,
        }
    }
}

// ---------------------------------------------------------------------------
// DirectionalWalk
// ---------------------------------------------------------------------------

/// Outcome of one directional walk: the terminal leaves it discovered, and
/// whether the vertex budget cut it short.
struct DirectionalWalk {
    leaves: Vec<Vertex>,
    truncated: bool,
}

// ---------------------------------------------------------------------------
// LineageTraversal
// ---------------------------------------------------------------------------

/// The lineage query engine, bound to a read-only graph source.
///
/// Each invocation is an independent unit of work with its own visited set
/// and its own result; the engine holds no mutable state, so one instance
/// may serve any number of sequential queries and separate instances may
/// run concurrently against the same underlying graph.
pub struct LineageTraversal<'a, S: GraphSource> {
    source: &'a S,
    limits: QueryLimits,
}

impl<'a, S: GraphSource> LineageTraversal<'a, S> {
    /// Create an engine with default query limits.
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            limits: QueryLimits::default(),
        }
    }

    /// Create an engine with explicit query limits.
    pub fn with_limits(source: &'a S, limits: QueryLimits) -> Self {
        Self { source, limits }
    }

    // -------------------------------------------------------------------
    // query
    // -------------------------------------------------------------------

    /// Run one lineage query. A queried vertex absent from the store yields
    /// an empty subgraph, not an error; store failures propagate unmodified.
    pub fn query(&self, scope: Scope, view: View, node_id: &str) -> Result<LineageSubgraph> {
        let labels = views::resolve(view);

        let Some(origin) = self.source.find_vertex(node_id)? else {
            debug!(node_id, %scope, "queried vertex not found; returning empty subgraph");
            return Ok(LineageSubgraph::empty());
        };

        let result = match scope {
            Scope::UltimateSource => self.ultimate_source(&origin, &labels)?,
            Scope::UltimateDestination => self.ultimate_destination(&origin, &labels)?,
            Scope::SourceAndDestination => self.source_and_destination(&origin, &labels)?,
            Scope::EndToEnd => self.end_to_end(&origin, &labels)?,
            Scope::Glossary => self.glossary(&origin, &labels)?,
        };

        if result.truncated {
            warn!(
                node_id,
                %scope,
                limit = self.limits.max_vertices,
                "vertex budget exceeded; returning partial result"
            );
        }
        debug!(
            node_id,
            %scope,
            %view,
            vertices = result.vertices.len(),
            edges = result.edges.len(),
            "lineage query complete"
        );
        Ok(result)
    }

    /// String-typed front door for callers holding untyped enumeration
    /// values (the CLI, a service layer). Unknown names are rejected before
    /// any store access.
    pub fn query_str(&self, scope: &str, view: &str, node_id: &str) -> Result<LineageSubgraph> {
        let scope = Scope::from_str_loose(scope)
            .ok_or_else(|| LineageError::InvalidScope(scope.to_string()))?;
        let view =
            View::from_str_loose(view).ok_or_else(|| LineageError::InvalidView(view.to_string()))?;
        self.query(scope, view, node_id)
    }

    // -------------------------------------------------------------------
    // ultimate_source / ultimate_destination
    // -------------------------------------------------------------------

    /// Backward walk over flow in-edges. Reports the queried vertex, every
    /// terminal producer (zero flow in-edges), and a condensed-source
    /// boundary when at least one such leaf exists.
    fn ultimate_source(&self, origin: &Vertex, labels: &ViewLabels) -> Result<LineageSubgraph> {
        let walk = self.directional_walk(origin, labels.flow, Direction::Upstream)?;
        let mut builder = SubgraphBuilder::new();
        builder.add_vertex(origin.clone());
        for leaf in &walk.leaves {
            builder.add_vertex(leaf.clone());
        }
        condense::attach_source_boundary(&mut builder, origin, &walk.leaves);
        Ok(builder.finish(walk.truncated))
    }

    /// Forward walk over flow out-edges; the mirror image of
    /// [`ultimate_source`](Self::ultimate_source).
    fn ultimate_destination(
        &self,
        origin: &Vertex,
        labels: &ViewLabels,
    ) -> Result<LineageSubgraph> {
        let walk = self.directional_walk(origin, labels.flow, Direction::Downstream)?;
        let mut builder = SubgraphBuilder::new();
        builder.add_vertex(origin.clone());
        for leaf in &walk.leaves {
            builder.add_vertex(leaf.clone());
        }
        condense::attach_destination_boundary(&mut builder, origin, &walk.leaves);
        Ok(builder.finish(walk.truncated))
    }

    /// Union of the two partial walks, run independently. Each boundary
    /// vertex is governed by its own leaf rule, so one direction may
    /// condense while the other does not.
    fn source_and_destination(
        &self,
        origin: &Vertex,
        labels: &ViewLabels,
    ) -> Result<LineageSubgraph> {
        let up = self.directional_walk(origin, labels.flow, Direction::Upstream)?;
        let down = self.directional_walk(origin, labels.flow, Direction::Downstream)?;

        let mut builder = SubgraphBuilder::new();
        builder.add_vertex(origin.clone());
        for leaf in up.leaves.iter().chain(down.leaves.iter()) {
            builder.add_vertex(leaf.clone());
        }
        condense::attach_source_boundary(&mut builder, origin, &up.leaves);
        condense::attach_destination_boundary(&mut builder, origin, &down.leaves);
        Ok(builder.finish(up.truncated || down.truncated))
    }

    // -------------------------------------------------------------------
    // end_to_end
    // -------------------------------------------------------------------

    /// Full bidirectional connected component over the flow label. Returns
    /// every vertex and edge touched, intermediate process steps included,
    /// and never condenses.
    fn end_to_end(&self, origin: &Vertex, labels: &ViewLabels) -> Result<LineageSubgraph> {
        let mut builder = SubgraphBuilder::new();
        let truncated = self.component_walk(origin, labels.flow, &mut builder)?;
        Ok(builder.finish(truncated))
    }

    // -------------------------------------------------------------------
    // glossary
    // -------------------------------------------------------------------

    /// Bidirectional component over the term-relation label, then the
    /// queried term's own semantic-assignment in-edges. Assignments of
    /// other terms in the component are deliberately NOT pulled in; that is
    /// the observed contract of this scope.
    fn glossary(&self, origin: &Vertex, labels: &ViewLabels) -> Result<LineageSubgraph> {
        let mut builder = SubgraphBuilder::new();
        let truncated = self.component_walk(origin, labels.term_relation, &mut builder)?;

        for edge in self
            .source
            .in_edges(&origin.node_id, labels.semantic_assignment)?
        {
            if let Some(element) = self.source.find_vertex(&edge.from)? {
                builder.add_vertex(element);
                builder.add_edge(edge);
            }
        }
        Ok(builder.finish(truncated))
    }

    // -------------------------------------------------------------------
    // Walk primitives
    // -------------------------------------------------------------------

    /// One-directional walk over `label` edges collecting terminal leaves.
    ///
    /// A leaf is a discovered vertex with no further edge in the walk
    /// direction. The origin itself never counts as a leaf: when the origin
    /// is its own terminal there is no boundary beyond it to condense.
    /// Already-visited vertices are never re-expanded, so a cycle looping
    /// back into an explored branch is absorbed silently.
    fn directional_walk(
        &self,
        origin: &Vertex,
        label: &str,
        direction: Direction,
    ) -> Result<DirectionalWalk> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut leaves: Vec<Vertex> = Vec::new();
        let mut truncated = false;

        visited.insert(origin.node_id.clone());
        let mut stack: Vec<Vertex> = vec![origin.clone()];

        while let Some(vertex) = stack.pop() {
            let edges = direction.edges(self.source, &vertex.node_id, label)?;

            if edges.is_empty() && vertex.node_id != origin.node_id {
                leaves.push(vertex);
                continue;
            }

            for edge in &edges {
                let far = direction.far_endpoint(edge);
                if visited.contains(far) {
                    continue;
                }
                if visited.len() >= self.limits.max_vertices {
                    truncated = true;
                    continue;
                }
                // Dangling edges (far endpoint absent from the store) are
                // skipped, not errors: topology is never a failure.
                if let Some(next) = self.source.find_vertex(far)? {
                    visited.insert(next.node_id.clone());
                    stack.push(next);
                }
            }
        }

        leaves.sort_by(|a, b| a.node_id.cmp(&b.node_id));
        Ok(DirectionalWalk { leaves, truncated })
    }

    /// Bidirectional component walk over `label` edges, recording every
    /// touched vertex and edge into `builder`. Returns the truncation flag.
    fn component_walk(
        &self,
        origin: &Vertex,
        label: &str,
        builder: &mut SubgraphBuilder,
    ) -> Result<bool> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut truncated = false;

        visited.insert(origin.node_id.clone());
        let mut stack: Vec<Vertex> = vec![origin.clone()];

        while let Some(vertex) = stack.pop() {
            let mut edges = self.source.out_edges(&vertex.node_id, label)?;
            edges.extend(self.source.in_edges(&vertex.node_id, label)?);
            builder.add_vertex(vertex.clone());

            for edge in edges {
                let far = if edge.from == vertex.node_id {
                    &edge.to
                } else {
                    &edge.from
                };
                if !visited.contains(far.as_str()) {
                    if visited.len() >= self.limits.max_vertices {
                        truncated = true;
                        continue;
                    }
                    match self.source.find_vertex(far)? {
                        Some(next) => {
                            visited.insert(next.node_id.clone());
                            stack.push(next);
                        }
                        // Dangling edge: keep walking, drop the edge.
                        None => continue,
                    }
                }
                builder.add_edge(edge);
            }
        }

        Ok(truncated)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
