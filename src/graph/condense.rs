//! Boundary ("condensed") vertex synthesis for partial lineage scopes.
//!
//! A condensed vertex marks "named terminal vertices exist, but the path
//! between them and the queried vertex is intentionally not expanded". One
//! per direction per query at most, and only when the walk discovered at
//! least one true leaf. The vertices are tagged `synthetic`, so a real
//! store id can never be mistaken for a boundary marker.

use crate::graph::assemble::SubgraphBuilder;
use crate::types::{Edge, Vertex, CONDENSED_DESTINATION_ID, CONDENSED_SOURCE_ID};

/// Label carried by condensed boundary vertices.
pub const CONDENSED_VERTEX_LABEL: &str = "condensed";

/// Label of the synthetic edges wiring a boundary vertex to the leaf set.
pub const CONDENSED_EDGE_LABEL: &str = "condensed";

fn boundary_vertex(node_id: &str, display_name: &str) -> Vertex {
    Vertex {
        node_id: node_id.to_string(),
        guid: None,
        label: CONDENSED_VERTEX_LABEL.to_string(),
        display_name: display_name.to_string(),
        properties: Default::default(),
        synthetic: true,
    }
}

/// Attach the provenance-side boundary: `leaf -> condensed -> origin`,
/// following the data-flow direction. No-op when no leaf was discovered.
pub fn attach_source_boundary(builder: &mut SubgraphBuilder, origin: &Vertex, leaves: &[Vertex]) {
    if leaves.is_empty() {
        return;
    }
    builder.add_vertex(boundary_vertex(CONDENSED_SOURCE_ID, "Condensed source"));
    for leaf in leaves {
        builder.add_edge(Edge::new(
            CONDENSED_EDGE_LABEL,
            &leaf.node_id,
            CONDENSED_SOURCE_ID,
        ));
    }
    builder.add_edge(Edge::new(
        CONDENSED_EDGE_LABEL,
        CONDENSED_SOURCE_ID,
        &origin.node_id,
    ));
}

/// Attach the impact-side boundary: `origin -> condensed -> leaf`.
/// No-op when no leaf was discovered.
pub fn attach_destination_boundary(
    builder: &mut SubgraphBuilder,
    origin: &Vertex,
    leaves: &[Vertex],
) {
    if leaves.is_empty() {
        return;
    }
    builder.add_vertex(boundary_vertex(
        CONDENSED_DESTINATION_ID,
        "Condensed destination",
    ));
    builder.add_edge(Edge::new(
        CONDENSED_EDGE_LABEL,
        &origin.node_id,
        CONDENSED_DESTINATION_ID,
    ));
    for leaf in leaves {
        builder.add_edge(Edge::new(
            CONDENSED_EDGE_LABEL,
            CONDENSED_DESTINATION_ID,
            &leaf.node_id,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Vertex {
        Vertex::new("q", "data-element", "Queried")
    }

    #[test]
    fn empty_leaf_set_adds_nothing() {
        let mut builder = SubgraphBuilder::new();
        attach_source_boundary(&mut builder, &origin(), &[]);
        attach_destination_boundary(&mut builder, &origin(), &[]);

        let result = builder.finish(false);
        assert!(result.is_empty());
    }

    #[test]
    fn source_boundary_points_from_leaves_toward_origin() {
        let mut builder = SubgraphBuilder::new();
        let leaves = vec![
            Vertex::new("s1", "data-element", "S1"),
            Vertex::new("s2", "data-element", "S2"),
        ];
        attach_source_boundary(&mut builder, &origin(), &leaves);

        let result = builder.finish(false);
        assert!(result.contains_vertex(CONDENSED_SOURCE_ID));
        let condensed = result
            .vertices
            .iter()
            .find(|v| v.node_id == CONDENSED_SOURCE_ID)
            .unwrap();
        assert!(condensed.synthetic);
        assert!(condensed.guid.is_none());

        // s1 -> condensed, s2 -> condensed, condensed -> q
        assert_eq!(result.edges.len(), 3);
        assert!(result
            .edges
            .iter()
            .any(|e| e.from == "s1" && e.to == CONDENSED_SOURCE_ID));
        assert!(result
            .edges
            .iter()
            .any(|e| e.from == CONDENSED_SOURCE_ID && e.to == "q"));
    }

    #[test]
    fn destination_boundary_points_from_origin_toward_leaves() {
        let mut builder = SubgraphBuilder::new();
        let leaves = vec![Vertex::new("d1", "data-element", "D1")];
        attach_destination_boundary(&mut builder, &origin(), &leaves);

        let result = builder.finish(false);
        assert!(result.contains_vertex(CONDENSED_DESTINATION_ID));
        assert!(result
            .edges
            .iter()
            .any(|e| e.from == "q" && e.to == CONDENSED_DESTINATION_ID));
        assert!(result
            .edges
            .iter()
            .any(|e| e.from == CONDENSED_DESTINATION_ID && e.to == "d1"));
    }

    #[test]
    fn both_directions_coexist_without_colliding() {
        let mut builder = SubgraphBuilder::new();
        let sources = vec![Vertex::new("s1", "data-element", "S1")];
        let destinations = vec![Vertex::new("d1", "data-element", "D1")];
        attach_source_boundary(&mut builder, &origin(), &sources);
        attach_destination_boundary(&mut builder, &origin(), &destinations);

        let result = builder.finish(false);
        let synthetic: Vec<&str> = result
            .vertices
            .iter()
            .filter(|v| v.synthetic)
            .map(|v| v.node_id.as_str())
            .collect();
        assert_eq!(
            synthetic,
            vec![CONDENSED_DESTINATION_ID, CONDENSED_SOURCE_ID]
        );
    }
}
