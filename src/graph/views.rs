//! View resolution — mapping a granularity to concrete edge labels.
//!
//! Pure and stateless. The view set is closed; string inputs are rejected
//! with `InvalidView` at the query boundary, before any store access.

use crate::error::{LineageError, Result};
use crate::types::View;

// ---------------------------------------------------------------------------
// Edge labels
// ---------------------------------------------------------------------------

/// Flow label walked by dataset-granularity queries.
pub const FLOW_DATASET: &str = "flow-dataset";

/// Flow label walked by field-granularity queries.
pub const FLOW_FIELD: &str = "flow-field";

/// Relationship between glossary terms. Shared by both granularities.
pub const TERM_RELATION: &str = "term-relation";

/// Assignment of a data element to a glossary term (element -> term).
pub const SEMANTIC_ASSIGNMENT: &str = "semantic-assignment";

// ---------------------------------------------------------------------------
// ViewLabels
// ---------------------------------------------------------------------------

/// The edge labels a single query traverses, resolved from its [`View`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLabels {
    pub flow: &'static str,
    pub term_relation: &'static str,
    pub semantic_assignment: &'static str,
}

/// Resolve a view to its edge labels. Total over the closed view set.
pub fn resolve(view: View) -> ViewLabels {
    let flow = match view {
        View::Dataset => FLOW_DATASET,
        View::Field => FLOW_FIELD,
    };
    ViewLabels {
        flow,
        term_relation: TERM_RELATION,
        semantic_assignment: SEMANTIC_ASSIGNMENT,
    }
}

/// Parse and resolve a caller-supplied view name in one step.
pub fn resolve_str(view: &str) -> Result<(View, ViewLabels)> {
    let parsed = View::from_str_loose(view)
        .ok_or_else(|| LineageError::InvalidView(view.to_string()))?;
    Ok((parsed, resolve(parsed)))
}
