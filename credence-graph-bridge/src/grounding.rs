//! Tag-based grounding of abstract rules to concrete nodes.
//!
//! An abstract rule is a tag-level statement like "every `smoker` node
//! implies a derived `cancer` fact". Grounding scans the subgraph for
//! nodes bearing the source tag (in their payload tag list or prototype
//! set) and synthesises one edge per match, targeting the derived id
//! `<node_id>_<target_tag>`. The derived target only participates in
//! inference if a node with that id exists in the subgraph; otherwise the
//! edge is inert, per the data-tolerance policy.
//!
//! This grounding is intentionally minimal — a tag-membership scan.
//! Variables, predicates of arity above one, and unification are out of
//! scope.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{ContextGraph, GraphEdge, LogicKind, LogicMeta};

/// A tag-level rule to instantiate against concrete nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbstractRule {
    /// Tag selecting the instance nodes.
    pub source_tag: String,
    /// Tag naming the derived fact.
    pub target_tag: String,
    /// Edge kind for the synthesised edges.
    #[serde(default)]
    pub kind: LogicKind,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl AbstractRule {
    /// `∀X: source_tag(X) → target_tag(X)` at the given weight.
    pub fn implication(
        source_tag: impl Into<String>,
        target_tag: impl Into<String>,
        weight: f64,
    ) -> Self {
        Self {
            source_tag: source_tag.into(),
            target_tag: target_tag.into(),
            kind: LogicKind::Implies,
            weight,
        }
    }
}

/// Instantiate `rules` against `context`, returning a new subgraph with the
/// synthesised edges added. Nodes are never added or modified.
pub fn ground_abstract_rules(context: &ContextGraph, rules: &[AbstractRule]) -> ContextGraph {
    let mut grounded = context.clone();

    for rule in rules {
        for (node_id, node) in &context.nodes {
            if !node.bears_tag(&rule.source_tag) {
                continue;
            }

            let target_id = format!("{node_id}_{}", rule.target_tag);
            let edge = GraphEdge::new(
                node_id.clone(),
                target_id,
                format!("grounded_{}_{}", rule.source_tag, rule.target_tag),
            )
            .with_logic(LogicMeta::new(rule.kind, rule.weight));

            debug!(
                node = %node_id,
                tag = %rule.source_tag,
                "grounded abstract rule to instance"
            );
            grounded.edges.insert(edge.id.clone(), edge);
        }
    }

    grounded
}
