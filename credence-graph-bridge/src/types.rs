//! Graph records: nodes, logic-bearing edges, and context subgraphs.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use credence_logic::{clamp, LogicOp, TruthValue};

/// Generate a fresh hex record id.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// How an edge participates in inference. Unknown tags load as `Unknown`
/// and are ignored by the schema mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicKind {
    /// `A → B`: if A then B.
    #[default]
    Implies,
    /// A defeats B (argumentation).
    Attacks,
    /// A reinforces B.
    Supports,
    /// A weakly implies B (half-weight implication).
    Depends,
    /// Mutual exclusion group.
    Mutex,
    #[serde(other)]
    Unknown,
}

/// Logic metadata carried by an edge — how it becomes a rule or constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogicMeta {
    #[serde(rename = "type")]
    pub kind: LogicKind,
    /// Confidence/strength of this relationship.
    pub weight: f64,
    /// Operator for multi-input rules.
    pub op: LogicOp,
    /// Whether training may update the derived rule's weight.
    pub learnable: bool,
}

impl Default for LogicMeta {
    fn default() -> Self {
        Self {
            kind: LogicKind::Implies,
            weight: 1.0,
            op: LogicOp::Identity,
            learnable: true,
        }
    }
}

impl LogicMeta {
    pub fn new(kind: LogicKind, weight: f64) -> Self {
        Self {
            kind,
            weight,
            ..Self::default()
        }
    }
}

/// A graph node with fuzzy-truth fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    /// Prototype/tag set this node belongs to (consulted by grounding).
    #[serde(default)]
    pub prototype_ids: Vec<String>,
    /// Free-form payload; a `tags` array inside it is consulted by grounding.
    #[serde(default)]
    pub payload: serde_json::Map<String, Value>,
    /// Current fuzzy state.
    pub truth_value: TruthValue,
    /// Base truth value before evidence.
    pub prior: TruthValue,
    /// When true the value is evidence and inference never overwrites it.
    #[serde(default)]
    pub is_locked: bool,
    pub created_at: DateTime<Utc>,
}

impl GraphNode {
    /// New node with a generated id; the truth value starts at the prior.
    pub fn create(prior: TruthValue) -> Self {
        let prior = clamp(prior);
        Self {
            id: generate_id(),
            prototype_ids: Vec::new(),
            payload: serde_json::Map::new(),
            truth_value: prior,
            prior,
            is_locked: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_prototype(mut self, prototype_id: impl Into<String>) -> Self {
        self.prototype_ids.push(prototype_id.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Map<String, Value>) -> Self {
        self.payload = payload;
        self
    }

    /// Lock this node at a value, marking it as standing evidence.
    pub fn locked_at(mut self, value: TruthValue) -> Self {
        self.truth_value = clamp(value);
        self.is_locked = true;
        self
    }

    /// The `tags` array inside the payload, if present.
    pub fn tags(&self) -> Vec<&str> {
        self.payload
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether grounding should treat this node as an instance of `tag`.
    pub fn bears_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| *t == tag) || self.prototype_ids.iter().any(|p| p == tag)
    }
}

/// A directed edge; carries optional logic metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub relation: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<LogicMeta>,
    pub created_at: DateTime<Utc>,
}

impl GraphEdge {
    /// New edge with a generated id and no logic metadata.
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_id(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            relation: relation.into(),
            weight: 0.0,
            logic: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_logic(mut self, logic: LogicMeta) -> Self {
        self.logic = Some(logic);
        self
    }

    /// `source → target`: if source then target.
    pub fn implies(source_id: impl Into<String>, target_id: impl Into<String>, weight: f64) -> Self {
        Self::new(source_id, target_id, "implies")
            .with_logic(LogicMeta::new(LogicKind::Implies, weight))
    }

    /// source defeats target.
    pub fn attacks(source_id: impl Into<String>, target_id: impl Into<String>, weight: f64) -> Self {
        Self::new(source_id, target_id, "attacks")
            .with_logic(LogicMeta::new(LogicKind::Attacks, weight))
    }

    /// source reinforces target.
    pub fn supports(source_id: impl Into<String>, target_id: impl Into<String>, weight: f64) -> Self {
        Self::new(source_id, target_id, "supports")
            .with_logic(LogicMeta::new(LogicKind::Supports, weight))
    }

    /// source weakly implies target.
    pub fn depends(source_id: impl Into<String>, target_id: impl Into<String>, weight: f64) -> Self {
        Self::new(source_id, target_id, "depends")
            .with_logic(LogicMeta::new(LogicKind::Depends, weight))
    }
}

/// A truth-value write-back for one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeUpdate {
    pub id: String,
    pub truth_value: TruthValue,
}

/// A bounded subgraph used as the working set of one inference call.
///
/// Nodes and edges are keyed by id and iterated in insertion order — the
/// schema mapping preserves this order, and through it the engine's
/// canonical pass order.
#[derive(Debug, Clone)]
pub struct ContextGraph {
    pub nodes: IndexMap<String, GraphNode>,
    pub edges: IndexMap<String, GraphEdge>,
    pub center_id: String,
}

impl ContextGraph {
    pub fn new(
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
        center_id: impl Into<String>,
    ) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
            edges: edges.into_iter().map(|e| (e.id.clone(), e)).collect(),
            center_id: center_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_creation_clamps_and_copies_prior() {
        let node = GraphNode::create(1.4);
        assert_eq!(node.prior, 1.0);
        assert_eq!(node.truth_value, 1.0);
        assert!(!node.is_locked);
        assert!(!node.id.is_empty());
    }

    #[test]
    fn distinct_nodes_get_distinct_ids() {
        assert_ne!(GraphNode::create(0.5).id, GraphNode::create(0.5).id);
    }

    #[test]
    fn tags_read_from_payload_and_prototypes() {
        let mut payload = serde_json::Map::new();
        payload.insert("tags".to_string(), serde_json::json!(["smoker", "adult"]));
        let node = GraphNode::create(0.5)
            .with_payload(payload)
            .with_prototype("person");

        assert!(node.bears_tag("smoker"));
        assert!(node.bears_tag("person"));
        assert!(!node.bears_tag("robot"));
    }

    #[test]
    fn edge_helpers_attach_logic_metadata() {
        let edge = GraphEdge::implies("a", "b", 0.9);
        let logic = edge.logic.as_ref().unwrap();
        assert_eq!(logic.kind, LogicKind::Implies);
        assert_eq!(logic.weight, 0.9);
        assert!(logic.learnable);

        assert_eq!(
            GraphEdge::attacks("a", "b", 0.7).logic.unwrap().kind,
            LogicKind::Attacks
        );
    }

    #[test]
    fn logic_meta_round_trips_through_json() {
        let meta = LogicMeta {
            kind: LogicKind::Attacks,
            weight: 0.8,
            op: LogicOp::And,
            learnable: false,
        };
        let text = serde_json::to_string(&meta).unwrap();
        assert!(text.contains("ATTACKS"));
        let back: LogicMeta = serde_json::from_str(&text).unwrap();
        assert_eq!(back, meta);
    }

    #[test]
    fn unknown_logic_kind_is_tolerated() {
        let meta: LogicMeta = serde_json::from_str(r#"{"type": "ENTAILS"}"#).unwrap();
        assert_eq!(meta.kind, LogicKind::Unknown);
        assert_eq!(meta.weight, 1.0);
    }
}
