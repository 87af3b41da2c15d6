//! The orchestrating bridge service: fetch → schema → inference → write-back.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, info};

use credence_core::EngineConfig;
use credence_engine::{Evidence, InferenceEngine};
use credence_logic::TruthValue;

use crate::errors::{BridgeError, BridgeResult};
use crate::grounding::{self, AbstractRule};
use crate::mapping::{node_variable_name, to_schema, variable_node_id};
use crate::storage::{GraphStore, MemoryGraphStore};
use crate::types::{ContextGraph, GraphEdge, GraphNode, NodeUpdate};

/// Node-id-keyed evidence.
pub type NodeEvidence = HashMap<String, TruthValue>;

/// Node-id-keyed inference results, in subgraph insertion order.
pub type NodeValues = IndexMap<String, TruthValue>;

/// Bridge configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Neighbourhood radius (hops) used by callers that do not pass one.
    pub default_depth: usize,
    /// Engine configuration applied to every inference call.
    pub engine: EngineConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            default_depth: 2,
            engine: EngineConfig {
                max_iterations: 50,
                ..EngineConfig::default()
            },
        }
    }
}

/// Bridges a property-graph store and the inference engine.
///
/// The storage collaborator is optional: a detached bridge can still
/// translate subgraphs and run inference over in-memory data, but the
/// storage-requiring operations (`fetch_context`, `solve_context`) return
/// [`BridgeError::StorageNotConfigured`].
pub struct GraphBridge<S = MemoryGraphStore> {
    store: Option<S>,
    config: BridgeConfig,
}

impl GraphBridge<MemoryGraphStore> {
    /// A bridge with no storage attached.
    pub fn detached() -> Self {
        Self {
            store: None,
            config: BridgeConfig::default(),
        }
    }
}

impl<S: GraphStore> GraphBridge<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, BridgeConfig::default())
    }

    pub fn with_config(store: S, config: BridgeConfig) -> Self {
        Self {
            store: Some(store),
            config,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Update the bridge configuration in place.
    pub fn config_mut(&mut self) -> &mut BridgeConfig {
        &mut self.config
    }

    /// Project a subgraph onto an engine schema without running anything.
    pub fn to_schema(&self, context: &ContextGraph) -> credence_core::Schema {
        to_schema(context)
    }

    /// Assemble a context subgraph from in-memory nodes and edges.
    pub fn extract_context(
        &self,
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
        center_id: impl Into<String>,
    ) -> ContextGraph {
        ContextGraph::new(nodes, edges, center_id)
    }

    /// Fetch a bounded neighbourhood around `center_id` from storage.
    /// Without an explicit `depth`, the configured default radius applies.
    pub async fn fetch_context(
        &self,
        center_id: &str,
        depth: Option<usize>,
    ) -> BridgeResult<ContextGraph> {
        let store = self.require_store()?;
        let depth = depth.unwrap_or(self.config.default_depth);
        let (nodes, edges) = store.get_neighborhood(center_id, depth).await?;
        debug!(
            center = center_id,
            depth,
            nodes = nodes.len(),
            edges = edges.len(),
            "fetched context"
        );
        Ok(ContextGraph::new(nodes, edges, center_id))
    }

    /// Run inference over a subgraph.
    ///
    /// Evidence keys are node ids; keys naming nodes outside the subgraph
    /// are dropped. The result maps every node id to its inferred truth
    /// value.
    pub fn run_inference(
        &self,
        context: &ContextGraph,
        evidence: &NodeEvidence,
        iterations: Option<usize>,
    ) -> NodeValues {
        let schema = to_schema(context);
        let mut engine = InferenceEngine::with_config(schema, self.config.engine.clone());

        let mut variable_evidence = Evidence::new();
        for (node_id, value) in evidence {
            if context.nodes.contains_key(node_id) {
                variable_evidence.insert(node_variable_name(node_id), *value);
            } else {
                debug!(node = %node_id, "evidence for node outside subgraph; dropped");
            }
        }

        let result = engine.run(&variable_evidence, iterations);

        let mut node_values = NodeValues::new();
        for (variable, value) in result {
            match variable_node_id(&variable) {
                Some(node_id) => {
                    node_values.insert(node_id.to_string(), value);
                }
                None => debug!(variable = %variable, "result variable outside name map; dropped"),
            }
        }
        node_values
    }

    /// Fetch, infer, and optionally write truth values back to storage.
    pub async fn solve_context(
        &self,
        center_id: &str,
        depth: Option<usize>,
        evidence: &NodeEvidence,
        write_back: bool,
    ) -> BridgeResult<NodeValues> {
        let context = self.fetch_context(center_id, depth).await?;
        let results = self.run_inference(&context, evidence, None);

        if write_back {
            let store = self.require_store()?;
            let updates: Vec<NodeUpdate> = results
                .iter()
                .map(|(id, value)| NodeUpdate {
                    id: id.clone(),
                    truth_value: *value,
                })
                .collect();
            let written = store.bulk_update_nodes(&updates).await?;
            info!(center = center_id, written, "context solved and written back");
        } else {
            info!(center = center_id, "context solved");
        }

        Ok(results)
    }

    /// Truth value of one node under evidence (0.5 when the node is
    /// outside the subgraph).
    pub fn query_node(
        &self,
        context: &ContextGraph,
        node_id: &str,
        evidence: &NodeEvidence,
    ) -> TruthValue {
        self.run_inference(context, evidence, None)
            .get(node_id)
            .copied()
            .unwrap_or(0.5)
    }

    /// Instantiate abstract tag-level rules against the subgraph's nodes.
    pub fn ground_abstract_rules(
        &self,
        context: &ContextGraph,
        rules: &[AbstractRule],
    ) -> ContextGraph {
        grounding::ground_abstract_rules(context, rules)
    }

    fn require_store(&self) -> BridgeResult<&S> {
        self.store.as_ref().ok_or(BridgeError::StorageNotConfigured)
    }
}

/// One-shot inference over in-memory nodes and edges, without a bridge or
/// storage. The first node anchors the derived context.
pub fn run_local_inference(
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    evidence: &NodeEvidence,
) -> NodeValues {
    let center_id = nodes.first().map(|n| n.id.clone()).unwrap_or_default();
    let bridge = GraphBridge::detached();
    let context = bridge.extract_context(nodes, edges, center_id);
    bridge.run_inference(&context, evidence, None)
}
