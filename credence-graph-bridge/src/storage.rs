//! The storage collaborator: the async trait the bridge consumes, plus an
//! in-memory adapter backed by a petgraph topology.
//!
//! The bridge never loads a whole database — it works on bounded BFS
//! neighbourhoods fetched through this interface, and writes truth values
//! back in bulk.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use indexmap::IndexMap;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use tracing::debug;

use credence_logic::clamp;

use crate::errors::{BridgeError, BridgeResult};
use crate::types::{GraphEdge, GraphNode, NodeUpdate};

/// Storage collaborator consumed by the bridge.
///
/// `get_neighborhood` performs a BFS up to `depth` hops from the centre and
/// returns both endpoints of every included edge. `bulk_update_nodes` is an
/// idempotent truth-value write-back.
#[allow(async_fn_in_trait)]
pub trait GraphStore: Send + Sync {
    async fn get_node(&self, id: &str) -> BridgeResult<Option<GraphNode>>;

    async fn get_neighborhood(
        &self,
        center_id: &str,
        depth: usize,
    ) -> BridgeResult<(Vec<GraphNode>, Vec<GraphEdge>)>;

    /// Apply truth-value updates; unknown ids are skipped. Returns the
    /// number of nodes actually updated.
    async fn bulk_update_nodes(&self, updates: &[NodeUpdate]) -> BridgeResult<usize>;
}

/// In-memory graph store.
///
/// Node and edge records are kept in id-keyed maps; the topology lives in a
/// `StableDiGraph` whose node weights are record ids, with a side table
/// from id to graph index. Interior mutability lets the async trait methods
/// take `&self` like any remote-store adapter would.
pub struct MemoryGraphStore {
    inner: Mutex<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    nodes: HashMap<String, GraphNode>,
    edges: IndexMap<String, GraphEdge>,
    topology: StableDiGraph<String, String>,
    node_index: HashMap<String, NodeIndex>,
}

impl Default for MemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
        }
    }

    /// Build a store pre-populated with nodes and edges.
    pub fn with_contents(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> BridgeResult<Self> {
        let store = Self::new();
        for node in nodes {
            store.insert_node(node)?;
        }
        for edge in edges {
            store.insert_edge(edge)?;
        }
        Ok(store)
    }

    /// Insert or replace a node.
    pub fn insert_node(&self, node: GraphNode) -> BridgeResult<()> {
        let mut inner = self.lock()?;
        if !inner.node_index.contains_key(&node.id) {
            let idx = inner.topology.add_node(node.id.clone());
            inner.node_index.insert(node.id.clone(), idx);
        }
        inner.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Insert an edge. Returns false (and stores nothing) when either
    /// endpoint is unknown.
    pub fn insert_edge(&self, edge: GraphEdge) -> BridgeResult<bool> {
        let mut inner = self.lock()?;
        let (Some(&source), Some(&target)) = (
            inner.node_index.get(&edge.source_id),
            inner.node_index.get(&edge.target_id),
        ) else {
            debug!(edge = %edge.id, "edge endpoint unknown; not stored");
            return Ok(false);
        };
        inner.topology.add_edge(source, target, edge.id.clone());
        inner.edges.insert(edge.id.clone(), edge);
        Ok(true)
    }

    pub fn node_count(&self) -> usize {
        self.lock().map(|inner| inner.nodes.len()).unwrap_or(0)
    }

    /// Current truth value of a node, if present.
    pub fn truth_value(&self, id: &str) -> Option<f64> {
        self.lock()
            .ok()
            .and_then(|inner| inner.nodes.get(id).map(|n| n.truth_value))
    }

    fn lock(&self) -> BridgeResult<MutexGuard<'_, StoreInner>> {
        self.inner
            .lock()
            .map_err(|_| BridgeError::Storage("store mutex poisoned".to_string()))
    }
}

impl GraphStore for MemoryGraphStore {
    async fn get_node(&self, id: &str) -> BridgeResult<Option<GraphNode>> {
        Ok(self.lock()?.nodes.get(id).cloned())
    }

    async fn get_neighborhood(
        &self,
        center_id: &str,
        depth: usize,
    ) -> BridgeResult<(Vec<GraphNode>, Vec<GraphEdge>)> {
        let inner = self.lock()?;
        let Some(&start) = inner.node_index.get(center_id) else {
            return Err(BridgeError::NodeNotFound {
                id: center_id.to_string(),
            });
        };

        // Bounded undirected BFS: collect every node within `depth` hops.
        let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
        let mut order: Vec<NodeIndex> = vec![start];
        let mut frontier: Vec<NodeIndex> = vec![start];
        for _ in 0..depth {
            let mut next = Vec::new();
            for &idx in &frontier {
                for neighbor in inner.topology.neighbors_undirected(idx) {
                    if visited.insert(neighbor) {
                        order.push(neighbor);
                        next.push(neighbor);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        let visited_ids: HashSet<&str> = order
            .iter()
            .filter_map(|&idx| inner.topology.node_weight(idx).map(String::as_str))
            .collect();

        let nodes: Vec<GraphNode> = order
            .iter()
            .filter_map(|&idx| inner.topology.node_weight(idx))
            .filter_map(|id| inner.nodes.get(id).cloned())
            .collect();

        // Only edges with both endpoints inside the neighbourhood.
        let edges: Vec<GraphEdge> = inner
            .edges
            .values()
            .filter(|e| {
                visited_ids.contains(e.source_id.as_str())
                    && visited_ids.contains(e.target_id.as_str())
            })
            .cloned()
            .collect();

        Ok((nodes, edges))
    }

    async fn bulk_update_nodes(&self, updates: &[NodeUpdate]) -> BridgeResult<usize> {
        let mut inner = self.lock()?;
        let mut updated = 0;
        for update in updates {
            match inner.nodes.get_mut(&update.id) {
                Some(node) => {
                    node.truth_value = clamp(update.truth_value);
                    updated += 1;
                }
                None => debug!(node = %update.id, "update for unknown node; skipped"),
            }
        }
        Ok(updated)
    }
}
