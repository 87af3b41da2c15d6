//! # credence-graph-bridge
//!
//! Projects a bounded neighbourhood of a labelled property graph onto a
//! credence schema, runs inference over it, and routes evidence and
//! results through a stable node↔variable name mapping. This is the only
//! crate that knows both worlds: graph storage on one side, the synchronous
//! inference engine on the other.
//!
//! ## Modules
//! - `types` — graph records: nodes, logic-bearing edges, context subgraphs
//! - `storage` — the async storage collaborator trait and an in-memory
//!   adapter (petgraph topology, bounded BFS neighbourhoods)
//! - `mapping` — subgraph → schema translation and the name mapping
//! - `service` — the orchestrating bridge: fetch → infer → write back
//! - `grounding` — tag-based grounding of abstract rules to instances
//! - `errors` — `BridgeError` / `BridgeResult`
//!
//! Async appears only at the storage boundary (`fetch_context`,
//! `solve_context`); everything between the I/O edges is synchronous.

pub mod errors;
pub mod grounding;
pub mod mapping;
pub mod service;
pub mod storage;
pub mod types;

pub use errors::{BridgeError, BridgeResult};
pub use grounding::{ground_abstract_rules, AbstractRule};
pub use mapping::{node_variable_name, to_schema, variable_node_id};
pub use service::{run_local_inference, BridgeConfig, GraphBridge, NodeEvidence, NodeValues};
pub use storage::{GraphStore, MemoryGraphStore};
pub use types::{ContextGraph, GraphEdge, GraphNode, LogicKind, LogicMeta, NodeUpdate};
