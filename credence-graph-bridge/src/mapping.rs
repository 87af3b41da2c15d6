//! Subgraph → schema translation and the node↔variable name mapping.
//!
//! The forward map is injective (variable names embed node ids); the
//! inverse is total on names the forward map produces and undefined
//! elsewhere. Keys that fail to map in either direction are dropped, never
//! errors.

use tracing::debug;

use credence_core::{Constraint, ConstraintKind, ConstraintTarget, Rule, RuleType, Schema, Variable, VariableKind};

use crate::types::{ContextGraph, LogicKind};

const VARIABLE_PREFIX: &str = "node_";

/// Variable name for a node id. Deterministic and injective.
pub fn node_variable_name(node_id: &str) -> String {
    format!("{VARIABLE_PREFIX}{node_id}")
}

/// Node id for a variable name; `None` outside the forward map's image.
pub fn variable_node_id(name: &str) -> Option<&str> {
    name.strip_prefix(VARIABLE_PREFIX)
}

/// First eight characters of a record id, for compact derived identifiers.
fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Project a context subgraph onto a schema.
///
/// Every node becomes a variable (prior and locked flag copied). Every
/// edge with logic metadata whose endpoints are both present becomes a rule
/// or constraint by kind:
///
/// | edge kind | schema element |
/// |---|---|
/// | IMPLIES  | IMPLICATION rule, operator and weight from the edge |
/// | ATTACKS  | ATTACK constraint |
/// | SUPPORTS | SUPPORT constraint |
/// | DEPENDS  | IMPLICATION rule at half weight |
/// | MUTEX    | MUTEX constraint |
///
/// Edges without logic metadata, with dangling endpoints, or with an
/// unknown kind are ignored.
pub fn to_schema(context: &ContextGraph) -> Schema {
    let mut schema = Schema::new();
    schema.name = Some(format!("context_{}", short_id(&context.center_id)));

    for (node_id, node) in &context.nodes {
        schema.variables.insert(
            node_variable_name(node_id),
            Variable {
                kind: VariableKind::Bool,
                prior: node.prior,
                locked: node.is_locked,
                description: None,
            },
        );
    }

    let mut rule_counter = 0usize;
    let mut constraint_counter = 0usize;

    for edge in context.edges.values() {
        let Some(logic) = &edge.logic else {
            continue;
        };
        if !context.nodes.contains_key(&edge.source_id)
            || !context.nodes.contains_key(&edge.target_id)
        {
            debug!(edge = %edge.id, "edge endpoint outside subgraph; skipped");
            continue;
        }

        let source_var = node_variable_name(&edge.source_id);
        let target_var = node_variable_name(&edge.target_id);

        match logic.kind {
            LogicKind::Implies => {
                rule_counter += 1;
                schema.rules.push(Rule {
                    id: format!("rule_{rule_counter}_{}", short_id(&edge.id)),
                    rule_type: RuleType::Implication,
                    inputs: vec![source_var],
                    output: target_var,
                    op: logic.op,
                    weight: logic.weight,
                    learnable: logic.learnable,
                    description: None,
                });
            }
            LogicKind::Depends => {
                // Dependency is a weaker implication.
                rule_counter += 1;
                schema.rules.push(Rule {
                    id: format!("depends_{rule_counter}_{}", short_id(&edge.id)),
                    rule_type: RuleType::Implication,
                    inputs: vec![source_var],
                    output: target_var,
                    op: logic.op,
                    weight: logic.weight * 0.5,
                    learnable: logic.learnable,
                    description: None,
                });
            }
            LogicKind::Attacks => {
                constraint_counter += 1;
                schema.constraints.push(Constraint {
                    id: format!("attack_{constraint_counter}_{}", short_id(&edge.id)),
                    kind: ConstraintKind::Attack,
                    source: source_var,
                    target: ConstraintTarget::Single(target_var),
                    weight: logic.weight,
                    description: None,
                });
            }
            LogicKind::Supports => {
                constraint_counter += 1;
                schema.constraints.push(Constraint {
                    id: format!("support_{constraint_counter}_{}", short_id(&edge.id)),
                    kind: ConstraintKind::Support,
                    source: source_var,
                    target: ConstraintTarget::Single(target_var),
                    weight: logic.weight,
                    description: None,
                });
            }
            LogicKind::Mutex => {
                constraint_counter += 1;
                schema.constraints.push(Constraint {
                    id: format!("mutex_{constraint_counter}_{}", short_id(&edge.id)),
                    kind: ConstraintKind::Mutex,
                    source: source_var.clone(),
                    target: ConstraintTarget::Many(vec![source_var, target_var]),
                    weight: logic.weight,
                    description: None,
                });
            }
            LogicKind::Unknown => {}
        }
    }

    schema
}
