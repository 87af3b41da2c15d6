//! The schema document: the complete declarative description of a logic
//! graph, round-trippable through serde.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Constraint, Rule, Variable};

/// A complete logic-graph schema.
///
/// Variables live in an `IndexMap`: keyed by name, iterated in insertion
/// order. The engine's forward pass walks them in exactly this order, and
/// the fixed point it converges to depends on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub variables: IndexMap<String, Variable>,
    pub rules: Vec<Rule>,
    pub constraints: Vec<Constraint>,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, Value>,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            description: None,
            variables: IndexMap::new(),
            rules: Vec::new(),
            constraints: Vec::new(),
            metadata: serde_json::Map::new(),
        }
    }
}

impl Schema {
    /// An empty schema with the current document version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fluent helper: add a variable.
    pub fn variable(mut self, name: impl Into<String>, var: Variable) -> Self {
        self.variables.insert(name.into(), var);
        self
    }

    /// Fluent helper: add a rule.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Fluent helper: add a constraint.
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}
