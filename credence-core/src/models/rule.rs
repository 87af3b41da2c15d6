//! Rules: weighted logical relationships between variables.

use serde::{Deserialize, Serialize};

use credence_logic::LogicOp;

/// The four rule families, plus a tolerated catch-all.
///
/// Unknown tags deserialize to `Unknown` so a schema carrying a rule type
/// this engine does not understand still loads; such rules simply
/// contribute nothing during inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    Implication,
    Conjunction,
    Disjunction,
    Equivalence,
    #[serde(other)]
    Unknown,
}

/// A declarative rule. The `weight` field is the rule's *initial* weight;
/// the engine keeps the live (possibly trained) weight separately so the
/// schema stays shareable and immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    #[serde(default)]
    pub inputs: Vec<String>,
    pub output: String,
    #[serde(default)]
    pub op: LogicOp,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default = "default_learnable")]
    pub learnable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_weight() -> f64 {
    1.0
}

fn default_learnable() -> bool {
    true
}

impl Rule {
    /// An IMPLICATION rule with the IDENTITY operator — the most common
    /// shape (single antecedent, pass-through).
    pub fn implication(id: impl Into<String>, input: impl Into<String>, output: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            rule_type: RuleType::Implication,
            inputs: vec![input.into()],
            output: output.into(),
            op: LogicOp::Identity,
            weight,
            learnable: true,
            description: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_weight_learnable_op() {
        let rule: Rule = serde_json::from_str(
            r#"{"id": "r1", "type": "IMPLICATION", "inputs": ["a"], "output": "b"}"#,
        )
        .unwrap();
        assert_eq!(rule.weight, 1.0);
        assert!(rule.learnable);
        assert_eq!(rule.op, LogicOp::Identity);
    }

    #[test]
    fn unknown_type_tag_is_tolerated() {
        let rule: Rule = serde_json::from_str(
            r#"{"id": "r1", "type": "ABDUCTION", "inputs": [], "output": "b"}"#,
        )
        .unwrap();
        assert_eq!(rule.rule_type, RuleType::Unknown);
    }
}
