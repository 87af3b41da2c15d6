//! Advisory validation of schema documents.
//!
//! Operates on the raw JSON value, before deserialization, so it can report
//! every problem in one pass instead of stopping at the first serde error.
//! Validation is advisory: the engine itself tolerates partial data at
//! runtime, so a failed report is a diagnostic aid, not a gate.

use credence_logic::LogicOp;
use serde_json::Value;

const RULE_TYPES: [&str; 4] = ["IMPLICATION", "EQUIVALENCE", "CONJUNCTION", "DISJUNCTION"];
const CONSTRAINT_TYPES: [&str; 3] = ["ATTACK", "SUPPORT", "MUTEX"];

/// Outcome of validating a schema document.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

/// Validate a schema document against the document format.
pub fn validate_schema(doc: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(doc) = doc.as_object() else {
        report.push("document must be an object");
        return report;
    };

    if !doc.get("version").is_some_and(Value::is_string) {
        report.push("version: must be a string");
    }

    match doc.get("variables").and_then(Value::as_object) {
        None => report.push("variables: must be an object"),
        Some(variables) => {
            for (name, var) in variables {
                let Some(var) = var.as_object() else {
                    report.push(format!("variables.{name}: must be an object"));
                    continue;
                };
                if !matches!(
                    var.get("type").and_then(Value::as_str),
                    Some("bool" | "continuous")
                ) {
                    report.push(format!(
                        "variables.{name}.type: must be 'bool' or 'continuous'"
                    ));
                }
                if let Some(prior) = var.get("prior") {
                    if !is_unit_number(prior) {
                        report.push(format!(
                            "variables.{name}.prior: must be between 0 and 1"
                        ));
                    }
                }
            }
        }
    }

    match doc.get("rules").and_then(Value::as_array) {
        None => report.push("rules: must be a list"),
        Some(rules) => {
            for (i, rule) in rules.iter().enumerate() {
                let Some(rule) = rule.as_object() else {
                    report.push(format!("rules[{i}]: must be an object"));
                    continue;
                };
                if !rule.get("id").is_some_and(Value::is_string) {
                    report.push(format!("rules[{i}].id: must be a string"));
                }
                if !rule
                    .get("type")
                    .and_then(Value::as_str)
                    .is_some_and(|t| RULE_TYPES.contains(&t))
                {
                    report.push(format!("rules[{i}].type: must be one of {RULE_TYPES:?}"));
                }
                if !rule.get("inputs").is_some_and(Value::is_array) {
                    report.push(format!("rules[{i}].inputs: must be a list"));
                }
                if !rule.get("output").is_some_and(Value::is_string) {
                    report.push(format!("rules[{i}].output: must be a string"));
                }
                if let Some(weight) = rule.get("weight") {
                    if !is_unit_number(weight) {
                        report.push(format!("rules[{i}].weight: must be between 0 and 1"));
                    }
                }
                if let Some(op) = rule.get("op").and_then(Value::as_str) {
                    if let Err(e) = op.parse::<LogicOp>() {
                        report.push(format!("rules[{i}].op: {e}"));
                    }
                }
            }
        }
    }

    match doc.get("constraints").and_then(Value::as_array) {
        None => report.push("constraints: must be a list"),
        Some(constraints) => {
            for (i, constraint) in constraints.iter().enumerate() {
                let Some(constraint) = constraint.as_object() else {
                    report.push(format!("constraints[{i}]: must be an object"));
                    continue;
                };
                if !constraint.get("id").is_some_and(Value::is_string) {
                    report.push(format!("constraints[{i}].id: must be a string"));
                }
                if !constraint
                    .get("type")
                    .and_then(Value::as_str)
                    .is_some_and(|t| CONSTRAINT_TYPES.contains(&t))
                {
                    report.push(format!(
                        "constraints[{i}].type: must be one of {CONSTRAINT_TYPES:?}"
                    ));
                }
            }
        }
    }

    report
}

fn is_unit_number(value: &Value) -> bool {
    value.as_f64().is_some_and(|v| (0.0..=1.0).contains(&v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn well_formed_document_passes() {
        let doc = json!({
            "version": "1.0",
            "variables": {
                "rain": {"type": "bool", "prior": 0.3}
            },
            "rules": [{
                "id": "r1",
                "type": "IMPLICATION",
                "inputs": ["rain"],
                "output": "wet",
                "op": "IDENTITY",
                "weight": 0.9
            }],
            "constraints": [{
                "id": "c1",
                "type": "ATTACK",
                "source": "a",
                "target": "b"
            }]
        });
        let report = validate_schema(&doc);
        assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn each_section_is_checked() {
        let doc = json!({
            "variables": {
                "x": {"type": "fuzzy", "prior": 1.5}
            },
            "rules": [{
                "id": 7,
                "type": "ABDUCTION",
                "inputs": "rain",
                "output": [],
                "weight": -0.1,
                "op": "XOR"
            }],
            "constraints": [{"type": "UNDERCUT"}]
        });
        let report = validate_schema(&doc);
        assert!(!report.is_valid());
        let text = report.errors.join("\n");
        for needle in [
            "version",
            "variables.x.type",
            "variables.x.prior",
            "rules[0].id",
            "rules[0].type",
            "rules[0].inputs",
            "rules[0].output",
            "rules[0].weight",
            "rules[0].op",
            "constraints[0].id",
            "constraints[0].type",
        ] {
            assert!(text.contains(needle), "missing error for {needle}: {text}");
        }
    }

    #[test]
    fn non_object_document_is_rejected_outright() {
        let report = validate_schema(&json!([1, 2, 3]));
        assert_eq!(report.errors, ["document must be an object"]);
    }
}
