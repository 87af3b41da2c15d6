//! Constraints: argumentation relations between variables.

use serde::{Deserialize, Serialize};

/// ATTACK pushes the target down, SUPPORT pushes it up, MUTEX normalises a
/// group so its total mass stays within 1. Unknown tags load as `Unknown`
/// and are skipped by the constraint pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintKind {
    Attack,
    Support,
    Mutex,
    #[serde(other)]
    Unknown,
}

/// A constraint target: one variable name, or a list (MUTEX groups).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstraintTarget {
    Single(String),
    Many(Vec<String>),
}

impl ConstraintTarget {
    /// The target names as a slice, regardless of shape.
    pub fn names(&self) -> &[String] {
        match self {
            ConstraintTarget::Single(name) => std::slice::from_ref(name),
            ConstraintTarget::Many(names) => names,
        }
    }
}

impl From<&str> for ConstraintTarget {
    fn from(name: &str) -> Self {
        ConstraintTarget::Single(name.to_string())
    }
}

/// A declarative constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
    pub source: String,
    pub target: ConstraintTarget,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_weight() -> f64 {
    1.0
}

impl Constraint {
    pub fn attack(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
        Self::new(id, ConstraintKind::Attack, source, target, weight)
    }

    pub fn support(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
        Self::new(id, ConstraintKind::Support, source, target, weight)
    }

    fn new(
        id: impl Into<String>,
        kind: ConstraintKind,
        source: impl Into<String>,
        target: impl Into<String>,
        weight: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            source: source.into(),
            target: ConstraintTarget::Single(target.into()),
            weight,
            description: None,
        }
    }
}
