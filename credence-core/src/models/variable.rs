//! Variable declarations and their runtime state.

use serde::{Deserialize, Serialize};

use credence_logic::TruthValue;

/// Advisory kind tag for a variable. Both kinds behave identically
/// numerically; the tag documents intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    #[default]
    Bool,
    Continuous,
}

/// A declared propositional variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Variable {
    #[serde(rename = "type")]
    pub kind: VariableKind,
    /// Truth value in the absence of evidence and rule contributions.
    pub prior: TruthValue,
    /// When true, inference never overwrites this variable's value.
    pub locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for Variable {
    fn default() -> Self {
        Self {
            kind: VariableKind::Bool,
            prior: 0.5,
            locked: false,
            description: None,
        }
    }
}

impl Variable {
    /// A bool variable with the given prior.
    pub fn with_prior(prior: TruthValue) -> Self {
        Self {
            prior,
            ..Self::default()
        }
    }
}

/// Runtime state of a variable, owned by the engine.
///
/// `lower`/`upper` are reserved for interval inference and default to the
/// full unit interval; nothing consults them yet.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableState {
    pub value: TruthValue,
    pub locked: bool,
    pub lower: TruthValue,
    pub upper: TruthValue,
}

impl Default for VariableState {
    fn default() -> Self {
        Self {
            value: 0.5,
            locked: false,
            lower: 0.0,
            upper: 1.0,
        }
    }
}

impl VariableState {
    /// Initial state for a declaration: value at prior, locked flag copied.
    pub fn from_declaration(var: &Variable) -> Self {
        Self {
            value: credence_logic::clamp(var.prior),
            locked: var.locked,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_defaults() {
        let var: Variable = serde_json::from_str("{}").unwrap();
        assert_eq!(var.kind, VariableKind::Bool);
        assert_eq!(var.prior, 0.5);
        assert!(!var.locked);
    }

    #[test]
    fn state_copies_prior_and_lock() {
        let var: Variable = serde_json::from_str(r#"{"prior": 0.8, "locked": true}"#).unwrap();
        let state = VariableState::from_declaration(&var);
        assert_eq!(state.value, 0.8);
        assert!(state.locked);
        assert_eq!((state.lower, state.upper), (0.0, 1.0));
    }

    #[test]
    fn out_of_range_prior_is_clamped_into_state() {
        let var = Variable::with_prior(1.7);
        assert_eq!(VariableState::from_declaration(&var).value, 1.0);
    }
}
