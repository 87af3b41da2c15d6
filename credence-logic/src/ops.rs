//! Łukasiewicz operators and the operator dispatcher.
//!
//! The T-norm family here is the bounded-sum one: conjunction is
//! `max(0, Σaᵢ − (n−1))`, disjunction is `min(1, Σaᵢ)`, implication is
//! `min(1, 1 − a + b)`. Attack and support are the asymmetric argumentation
//! updates; mutex normalisation rescales a group whose mass exceeds 1.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A degree of belief in `[0, 1]`.
pub type TruthValue = f64;

/// Error raised when an operator tag does not name a known `LogicOp`.
///
/// This is a programming error (bad caller input), not data tolerance:
/// unresolved *variable* names are silently skipped, unknown *operator*
/// names are surfaced.
#[derive(Debug, thiserror::Error)]
pub enum LogicError {
    #[error("unknown logic operator: {name}")]
    UnknownOperator { name: String },
}

/// Clamp a value to the `[0, 1]` range.
pub fn clamp(value: TruthValue) -> TruthValue {
    value.clamp(0.0, 1.0)
}

/// Whether `value` is a finite truth value in `[0, 1]`.
pub fn is_valid_truth_value(value: TruthValue) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

/// Fuzzy negation: `¬a = 1 − a`.
pub fn fuzzy_not(a: TruthValue) -> TruthValue {
    clamp(1.0 - a)
}

/// Łukasiewicz conjunction: `max(0, Σaᵢ − (n−1))`.
///
/// The empty conjunction is 1.0 (vacuous truth); a single input passes
/// through unchanged.
pub fn fuzzy_and(values: &[TruthValue]) -> TruthValue {
    match values {
        [] => 1.0,
        [single] => clamp(*single),
        _ => {
            let sum: f64 = values.iter().sum();
            clamp(sum - (values.len() as f64 - 1.0))
        }
    }
}

/// Łukasiewicz disjunction: `min(1, Σaᵢ)`. The empty disjunction is 0.0.
pub fn fuzzy_or(values: &[TruthValue]) -> TruthValue {
    if values.is_empty() {
        return 0.0;
    }
    clamp(values.iter().sum())
}

/// Łukasiewicz implication: `a → b = min(1, 1 − a + b)`.
pub fn implies(antecedent: TruthValue, consequent: TruthValue) -> TruthValue {
    clamp(1.0 - antecedent + consequent)
}

/// Fuzzy equivalence: `a ↔ b = 1 − |a − b|`.
pub fn equivalent(a: TruthValue, b: TruthValue) -> TruthValue {
    clamp(1.0 - (a - b).abs())
}

/// Weighted mean of `values` by `weights`.
///
/// Returns the neutral prior 0.5 when the inputs are empty, the lengths
/// disagree, or the total weight is zero.
pub fn weighted_mean(values: &[TruthValue], weights: &[f64]) -> TruthValue {
    if values.is_empty() || values.len() != weights.len() {
        return 0.5;
    }
    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return 0.5;
    }
    let weighted_sum: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    clamp(weighted_sum / total_weight)
}

/// Attack: the target is pushed down proportionally to the source.
///
/// `target ← target · (1 − source · weight)`
pub fn inhibit(target: TruthValue, source: TruthValue, weight: f64) -> TruthValue {
    clamp(target * (1.0 - source * weight))
}

/// Support: the target is pushed up through its remaining headroom.
///
/// `target ← target + (1 − target) · source · weight`
pub fn support(target: TruthValue, source: TruthValue, weight: f64) -> TruthValue {
    clamp(target + (1.0 - target) * source * weight)
}

/// Mutual-exclusion normalisation.
///
/// If the group's mass `Σvᵢ` is at most 1 the values are returned clamped;
/// otherwise each is rescaled to `vᵢ / Σvᵢ` so the group sums to 1.
pub fn mutex_normalize(values: &[TruthValue]) -> Vec<TruthValue> {
    let sum: f64 = values.iter().sum();
    if sum <= 1.0 {
        values.iter().copied().map(clamp).collect()
    } else {
        values.iter().map(|v| clamp(v / sum)).collect()
    }
}

/// Multi-input operator applied to a rule's antecedents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicOp {
    /// Pass-through: the first input (0.5 when there are none).
    #[default]
    Identity,
    /// Łukasiewicz conjunction over all inputs.
    And,
    /// Łukasiewicz disjunction over all inputs.
    Or,
    /// Negation of the first input (0.5 when there are none).
    Not,
    /// Weighted mean when per-input weights are supplied and match the
    /// input count; unweighted mean otherwise; 0.5 on no inputs.
    Weighted,
}

impl LogicOp {
    /// All operator tags, in wire form.
    pub const ALL: [&'static str; 5] = ["IDENTITY", "AND", "OR", "NOT", "WEIGHTED"];

    /// The wire tag for this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            LogicOp::Identity => "IDENTITY",
            LogicOp::And => "AND",
            LogicOp::Or => "OR",
            LogicOp::Not => "NOT",
            LogicOp::Weighted => "WEIGHTED",
        }
    }

    /// Dispatch this operator over `inputs`.
    ///
    /// `weights` is only consulted by `Weighted`; pass `None` elsewhere.
    pub fn apply(self, inputs: &[TruthValue], weights: Option<&[f64]>) -> TruthValue {
        match self {
            LogicOp::Identity => inputs.first().copied().map(clamp).unwrap_or(0.5),
            LogicOp::And => fuzzy_and(inputs),
            LogicOp::Or => fuzzy_or(inputs),
            LogicOp::Not => fuzzy_not(inputs.first().copied().unwrap_or(0.5)),
            LogicOp::Weighted => match weights {
                Some(w) if w.len() == inputs.len() && !inputs.is_empty() => {
                    weighted_mean(inputs, w)
                }
                _ if inputs.is_empty() => 0.5,
                _ => clamp(inputs.iter().sum::<f64>() / inputs.len() as f64),
            },
        }
    }
}

impl FromStr for LogicOp {
    type Err = LogicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IDENTITY" => Ok(LogicOp::Identity),
            "AND" => Ok(LogicOp::And),
            "OR" => Ok(LogicOp::Or),
            "NOT" => Ok(LogicOp::Not),
            "WEIGHTED" => Ok(LogicOp::Weighted),
            other => Err(LogicError::UnknownOperator {
                name: other.to_string(),
            }),
        }
    }
}

/// Dispatch an operator by wire tag. Unknown tags are a `LogicError`.
pub fn apply_operation(
    op: &str,
    inputs: &[TruthValue],
    weights: Option<&[f64]>,
) -> Result<TruthValue, LogicError> {
    Ok(op.parse::<LogicOp>()?.apply(inputs, weights))
}
