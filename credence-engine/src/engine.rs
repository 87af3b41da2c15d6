//! The inference engine: state, indexes, and the two propagation passes.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use credence_core::{
    Constraint, ConstraintKind, EngineConfig, RuleType, Schema, VariableState,
};
use credence_logic::{clamp, equivalent, fuzzy_and, fuzzy_or, inhibit, mutex_normalize, support, TruthValue};

/// Variables clamped by the caller at the start of a run.
pub type Evidence = HashMap<String, TruthValue>;

/// Final values of all declared variables, in schema insertion order.
pub type InferenceOutput = IndexMap<String, TruthValue>;

/// Outcome of a single inference run.
#[derive(Debug, Clone)]
pub struct InferenceReport {
    pub values: InferenceOutput,
    /// Iterations actually consumed.
    pub iterations: usize,
    /// Whether the pass delta dropped below the convergence threshold.
    pub converged: bool,
}

/// Fuzzy inference engine over a loaded schema.
///
/// The schema is immutable input; the engine owns the mutable per-variable
/// state and a parallel vector of live rule weights (training mutates the
/// weights, never the schema). Variables are iterated in schema insertion
/// order — within a pass, updates are applied immediately, so later
/// variables observe earlier updates and the fixed point is
/// order-dependent. That order is canonical, not incidental.
pub struct InferenceEngine {
    config: EngineConfig,
    schema: Schema,
    /// Live rule weights, parallel to `schema.rules`.
    weights: Vec<f64>,
    states: IndexMap<String, VariableState>,
    /// Variable name → indices of rules that write it.
    output_rules: HashMap<String, Vec<usize>>,
    /// Variable name → indices of rules that read it.
    input_rules: HashMap<String, Vec<usize>>,
}

impl InferenceEngine {
    /// Load a schema with the default configuration.
    pub fn new(schema: Schema) -> Self {
        Self::with_config(schema, EngineConfig::default())
    }

    /// Load a schema.
    ///
    /// Duplicate rule or constraint ids follow replace-in-place semantics:
    /// the last definition wins, at the position of the first.
    pub fn with_config(mut schema: Schema, config: EngineConfig) -> Self {
        schema.rules = dedup_by_id(std::mem::take(&mut schema.rules), |r| r.id.as_str());
        schema.constraints = dedup_by_id(std::mem::take(&mut schema.constraints), |c| c.id.as_str());

        let states: IndexMap<String, VariableState> = schema
            .variables
            .iter()
            .map(|(name, var)| (name.clone(), VariableState::from_declaration(var)))
            .collect();

        let mut output_rules: HashMap<String, Vec<usize>> = schema
            .variables
            .keys()
            .map(|name| (name.clone(), Vec::new()))
            .collect();
        let mut input_rules = output_rules.clone();

        for (idx, rule) in schema.rules.iter().enumerate() {
            for input in &rule.inputs {
                if let Some(entries) = input_rules.get_mut(input) {
                    entries.push(idx);
                }
            }
            if let Some(entries) = output_rules.get_mut(&rule.output) {
                entries.push(idx);
            }
        }

        let weights = schema.rules.iter().map(|r| clamp(r.weight)).collect();

        Self {
            config,
            schema,
            weights,
            states,
            output_rules,
            input_rules,
        }
    }

    /// Run inference with evidence, returning all variable values.
    pub fn run(&mut self, evidence: &Evidence, iterations: Option<usize>) -> InferenceOutput {
        self.run_report(evidence, iterations).values
    }

    /// Run inference and report convergence alongside the values.
    ///
    /// Resets state to priors, locks evidence, then alternates forward and
    /// constraint passes until the pass delta falls strictly below the
    /// convergence threshold or the iteration cap is reached. With an
    /// explicit `iterations` the cap is `max(iterations, config cap)`.
    pub fn run_report(&mut self, evidence: &Evidence, iterations: Option<usize>) -> InferenceReport {
        let max_iter = match iterations {
            Some(n) => n.max(self.config.max_iterations),
            None => self.config.max_iterations,
        };

        self.reset_to_priors();
        for (name, value) in evidence {
            match self.states.get_mut(name) {
                Some(state) => {
                    state.value = clamp(*value);
                    state.locked = true;
                }
                None => debug!(variable = %name, "evidence names an undeclared variable; dropped"),
            }
        }

        let mut iterations_used = 0;
        let mut converged = false;
        for _ in 0..max_iter {
            let forward_delta = self.forward_pass();
            let constraint_delta = self.constraint_pass();
            iterations_used += 1;

            // The forward delta is already damped; convergence keys on it,
            // not on the raw rule contributions.
            if forward_delta.max(constraint_delta) < self.config.convergence_threshold {
                converged = true;
                break;
            }
        }
        debug!(iterations = iterations_used, converged, "inference finished");

        InferenceReport {
            values: self.export_state(),
            iterations: iterations_used,
            converged,
        }
    }

    /// Run inference and return one variable's value (0.5 if undeclared).
    pub fn query(&mut self, variable: &str, evidence: &Evidence) -> TruthValue {
        self.run(evidence, None)
            .get(variable)
            .copied()
            .unwrap_or(0.5)
    }

    /// Restore every variable's value and locked flag from its declaration.
    ///
    /// State after construction equals state after this call.
    pub fn reset_to_priors(&mut self) {
        for (name, var) in &self.schema.variables {
            if let Some(state) = self.states.get_mut(name) {
                state.value = clamp(var.prior);
                state.locked = var.locked;
            }
        }
    }

    /// One pass over all variables in insertion order, combining the
    /// contributions of the rules that write each variable and damping the
    /// result against the pre-pass value. Returns the largest damped change.
    fn forward_pass(&mut self) -> f64 {
        let mut max_delta = 0.0f64;
        let names: Vec<String> = self.states.keys().cloned().collect();

        for name in &names {
            let Some(rule_indices) = self.output_rules.get(name) else {
                continue;
            };
            if rule_indices.is_empty() {
                continue;
            }
            if self.states.get(name).map_or(true, |s| s.locked) {
                continue;
            }

            let mut contributions: Vec<TruthValue> = Vec::new();
            let mut contribution_weights: Vec<f64> = Vec::new();
            for &idx in rule_indices {
                if let Some(value) = self.evaluate_rule(idx) {
                    contributions.push(value);
                    contribution_weights.push(self.weights[idx]);
                }
            }
            if contributions.is_empty() {
                continue;
            }

            let total_weight: f64 = contribution_weights.iter().sum();
            if total_weight <= 0.0 {
                // All contributing rules carry zero weight: no update.
                continue;
            }
            let combined: f64 = contributions
                .iter()
                .zip(&contribution_weights)
                .map(|(c, w)| c * w)
                .sum::<f64>()
                / total_weight;

            let alpha = self.config.damping_factor;
            let Some(state) = self.states.get_mut(name) else {
                continue;
            };
            let old = state.value;
            state.value = clamp(alpha * combined + (1.0 - alpha) * old);
            max_delta = max_delta.max((state.value - old).abs());
        }

        max_delta
    }

    /// Evaluate one rule against current state. `None` means the rule
    /// contributes nothing: an input is undeclared, the type is unknown, or
    /// an equivalence has no inputs.
    fn evaluate_rule(&self, idx: usize) -> Option<TruthValue> {
        let rule = &self.schema.rules[idx];

        let mut input_values: Vec<TruthValue> = Vec::with_capacity(rule.inputs.len());
        for input in &rule.inputs {
            input_values.push(self.states.get(input)?.value);
        }
        let weight = self.weights[idx];

        let result = match rule.rule_type {
            RuleType::Implication => rule.op.apply(&input_values, None) * weight,
            RuleType::Conjunction => fuzzy_and(&input_values) * weight,
            RuleType::Disjunction => fuzzy_or(&input_values) * weight,
            RuleType::Equivalence => match input_values.as_slice() {
                [a, b, ..] => equivalent(*a, *b) * weight,
                [single] => single * weight,
                [] => return None,
            },
            RuleType::Unknown => return None,
        };

        Some(clamp(result))
    }

    /// Apply all constraints in insertion order. Returns the largest change.
    fn constraint_pass(&mut self) -> f64 {
        let mut max_delta = 0.0f64;

        for i in 0..self.schema.constraints.len() {
            let Constraint {
                kind,
                source,
                target,
                weight,
                ..
            } = self.schema.constraints[i].clone();

            let Some(source_value) = self.states.get(&source).map(|s| s.value) else {
                continue;
            };

            match kind {
                ConstraintKind::Attack => {
                    for target_name in target.names() {
                        max_delta = max_delta.max(self.nudge_target(target_name, |old| {
                            inhibit(old, source_value, weight)
                        }));
                    }
                }
                ConstraintKind::Support => {
                    for target_name in target.names() {
                        max_delta = max_delta.max(self.nudge_target(target_name, |old| {
                            support(old, source_value, weight)
                        }));
                    }
                }
                ConstraintKind::Mutex => {
                    max_delta = max_delta.max(self.normalize_group(target.names()));
                }
                ConstraintKind::Unknown => {}
            }
        }

        max_delta
    }

    /// Rewrite one unlocked target through `update`, returning the change.
    fn nudge_target(&mut self, name: &str, update: impl Fn(TruthValue) -> TruthValue) -> f64 {
        let Some(state) = self.states.get_mut(name) else {
            return 0.0;
        };
        if state.locked {
            return 0.0;
        }
        let old = state.value;
        state.value = update(old);
        (state.value - old).abs()
    }

    /// Mutex-normalise a group of variables so their mass stays within 1.
    /// Locked members contribute to the group mass but are not rewritten.
    fn normalize_group(&mut self, names: &[String]) -> f64 {
        let resolved: Vec<(&String, TruthValue)> = names
            .iter()
            .filter_map(|n| self.states.get(n).map(|s| (n, s.value)))
            .collect();
        if resolved.is_empty() {
            return 0.0;
        }

        let values: Vec<TruthValue> = resolved.iter().map(|(_, v)| *v).collect();
        let normalized = mutex_normalize(&values);

        let mut max_delta = 0.0f64;
        let updates: Vec<(String, TruthValue)> = resolved
            .iter()
            .zip(&normalized)
            .map(|((name, _), new)| ((*name).clone(), *new))
            .collect();
        for (name, new_value) in updates {
            max_delta = max_delta.max(self.nudge_target(&name, |_| new_value));
        }
        max_delta
    }

    // ── State and weight accessors ──

    /// Current value of a variable.
    pub fn get_value(&self, variable: &str) -> Option<TruthValue> {
        self.states.get(variable).map(|s| s.value)
    }

    /// Set a variable's value. No-op (false) when unknown or locked.
    pub fn set_value(&mut self, variable: &str, value: TruthValue) -> bool {
        match self.states.get_mut(variable) {
            Some(state) if !state.locked => {
                state.value = clamp(value);
                true
            }
            _ => false,
        }
    }

    /// Lock a variable at a value, regardless of its current lock state.
    pub fn lock_variable(&mut self, variable: &str, value: TruthValue) -> bool {
        match self.states.get_mut(variable) {
            Some(state) => {
                state.value = clamp(value);
                state.locked = true;
                true
            }
            None => false,
        }
    }

    /// Live weight of a rule.
    pub fn get_rule_weight(&self, rule_id: &str) -> Option<f64> {
        self.rule_position(rule_id).map(|idx| self.weights[idx])
    }

    /// Set a rule's live weight (clamped). False when the id is unknown.
    pub fn set_rule_weight(&mut self, rule_id: &str, weight: f64) -> bool {
        match self.rule_position(rule_id) {
            Some(idx) => {
                self.weights[idx] = clamp(weight);
                true
            }
            None => false,
        }
    }

    /// Declared variable names, in insertion order.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    /// Rule ids, in schema order.
    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.schema.rules.iter().map(|r| r.id.as_str())
    }

    /// Ids of the rules that write `variable`.
    pub fn rules_for_output(&self, variable: &str) -> Vec<&str> {
        self.rule_id_list(self.output_rules.get(variable))
    }

    /// Ids of the rules that read `variable`.
    pub fn rules_with_input(&self, variable: &str) -> Vec<&str> {
        self.rule_id_list(self.input_rules.get(variable))
    }

    fn rule_id_list(&self, indices: Option<&Vec<usize>>) -> Vec<&str> {
        indices
            .map(|list| {
                list.iter()
                    .map(|&idx| self.schema.rules[idx].id.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn rule_position(&self, rule_id: &str) -> Option<usize> {
        self.schema.rules.iter().position(|r| r.id == rule_id)
    }

    /// The schema with live (possibly trained) weights written back.
    pub fn export(&self) -> Schema {
        let mut schema = self.schema.clone();
        for (rule, weight) in schema.rules.iter_mut().zip(&self.weights) {
            rule.weight = *weight;
        }
        schema
    }

    /// Current values of all variables, in insertion order.
    pub fn export_state(&self) -> InferenceOutput {
        self.states
            .iter()
            .map(|(name, state)| (name.clone(), state.value))
            .collect()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn output_rule_indices(&self, variable: &str) -> Option<&Vec<usize>> {
        self.output_rules.get(variable)
    }

    pub(crate) fn rule_shape(&self, idx: usize) -> &credence_core::Rule {
        &self.schema.rules[idx]
    }

    pub(crate) fn state_value(&self, variable: &str) -> Option<TruthValue> {
        self.states.get(variable).map(|s| s.value)
    }

    pub(crate) fn learning_rate(&self) -> f64 {
        self.config.learning_rate
    }

    pub(crate) fn bump_weight(&mut self, idx: usize, delta: f64) {
        self.weights[idx] = clamp(self.weights[idx] + delta);
    }
}

/// Replace-in-place id dedup: last definition wins, first position kept.
fn dedup_by_id<T, F>(items: Vec<T>, id_of: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    let mut positions: HashMap<String, usize> = HashMap::new();
    for item in items {
        match positions.get(id_of(&item)) {
            Some(&pos) => out[pos] = item,
            None => {
                positions.insert(id_of(&item).to_string(), out.len());
                out.push(item);
            }
        }
    }
    out
}
