//! Canonical schemas shared by tests and benchmarks across the workspace.

use credence_core::{Constraint, Rule, Schema, Variable};

/// `A` (prior 0.3) implies `B` (prior 0.1) at weight 0.9.
pub fn single_implication() -> Schema {
    Schema::new()
        .variable("A", Variable::with_prior(0.3))
        .variable("B", Variable::with_prior(0.1))
        .rule(Rule::implication("a_to_b", "A", "B", 0.9))
}

/// `attacker` (prior 0.8) attacks `target` (prior 0.7) at weight 1.0.
pub fn attack_pair() -> Schema {
    Schema::new()
        .variable("attacker", Variable::with_prior(0.8))
        .variable("target", Variable::with_prior(0.7))
        .constraint(Constraint::attack("attack_1", "attacker", "target", 1.0))
}

/// rain → wet → slippery, weights 0.95 and 0.8.
pub fn causal_chain() -> Schema {
    Schema::new()
        .variable("rain", Variable::with_prior(0.2))
        .variable("wet", Variable::with_prior(0.1))
        .variable("slippery", Variable::with_prior(0.05))
        .rule(Rule::implication("rain_wet", "rain", "wet", 0.95))
        .rule(Rule::implication("wet_slip", "wet", "slippery", 0.8))
}

/// A single learnable rule `input → output` at weight 0.5.
pub fn learnable_link() -> Schema {
    Schema::new()
        .variable("input", Variable::with_prior(0.5))
        .variable("output", Variable::with_prior(0.5))
        .rule(Rule::implication("learnable", "input", "output", 0.5))
}

/// A linear implication chain of `len` variables, for benchmarks.
pub fn long_chain(len: usize) -> Schema {
    let mut schema = Schema::new();
    for i in 0..len {
        schema = schema.variable(format!("v{i}"), Variable::with_prior(0.1));
    }
    for i in 1..len {
        schema = schema.rule(Rule::implication(
            format!("r{i}"),
            format!("v{}", i - 1),
            format!("v{i}"),
            0.9,
        ));
    }
    schema
}
