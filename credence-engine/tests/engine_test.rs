//! Inference scenarios: rule propagation, constraints, evidence semantics,
//! accessors, and export round-trips.

use credence_core::{Constraint, ConstraintKind, ConstraintTarget, EngineConfig, Rule, Schema, Variable};
use credence_engine::{Evidence, InferenceEngine, TrainingExample};

fn evidence(entries: &[(&str, f64)]) -> Evidence {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

#[test]
fn single_implication_raises_consequent() {
    let mut engine = InferenceEngine::new(test_fixtures::single_implication());
    let result = engine.run(&evidence(&[("A", 1.0)]), None);

    assert_eq!(result["A"], 1.0, "evidence is locked verbatim");
    assert!(result["B"] > 0.5, "B should rise toward the rule weight, got {}", result["B"]);
}

#[test]
fn attack_constraint_suppresses_target() {
    let mut engine = InferenceEngine::new(test_fixtures::attack_pair());
    let result = engine.run(&Evidence::new(), None);

    assert!(result["target"] < 0.7, "target should drop below its prior");
}

#[test]
fn causal_chain_propagates_two_hops() {
    let mut engine = InferenceEngine::new(test_fixtures::causal_chain());
    let result = engine.run(&evidence(&[("rain", 1.0)]), None);

    assert_eq!(result["rain"], 1.0);
    assert!(result["wet"] > 0.5);
    assert!(result["slippery"] > 0.2);
}

#[test]
fn support_constraint_raises_target() {
    let schema = Schema::new()
        .variable("backer", Variable::with_prior(0.9))
        .variable("claim", Variable::with_prior(0.3))
        .constraint(Constraint::support("s1", "backer", "claim", 0.8));

    let mut engine = InferenceEngine::new(schema);
    let result = engine.run(&Evidence::new(), None);
    assert!(result["claim"] > 0.3);
}

#[test]
fn mutex_group_mass_is_normalised() {
    let schema = Schema::new()
        .variable("cat", Variable::with_prior(0.8))
        .variable("dog", Variable::with_prior(0.8))
        .constraint(Constraint {
            id: "species".to_string(),
            kind: ConstraintKind::Mutex,
            source: "cat".to_string(),
            target: ConstraintTarget::Many(vec!["cat".to_string(), "dog".to_string()]),
            weight: 1.0,
            description: None,
        });

    let mut engine = InferenceEngine::new(schema);
    let result = engine.run(&Evidence::new(), None);

    let mass = result["cat"] + result["dog"];
    assert!(mass <= 1.0 + 1e-9, "group mass {mass} exceeds 1");
    assert!((result["cat"] - 0.5).abs() < 1e-6);
}

#[test]
fn run_is_deterministic() {
    let mut engine = InferenceEngine::new(test_fixtures::causal_chain());
    let first = engine.run(&evidence(&[("rain", 0.9)]), None);
    let second = engine.run(&evidence(&[("rain", 0.9)]), None);
    assert_eq!(first, second);
}

#[test]
fn untouched_variable_keeps_its_prior() {
    let schema = Schema::new()
        .variable("island", Variable::with_prior(0.42))
        .variable("a", Variable::with_prior(0.3))
        .variable("b", Variable::with_prior(0.1))
        .rule(Rule::implication("r", "a", "b", 0.9));

    let mut engine = InferenceEngine::new(schema);
    let result = engine.run(&Evidence::new(), None);
    assert_eq!(result["island"], 0.42);
}

#[test]
fn declared_lock_shields_variable_from_rules() {
    let mut schema = test_fixtures::single_implication();
    schema.variables.get_mut("B").unwrap().locked = true;
    schema.variables.get_mut("B").unwrap().prior = 0.1;

    let mut engine = InferenceEngine::new(schema);
    let result = engine.run(&evidence(&[("A", 1.0)]), None);
    assert_eq!(result["B"], 0.1);
}

#[test]
fn evidence_is_clamped_and_wins_over_constraints() {
    let mut engine = InferenceEngine::new(test_fixtures::attack_pair());
    let result = engine.run(&evidence(&[("target", 3.0)]), None);
    assert_eq!(result["target"], 1.0, "out-of-range evidence clamps to 1.0");
}

#[test]
fn unknown_evidence_keys_are_dropped() {
    let mut engine = InferenceEngine::new(test_fixtures::single_implication());
    let result = engine.run(&evidence(&[("A", 1.0), ("ghost", 0.9)]), None);
    assert!(!result.contains_key("ghost"));
    assert_eq!(result.len(), 2);
}

#[test]
fn rule_with_undeclared_input_is_inert() {
    let schema = Schema::new()
        .variable("out", Variable::with_prior(0.3))
        .rule(Rule::implication("dangling", "missing", "out", 1.0));

    let mut engine = InferenceEngine::new(schema);
    let result = engine.run(&Evidence::new(), None);
    assert_eq!(result["out"], 0.3);
}

#[test]
fn zero_weight_rules_leave_output_untouched() {
    let schema = Schema::new()
        .variable("a", Variable::with_prior(1.0))
        .variable("b", Variable::with_prior(0.2))
        .rule(Rule::implication("r", "a", "b", 0.0));

    let mut engine = InferenceEngine::new(schema);
    let result = engine.run(&Evidence::new(), None);
    assert_eq!(result["b"], 0.2);
}

#[test]
fn query_returns_value_or_neutral_default() {
    let mut engine = InferenceEngine::new(test_fixtures::single_implication());
    assert!(engine.query("B", &evidence(&[("A", 1.0)])) > 0.5);
    assert_eq!(engine.query("nonexistent", &Evidence::new()), 0.5);
}

#[test]
fn report_flags_convergence() {
    let mut engine = InferenceEngine::new(test_fixtures::single_implication());
    let report = engine.run_report(&evidence(&[("A", 1.0)]), None);
    assert!(report.converged);
    assert!(report.iterations < 100);

    // With damping disabled and α = 1 the loop still converges (the value
    // jumps straight to the fixed point and the next delta is zero).
    let config = EngineConfig {
        damping_factor: 1.0,
        ..EngineConfig::default()
    };
    let mut undamped = InferenceEngine::with_config(test_fixtures::single_implication(), config);
    let report = undamped.run_report(&evidence(&[("A", 1.0)]), None);
    assert!(report.converged);
}

#[test]
fn accessors_respect_locks() {
    let mut engine = InferenceEngine::new(test_fixtures::single_implication());

    assert!(engine.set_value("A", 0.6));
    assert_eq!(engine.get_value("A"), Some(0.6));
    assert!(!engine.set_value("ghost", 0.6));

    assert!(engine.lock_variable("A", 0.9));
    assert!(!engine.set_value("A", 0.1), "locked variable rejects set_value");
    assert_eq!(engine.get_value("A"), Some(0.9));

    assert!(engine.set_rule_weight("a_to_b", 1.4));
    assert_eq!(engine.get_rule_weight("a_to_b"), Some(1.0), "weights clamp");
    assert!(!engine.set_rule_weight("ghost", 0.5));
}

#[test]
fn rule_indexes_cover_inputs_and_outputs() {
    let engine = InferenceEngine::new(test_fixtures::causal_chain());

    assert_eq!(engine.rules_with_input("rain"), ["rain_wet"]);
    assert_eq!(engine.rules_for_output("wet"), ["rain_wet"]);
    assert_eq!(engine.rules_with_input("wet"), ["wet_slip"]);
    assert!(engine.rules_for_output("rain").is_empty());

    let names: Vec<&str> = engine.variable_names().collect();
    assert_eq!(names, ["rain", "wet", "slippery"]);
    let ids: Vec<&str> = engine.rule_ids().collect();
    assert_eq!(ids, ["rain_wet", "wet_slip"]);
}

#[test]
fn export_round_trip_reproduces_results() {
    let mut engine = InferenceEngine::new(test_fixtures::causal_chain());
    let original = engine.run(&evidence(&[("rain", 1.0)]), None);

    let exported = engine.export();
    let mut rebuilt = InferenceEngine::new(exported);
    let replayed = rebuilt.run(&evidence(&[("rain", 1.0)]), None);

    assert_eq!(original, replayed);
}

#[test]
fn exported_document_round_trips_through_json() {
    let mut engine = InferenceEngine::new(test_fixtures::causal_chain());
    let original = engine.run(&evidence(&[("rain", 1.0)]), None);

    let document = serde_json::to_string(&engine.export()).unwrap();
    let reloaded: Schema = serde_json::from_str(&document).unwrap();
    let mut rebuilt = InferenceEngine::new(reloaded);

    assert_eq!(original, rebuilt.run(&evidence(&[("rain", 1.0)]), None));
}

#[test]
fn export_reflects_trained_weights() {
    let mut engine = InferenceEngine::new(test_fixtures::learnable_link());
    engine.train(
        &[TrainingExample::new(
            evidence(&[("input", 1.0)]),
            evidence(&[("output", 0.95)]),
        )],
        10,
    );

    let live = engine.get_rule_weight("learnable").unwrap();
    let exported = engine.export();
    assert_eq!(exported.rules[0].weight, live);
    assert!(live > 0.5);
}

#[test]
fn training_increases_learnable_weight() {
    let mut engine = InferenceEngine::new(test_fixtures::learnable_link());
    let initial = engine.get_rule_weight("learnable").unwrap();

    let data = [TrainingExample::new(
        evidence(&[("input", 1.0)]),
        evidence(&[("output", 0.95)]),
    )];
    engine.train(&data, 50);

    let trained = engine.get_rule_weight("learnable").unwrap();
    assert!(
        trained > initial,
        "weight should rise: {initial} -> {trained}"
    );
}

#[test]
fn training_skips_non_learnable_rules() {
    let mut schema = test_fixtures::learnable_link();
    schema.rules[0].learnable = false;

    let mut engine = InferenceEngine::new(schema);
    let data = [TrainingExample::new(
        evidence(&[("input", 1.0)]),
        evidence(&[("output", 0.95)]),
    )];
    engine.train(&data, 50);

    assert_eq!(engine.get_rule_weight("learnable"), Some(0.5));
}

#[test]
fn training_on_empty_set_returns_zero_loss() {
    let mut engine = InferenceEngine::new(test_fixtures::learnable_link());
    assert_eq!(engine.train(&[], 10), 0.0);
}

#[test]
fn duplicate_rule_ids_follow_last_definition() {
    let schema = Schema::new()
        .variable("a", Variable::with_prior(1.0))
        .variable("b", Variable::with_prior(0.0))
        .rule(Rule::implication("r", "a", "b", 0.1))
        .rule(Rule::implication("r", "a", "b", 0.9));

    let engine = InferenceEngine::new(schema);
    assert_eq!(engine.get_rule_weight("r"), Some(0.9));
    assert_eq!(engine.rule_ids().count(), 1);
}

#[test]
fn reset_to_priors_matches_fresh_construction() {
    let mut engine = InferenceEngine::new(test_fixtures::causal_chain());
    engine.run(&evidence(&[("rain", 1.0)]), None);
    engine.reset_to_priors();

    let fresh = InferenceEngine::new(test_fixtures::causal_chain());
    assert_eq!(engine.export_state(), fresh.export_state());
}
