//! # credence-core
//!
//! The declarative side of the credence stack: the schema model (variables,
//! rules, constraints), the engine configuration, and the advisory
//! schema-document validator.
//!
//! A `Schema` is immutable input to the inference engine. Variables are
//! keyed by name but iterated in insertion order — the order is observable
//! through the fixed point the engine selects, so it is part of the model,
//! not an implementation detail.

pub mod config;
pub mod models;
pub mod validate;

pub use config::EngineConfig;
pub use models::{
    Constraint, ConstraintKind, ConstraintTarget, Rule, RuleType, Schema, Variable,
    VariableKind, VariableState,
};
pub use validate::{validate_schema, ValidationReport};
