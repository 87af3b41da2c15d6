//! Schema model: variables, rules, constraints, and the schema document.

mod constraint;
mod rule;
mod schema;
mod variable;

pub use constraint::{Constraint, ConstraintKind, ConstraintTarget};
pub use rule::{Rule, RuleType};
pub use schema::Schema;
pub use variable::{Variable, VariableKind, VariableState};
