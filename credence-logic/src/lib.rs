//! # credence-logic
//!
//! The numeric kernel of the credence inference stack: Łukasiewicz fuzzy
//! operators over truth values in `[0, 1]`, the argumentation primitives
//! (inhibit / support / mutex normalisation), and the `LogicOp` dispatcher.
//!
//! Every function clamps its result; no operation here can produce a value
//! outside `[0, 1]`, NaN, or infinity when fed in-range inputs. This is the
//! only crate where floating-point decisions live — everything above
//! composes these functions.

mod ops;

pub use ops::{
    apply_operation, clamp, equivalent, fuzzy_and, fuzzy_not, fuzzy_or, implies, inhibit,
    is_valid_truth_value, mutex_normalize, support, weighted_mean, LogicError, LogicOp,
    TruthValue,
};
