//! # credence-engine
//!
//! The inference engine: owns per-variable runtime state, indexes rules by
//! the variables they read and write, and propagates truth values through
//! damped forward passes and constraint passes until a fixed point is
//! reached. Also hosts the error-driven weight-learning loop.
//!
//! The engine is synchronous and single-threaded by design. `run` and
//! `train` are CPU-only and bounded by
//! `max_iterations × (|variables| · fan-in + |constraints|)`; callers bound
//! runtime by choosing `max_iterations`. Instances are not safe for
//! concurrent mutation — wrap externally if shared.

mod engine;
mod learning;

pub use engine::{Evidence, InferenceEngine, InferenceOutput, InferenceReport};
pub use learning::TrainingExample;
