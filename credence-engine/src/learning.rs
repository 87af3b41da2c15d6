//! Error-driven weight learning.
//!
//! This is the documented heuristic, not true gradient descent:
//! `weight ← clamp(weight + error · learning_rate · input_strength)`,
//! where input strength is the mean evidence (or current state) of the
//! rule's inputs. Weights stay in `[0, 1]` by construction.

use tracing::trace;

use crate::engine::{Evidence, InferenceEngine};

/// One labelled example: evidence in, expected truth values out.
#[derive(Debug, Clone)]
pub struct TrainingExample {
    pub inputs: Evidence,
    pub targets: Evidence,
}

impl TrainingExample {
    pub fn new(inputs: Evidence, targets: Evidence) -> Self {
        Self { inputs, targets }
    }
}

impl InferenceEngine {
    /// Train rule weights on labelled examples for up to `epochs` epochs.
    ///
    /// Per example: run inference with the inputs as evidence, then for
    /// each target accumulate squared error and nudge every learnable rule
    /// that writes the target. Epoch loss is mean squared error over the
    /// example set; the loop stops early once it falls below `1e-3`.
    /// Returns the final epoch loss (0.0 for an empty example set).
    pub fn train(&mut self, data: &[TrainingExample], epochs: usize) -> f64 {
        let mut final_loss = 0.0;

        for epoch in 0..epochs {
            let mut epoch_loss = 0.0;

            for example in data {
                let output = self.run(&example.inputs, None);

                for (target_var, target_value) in &example.targets {
                    let actual = output.get(target_var).copied().unwrap_or(0.5);
                    let error = target_value - actual;
                    epoch_loss += error * error;
                    self.update_weights(target_var, error, &example.inputs);
                }
            }

            if !data.is_empty() {
                epoch_loss /= data.len() as f64;
            }
            final_loss = epoch_loss;
            trace!(epoch, loss = epoch_loss, "training epoch complete");

            if epoch_loss < 1e-3 {
                break;
            }
        }

        final_loss
    }

    /// Nudge the learnable rules that write `target_var` by the error.
    fn update_weights(&mut self, target_var: &str, error: f64, inputs: &Evidence) {
        let Some(rule_indices) = self.output_rule_indices(target_var).cloned() else {
            return;
        };

        for idx in rule_indices {
            let rule = self.rule_shape(idx);
            if !rule.learnable {
                continue;
            }

            // Mean strength of the rule's inputs: evidence first, current
            // state as fallback, neutral 0.5 when neither resolves.
            let rule_inputs = rule.inputs.clone();
            let mut strength = 0.0;
            for input_name in &rule_inputs {
                strength += inputs.get(input_name).copied().unwrap_or_else(|| {
                    self.state_value(input_name).unwrap_or(0.5)
                });
            }
            if !rule_inputs.is_empty() {
                strength /= rule_inputs.len() as f64;
            }

            let delta = error * self.learning_rate() * strength;
            self.bump_weight(idx, delta);
        }
    }
}
