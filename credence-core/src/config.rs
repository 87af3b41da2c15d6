//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the inference engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on forward/constraint iterations per `run`.
    pub max_iterations: usize,
    /// A pass delta strictly below this terminates the loop early.
    pub convergence_threshold: f64,
    /// Step size for the weight-update heuristic.
    pub learning_rate: f64,
    /// α in `value' = α·new + (1−α)·old`. 1.0 disables damping, 0.0
    /// freezes every variable.
    pub damping_factor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            convergence_threshold: 1e-3,
            learning_rate: 0.1,
            damping_factor: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.convergence_threshold, 1e-3);
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.damping_factor, 0.5);
    }

    #[test]
    fn partial_document_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"max_iterations": 25}"#).unwrap();
        assert_eq!(config.max_iterations, 25);
        assert_eq!(config.damping_factor, 0.5);
    }
}
