//! Evaluator configuration.

use serde::Deserialize;

/// Knobs a host can set before a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Maximum number of node evaluations. `None` means unlimited.
    pub gas_limit: Option<u64>,
    /// Log the program, final result and final environment at `debug` level.
    pub debug: bool,
}

impl EvalConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_gas_limit(mut self, limit: u64) -> Self {
        self.gas_limit = Some(limit);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
