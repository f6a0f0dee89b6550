//! Computation trace returned alongside every generated plan
//!
//! Each pipeline stage records what it consumed and what it produced so a
//! plan can be explained after the fact without re-running the engine.

use serde::{Deserialize, Serialize};

/// One recorded stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub stage: String,
    pub message: String,
    pub inputs: Vec<(String, String)>,
    pub outputs: Vec<(String, String)>,
}

impl TraceStep {
    pub fn new(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            message: message.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn input(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.inputs.push((key.into(), value.to_string()));
        self
    }

    pub fn output(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.outputs.push((key.into(), value.to_string()));
        self
    }
}

/// Ordered list of stage records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputationTrace {
    pub steps: Vec<TraceStep>,
}

impl ComputationTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step and mirror it as a `debug!` event
    pub fn record(&mut self, step: TraceStep) {
        tracing::debug!(
            stage = %step.stage,
            inputs = ?step.inputs,
            outputs = ?step.outputs,
            "{}",
            step.message
        );
        self.steps.push(step);
    }

    pub fn stage(&self, stage: &str) -> Option<&TraceStep> {
        self.steps.iter().find(|s| s.stage == stage)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
