// crates/tripwired-core/src/interfaces/mod.rs
// ============================================================================
// Module: Tripwired Interfaces
// Description: Trait seams for classification, execution, and telemetry.
// Purpose: Define the contract surfaces between the pipeline and its hosts.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the pipeline integrates with external systems
//! without embedding host-specific details. The classifier seam also admits
//! replacement engines (for example an LLM-backed log classifier); the
//! pipeline degrades defensively when a seam implementation fails.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::activity::ActivityState;
use crate::core::activity::StateError;
use crate::core::decision::SafetyDecision;
use crate::core::event::AgentEvent;
use crate::core::event::ExecutionResult;
use crate::core::telemetry::SystemEvent;

// ============================================================================
// SECTION: Activity Engine
// ============================================================================

/// Activity engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine failed to classify the event stream.
    #[error("activity engine error: {0}")]
    Classification(String),
}

impl From<StateError> for EngineError {
    fn from(err: StateError) -> Self {
        Self::Classification(err.to_string())
    }
}

/// Classifier seam turning event streams into activity states.
///
/// The built-in implementation is
/// [`ActivityClassifier`](crate::runtime::ActivityClassifier); hosts may
/// substitute their own engine behind this trait.
pub trait ActivityEngine {
    /// Classifies the stream after observing one more event.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when classification fails; the pipeline then
    /// substitutes a defensive RUNAWAY state.
    fn classify(&mut self, event: &AgentEvent) -> Result<ActivityState, EngineError>;

    /// Clears all classification state.
    fn reset(&mut self);
}

// ============================================================================
// SECTION: Execution Adapter
// ============================================================================

/// Execution adapter errors.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The adapter failed to perform the action.
    #[error("execution adapter error: {0}")]
    Failed(String),
}

/// Adapter seam that performs the action an allowed decision authorizes.
///
/// Contractually called only when the decision's `allowed` flag is set; a
/// vetoed decision is answered with a synthetic BLOCKED result instead.
pub trait ExecutionAdapter {
    /// Executes the action authorized by an allowed decision.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when execution fails; the pipeline then
    /// synthesizes a FAILED result and continues.
    fn execute(&self, decision: &SafetyDecision) -> Result<ExecutionResult, AdapterError>;
}

// ============================================================================
// SECTION: Telemetry Sink
// ============================================================================

/// Downstream receiver for telemetry records.
///
/// Sinks never influence decisions; the pipeline ignores whatever the sink
/// does with a record.
pub trait TelemetrySink {
    /// Receives one telemetry record.
    fn record(&self, event: &SystemEvent);
}

/// Sink that discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTelemetrySink;

impl TelemetrySink for NullTelemetrySink {
    fn record(&self, _event: &SystemEvent) {}
}
