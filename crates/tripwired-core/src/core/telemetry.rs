// crates/tripwired-core/src/core/telemetry.rs
// ============================================================================
// Module: Tripwired Telemetry Records
// Description: Structured system events emitted per pipeline transaction.
// Purpose: Provide a serializable, strictly ordered observability stream.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The pipeline appends [`SystemEvent`] records to its owned log and forwards
//! them to an optional sink. Telemetry is strictly downstream: sinks never
//! influence decisions. Per event the order is fixed: agent event, optional
//! state change, intent with decision, execution, then any errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::activity::ActivityState;
use crate::core::decision::IntentDecision;
use crate::core::decision::SafetyDecision;
use crate::core::event::AgentEvent;
use crate::core::event::ExecutionResult;
use crate::core::health::HealthState;

// ============================================================================
// SECTION: System Events
// ============================================================================

/// One structured telemetry record.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SystemEvent {
    /// An agent event entered the pipeline.
    AgentEvent {
        /// The observed event.
        event: AgentEvent,
    },
    /// The classified activity state changed.
    StateChange {
        /// State before the change; absent for the first classification.
        previous: Option<ActivityState>,
        /// State after the change.
        current: ActivityState,
    },
    /// An intent was proposed and gated.
    Intent {
        /// The proposed intent.
        intent: IntentDecision,
        /// The gate's verdict on the intent.
        decision: SafetyDecision,
    },
    /// Execution completed, was skipped, or failed.
    Execution {
        /// The execution outcome.
        result: ExecutionResult,
    },
    /// The gate's health state moved.
    HealthChange {
        /// Health state before the transition.
        previous: HealthState,
        /// Health state after the transition.
        current: HealthState,
    },
    /// A protected stage faulted and was degraded defensively.
    Error {
        /// Name of the faulting component.
        component: String,
        /// Rendered error message.
        error: String,
    },
}
