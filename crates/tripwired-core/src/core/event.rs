// crates/tripwired-core/src/core/event.rs
// ============================================================================
// Module: Tripwired Agent Events
// Description: Input event records and execution result records.
// Purpose: Provide stable, serializable shapes for the pipeline's wire surface.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Agent events are produced by an external runtime and consumed unmodified;
//! the pipeline accepts malformed values as-is and leaves sanitizing to the
//! caller. Execution results travel the opposite direction, reporting what the
//! adapter did with an allowed decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Agent Event
// ============================================================================

/// One observation of agent activity.
///
/// # Invariants
/// - `timestamp` is monotonic milliseconds on the session's clock scale.
/// - Counters are accepted as-is; callers sanitize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentEvent {
    /// Monotonic millisecond timestamp of the observation.
    pub timestamp: u64,
    /// Tokens consumed by the observed step.
    pub token_count: u64,
    /// Tool invocations performed by the observed step.
    pub tool_calls: u32,
    /// Response latency of the observed step in milliseconds.
    pub latency_ms: u64,
    /// Length of the produced output in bytes.
    pub output_length: u64,
    /// Opaque fingerprint of the produced output, when the source computed one.
    pub output_hash: Option<String>,
}

// ============================================================================
// SECTION: Execution Result
// ============================================================================

/// Outcome classification reported by the execution adapter.
///
/// # Invariants
/// - Variants are stable for serialization and replay fingerprinting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// The action completed.
    Success,
    /// The action completed partially.
    Partial,
    /// The action was attempted and failed.
    Failed,
    /// The action was never attempted because the decision was vetoed.
    Blocked,
}

/// Result of acting (or declining to act) on a safety decision.
///
/// # Invariants
/// - `executed` is true only when the preceding decision allowed execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Whether the adapter actually performed the action.
    pub executed: bool,
    /// Outcome classification.
    pub status: ExecutionStatus,
    /// Tokens consumed by the execution.
    pub tokens_used: u64,
    /// Execution latency in milliseconds.
    pub latency_ms: u64,
    /// Monotonic millisecond timestamp of the result.
    pub timestamp: u64,
}
