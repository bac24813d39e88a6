// crates/tripwired-core/src/core/decision.rs
// ============================================================================
// Module: Tripwired Decision Records
// Description: Intent decisions, safety decisions, and veto tags.
// Purpose: Provide the canonical outputs of the intent core and safety gate.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! An [`IntentDecision`] proposes an action with a confidence value; a
//! [`SafetyDecision`] is the final authority on whether the action may run.
//! Both records are serializable and fold into the session fingerprint, so
//! their shapes are stable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Intent
// ============================================================================

/// Action intent proposed by the intent core.
///
/// # Invariants
/// - Variants are stable for serialization and replay fingerprinting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Keep executing agent actions.
    Continue,
    /// Hold execution until conditions improve.
    Pause,
    /// Halt the agent.
    Stop,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Continue => "CONTINUE",
            Self::Pause => "PAUSE",
            Self::Stop => "STOP",
        };
        f.write_str(name)
    }
}

/// Intent decision with confidence and explanation.
///
/// # Invariants
/// - `confidence` lies in `[0.0, 1.0]`.
/// - `reason` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentDecision {
    /// Proposed action.
    pub intent: Intent,
    /// Confidence in the proposal, decayed over time between calls.
    pub confidence: f64,
    /// Human-readable explanation of the proposal.
    pub reason: String,
    /// Monotonic millisecond timestamp of the decision.
    pub timestamp: u64,
}

// ============================================================================
// SECTION: Veto Reason
// ============================================================================

/// Enumerated cause attached to every gate veto.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VetoReason {
    /// Activity mode was RUNAWAY.
    RunawayDetected,
    /// Activity mode was LOOPING.
    LoopDetected,
    /// Token budget for the current window was exhausted.
    TokenBudgetExceeded,
    /// Tool-call rate cap reached or inter-event tempo compressed.
    RateLimitExceeded,
    /// A veto cooldown is still in force.
    CooldownActive,
    /// Health status or intent confidence fell below the gate's floor.
    HealthDegraded,
}

impl fmt::Display for VetoReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RunawayDetected => "RUNAWAY_DETECTED",
            Self::LoopDetected => "LOOP_DETECTED",
            Self::TokenBudgetExceeded => "TOKEN_BUDGET_EXCEEDED",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::CooldownActive => "COOLDOWN_ACTIVE",
            Self::HealthDegraded => "HEALTH_DEGRADED",
        };
        f.write_str(name)
    }
}

// ============================================================================
// SECTION: Safety Decision
// ============================================================================

/// Final allow/veto verdict from the safety gate.
///
/// # Invariants
/// - A gate-issued veto always carries `veto_reason`; only decisions the
///   pipeline synthesizes for internal faults leave it unset, and their
///   `reason` names the fault.
/// - `reason` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyDecision {
    /// Whether execution is allowed.
    pub allowed: bool,
    /// Tokens remaining in the current budget window.
    pub remaining_budget: u64,
    /// Human-readable explanation of the verdict.
    pub reason: String,
    /// Enumerated veto cause when the gate rejected the action.
    pub veto_reason: Option<VetoReason>,
    /// Monotonic millisecond timestamp of the verdict.
    pub timestamp: u64,
}
