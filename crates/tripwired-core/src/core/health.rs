// crates/tripwired-core/src/core/health.rs
// ============================================================================
// Module: Tripwired Health Model
// Description: Health score, status, and anomaly accounting records.
// Purpose: Track accumulated anomalies that degrade the safety gate.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The safety gate owns a [`HealthState`] that decreases on anomalies and
//! regains slowly during anomaly-free recovery, capped below full health. The
//! derived [`HealthStatus`] feeds the gate's precheck: SUSPENDED and STOPPED
//! reject every decision until recovery or reset.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Health Status
// ============================================================================

/// Health status derived from the health score.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Score at or above the degraded cutoff.
    Healthy,
    /// Score below the degraded cutoff but above suspension.
    Degraded,
    /// Score below the suspension cutoff; decisions are rejected.
    Suspended,
    /// Score below the hard-stop cutoff; permanent until reset.
    Stopped,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Healthy => "HEALTHY",
            Self::Degraded => "DEGRADED",
            Self::Suspended => "SUSPENDED",
            Self::Stopped => "STOPPED",
        };
        f.write_str(name)
    }
}

// ============================================================================
// SECTION: Anomaly Severity
// ============================================================================

/// Severity class of a recorded anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalySeverity {
    /// Minor deviation, small score penalty.
    Soft,
    /// Contract violation, large score penalty.
    Hard,
}

// ============================================================================
// SECTION: Health State
// ============================================================================

/// Accumulated health accounting for one session.
///
/// # Invariants
/// - `score` lies in `[0.0, 1.0]` and never exceeds the recovery cap after
///   any anomaly has been recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthState {
    /// Current health score.
    pub score: f64,
    /// Status derived from the score.
    pub status: HealthStatus,
    /// Millisecond timestamp of the most recent anomaly, when any.
    pub last_anomaly: Option<u64>,
    /// Total anomalies recorded this session.
    pub anomaly_count: u64,
    /// Consecutive anomalies since the last completed recovery tick.
    pub error_streak: u32,
}

impl HealthState {
    /// Creates a pristine health state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 1.0,
            status: HealthStatus::Healthy,
            last_anomaly: None,
            anomaly_count: 0,
            error_streak: 0,
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Health Change
// ============================================================================

/// Before/after snapshot of a health state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthChange {
    /// Health state before the transition.
    pub previous: HealthState,
    /// Health state after the transition.
    pub current: HealthState,
}
