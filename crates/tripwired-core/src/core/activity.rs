// crates/tripwired-core/src/core/activity.rs
// ============================================================================
// Module: Tripwired Activity Model
// Description: Behavioral mode and intensity classifications of agent activity.
// Purpose: Provide the validated state record emitted by the activity engine.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! An [`ActivityState`] is the classifier's qualitative reading of the recent
//! event window. The record is constructed only through [`ActivityState::new`],
//! which rejects an empty reason string; downstream components and telemetry
//! rely on every state carrying a human-readable explanation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Intensity
// ============================================================================

/// Quantitative classification of recent token consumption rate.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    /// Token rate below the low threshold.
    Low,
    /// Token rate between the low and high thresholds.
    Normal,
    /// Token rate above the high threshold.
    High,
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "LOW",
            Self::Normal => "NORMAL",
            Self::High => "HIGH",
        };
        f.write_str(name)
    }
}

// ============================================================================
// SECTION: Activity Mode
// ============================================================================

/// Qualitative classification of agent behavior over the recent event window.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityMode {
    /// No recent activity.
    Idle,
    /// Ordinary forward progress.
    Working,
    /// Repetitive output detected over the hash window.
    Looping,
    /// Uncontrolled acceleration at high intensity.
    Runaway,
}

impl ActivityMode {
    /// Returns true for modes that trigger behavioral vetoes and extended
    /// exit hysteresis.
    #[must_use]
    pub const fn is_critical(self) -> bool {
        matches!(self, Self::Looping | Self::Runaway)
    }
}

impl fmt::Display for ActivityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "IDLE",
            Self::Working => "WORKING",
            Self::Looping => "LOOPING",
            Self::Runaway => "RUNAWAY",
        };
        f.write_str(name)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when constructing an activity state.
#[derive(Debug, Error)]
pub enum StateError {
    /// The reason string was empty.
    #[error("activity state reason must not be empty")]
    EmptyReason,
}

// ============================================================================
// SECTION: Activity State
// ============================================================================

/// Classified activity state for the recent event window.
///
/// # Invariants
/// - `reason` is non-empty and encodes both mode and intensity.
/// - `since` is monotonic non-decreasing within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityState {
    /// Token-rate classification.
    intensity: Intensity,
    /// Behavioral mode classification.
    mode: ActivityMode,
    /// Human-readable explanation of the classification.
    reason: String,
    /// Monotonic millisecond timestamp at which this state was entered.
    since: u64,
}

impl ActivityState {
    /// Creates a new activity state.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::EmptyReason`] when the reason string is empty.
    pub fn new(
        intensity: Intensity,
        mode: ActivityMode,
        reason: impl Into<String>,
        since: u64,
    ) -> Result<Self, StateError> {
        let reason = reason.into();
        if reason.is_empty() {
            return Err(StateError::EmptyReason);
        }
        Ok(Self {
            intensity,
            mode,
            reason,
            since,
        })
    }

    /// Returns the token-rate classification.
    #[must_use]
    pub const fn intensity(&self) -> Intensity {
        self.intensity
    }

    /// Returns the behavioral mode classification.
    #[must_use]
    pub const fn mode(&self) -> ActivityMode {
        self.mode
    }

    /// Returns the human-readable explanation.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the millisecond timestamp at which this state was entered.
    #[must_use]
    pub const fn since(&self) -> u64 {
        self.since
    }
}
