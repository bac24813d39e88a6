// crates/tripwired-core/src/core/config.rs
// ============================================================================
// Module: Tripwired Pipeline Configuration
// Description: Frozen threshold record shared by all pipeline components.
// Purpose: Fix every tunable at construction; no silent runtime mutation.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`PipelineConfig`] is constructed once and copied into each component at
//! pipeline construction. Threshold changes are explicit reconfiguration
//! (build a new pipeline), never mutation of a live one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Pipeline Configuration
// ============================================================================

/// Frozen configuration record for one decision pipeline.
///
/// # Invariants
/// - Immutable after construction; components hold copies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Token budget per 60-second window before the budget veto. Default 50 000.
    pub max_tokens_per_minute: u64,
    /// Tool-call cap per 60-second window before the rate veto. Default 60.
    pub max_tool_calls_per_minute: u32,
    /// Similarity score at which the hash window counts as looping. Default 0.9.
    pub loop_similarity_threshold: f64,
    /// Number of output hashes compared for loop detection. Default 5.
    pub loop_window_size: usize,
    /// Recent/earlier interval ratio below which tempo counts as compressed.
    /// Default 0.3.
    pub tempo_compression_ratio: f64,
    /// Cooldown applied after a behavioral veto, in milliseconds. Default 60 000.
    pub cooldown_duration_ms: u64,
    /// Minimum time a classified state is retained, in milliseconds.
    /// Default 10 000.
    pub min_state_duration_ms: u64,
    /// Extra hysteresis factor applied when leaving LOOPING or RUNAWAY.
    /// Default 3.
    pub critical_exit_multiplier: u64,
    /// Tokens-per-minute rate below which intensity is LOW. Default 5 000.
    pub intensity_low_threshold: f64,
    /// Tokens-per-minute rate above which intensity is HIGH. Default 30 000.
    pub intensity_high_threshold: f64,
    /// Health score below which status becomes SUSPENDED. Default 0.6.
    pub soft_suspend: f64,
    /// Health score below which status becomes STOPPED. Default 0.3.
    pub hard_stop: f64,
    /// Health score regained per anomaly-free recovery tick. Default 0.01.
    pub recovery_rate: f64,
    /// Upper bound the health score can recover to. Default 0.8.
    pub recovery_cap: f64,
    /// Intent confidence below which the gate rejects outright. Default 0.2.
    pub confidence_minimum: f64,
    /// Intent confidence lost per second between decisions. Default 0.0001.
    pub confidence_decay_rate: f64,
    /// Health penalty for a soft anomaly. Default 0.02.
    pub soft_anomaly_severity: f64,
    /// Health penalty for a hard anomaly. Default 0.10.
    pub hard_anomaly_severity: f64,
    /// Capacity of the classifier's event buffer. Default 100.
    pub event_buffer_size: usize,
    /// Capacity of the intent core's token history. Default 20.
    pub token_history_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_tokens_per_minute: 50_000,
            max_tool_calls_per_minute: 60,
            loop_similarity_threshold: 0.9,
            loop_window_size: 5,
            tempo_compression_ratio: 0.3,
            cooldown_duration_ms: 60_000,
            min_state_duration_ms: 10_000,
            critical_exit_multiplier: 3,
            intensity_low_threshold: 5_000.0,
            intensity_high_threshold: 30_000.0,
            soft_suspend: 0.6,
            hard_stop: 0.3,
            recovery_rate: 0.01,
            recovery_cap: 0.8,
            confidence_minimum: 0.2,
            confidence_decay_rate: 0.0001,
            soft_anomaly_severity: 0.02,
            hard_anomaly_severity: 0.10,
            event_buffer_size: 100,
            token_history_size: 20,
        }
    }
}
