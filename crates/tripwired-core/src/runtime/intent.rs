// crates/tripwired-core/src/runtime/intent.rs
// ============================================================================
// Module: Tripwired Intent Core
// Description: Activity-state to action-intent mapping with confidence decay.
// Purpose: Propose CONTINUE, PAUSE, or STOP with a decaying confidence value.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The intent core remembers its last decision and lets its confidence decay
//! linearly between calls. A still-confident decision is reused unless the
//! activity state invalidates it (critical mode against a CONTINUE, or high
//! intensity against a confident decision); otherwise a fresh intent is
//! generated from fixed priority rules, with the WORKING confidence adjusted
//! by the recent token trend.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;

use crate::core::activity::ActivityMode;
use crate::core::activity::ActivityState;
use crate::core::activity::Intensity;
use crate::core::config::PipelineConfig;
use crate::core::decision::Intent;
use crate::core::decision::IntentDecision;
use crate::core::event::AgentEvent;
use crate::core::time::Clock;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Confidence assigned to an invalidation PAUSE.
const INVALIDATED_CONFIDENCE: f64 = 0.5;
/// Token trend above which WORKING confidence is dampened.
const TREND_SURGE: f64 = 0.5;
/// Token trend below which WORKING confidence is boosted.
const TREND_DECLINE: f64 = -0.5;
/// Number of trailing token counts compared against the counts before them.
const TREND_WINDOW: usize = 3;
/// Minimum history length before a trend is computed.
const TREND_MIN_HISTORY: usize = 5;

// ============================================================================
// SECTION: Intent Core
// ============================================================================

/// Intent generator with confidence decay and token-trend adjustment.
pub struct IntentCore<C> {
    /// Frozen pipeline configuration.
    config: PipelineConfig,
    /// Injected monotonic clock.
    clock: C,
    /// Most recent decision, reused while its confidence survives decay.
    last_intent: Option<IntentDecision>,
    /// Bounded FIFO of recent token counts.
    token_history: VecDeque<u64>,
}

impl<C: Clock> IntentCore<C> {
    /// Creates an intent core with empty history.
    #[must_use]
    pub fn new(config: PipelineConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            last_intent: None,
            token_history: VecDeque::with_capacity(config.token_history_size),
        }
    }

    /// Absorbs one event's token count into the history.
    pub fn update(&mut self, event: &AgentEvent) {
        self.token_history.push_back(event.token_count);
        while self.token_history.len() > self.config.token_history_size {
            self.token_history.pop_front();
        }
    }

    /// Produces the intent decision for the given activity state.
    pub fn decide(&mut self, state: &ActivityState) -> IntentDecision {
        let now = self.clock.now_ms();
        if let Some(last) = self.last_intent.clone()
            && last.intent != Intent::Pause
        {
            let elapsed_secs = now.saturating_sub(last.timestamp) as f64 / 1000.0;
            let decayed =
                (last.confidence - elapsed_secs * self.config.confidence_decay_rate).max(0.0);
            if decayed > 0.0 {
                let critical_against_continue =
                    last.intent == Intent::Continue && state.mode().is_critical();
                let confident_under_load =
                    state.intensity() == Intensity::High && last.confidence > 0.5;
                if critical_against_continue || confident_under_load {
                    let fresh = IntentDecision {
                        intent: Intent::Pause,
                        confidence: INVALIDATED_CONFIDENCE,
                        reason: "Invalidated: activity mode critical".to_owned(),
                        timestamp: now,
                    };
                    self.last_intent = Some(fresh.clone());
                    return fresh;
                }
                return IntentDecision {
                    confidence: decayed,
                    reason: format!("{} (decayed)", last.reason),
                    ..last
                };
            }
        }
        let fresh = self.generate(state, now);
        self.last_intent = Some(fresh.clone());
        fresh
    }

    /// Clears the last intent and token history.
    pub fn reset(&mut self) {
        self.last_intent = None;
        self.token_history.clear();
    }

    /// Generates a fresh intent from the fixed priority rules.
    fn generate(&self, state: &ActivityState, now: u64) -> IntentDecision {
        let (intent, confidence, reason) = match (state.mode(), state.intensity()) {
            (ActivityMode::Runaway, _) => (
                Intent::Stop,
                1.0,
                "RUNAWAY mode detected - uncontrolled activity".to_owned(),
            ),
            (ActivityMode::Looping, _) => (
                Intent::Stop,
                0.9,
                "LOOPING mode detected - repetitive behavior".to_owned(),
            ),
            (_, Intensity::High) => (
                Intent::Pause,
                0.7,
                "HIGH intensity - approaching resource limits".to_owned(),
            ),
            (ActivityMode::Idle, _) => {
                (Intent::Continue, 0.3, "IDLE mode - waiting for activity".to_owned())
            }
            (_, intensity) => (
                Intent::Continue,
                self.working_confidence(intensity),
                format!("WORKING mode: intensity={intensity}"),
            ),
        };
        IntentDecision {
            intent,
            confidence,
            reason,
            timestamp: now,
        }
    }

    /// Computes the WORKING confidence from intensity and token trend.
    fn working_confidence(&self, intensity: Intensity) -> f64 {
        let base = match intensity {
            Intensity::Low => 0.8,
            Intensity::Normal => 0.6,
            Intensity::High => 0.3,
        };
        let trend = self.token_trend();
        let adjusted: f64 = if trend > TREND_SURGE {
            base * 0.7
        } else if trend < TREND_DECLINE {
            base * 1.1
        } else {
            base
        };
        adjusted.clamp(0.1, 1.0)
    }

    /// Computes the relative trend of recent token counts, zero when flat or
    /// when the history is too short.
    fn token_trend(&self) -> f64 {
        if self.token_history.len() < TREND_MIN_HISTORY {
            return 0.0;
        }
        let counts: Vec<u64> = self.token_history.iter().copied().collect();
        let len = counts.len();
        let split = len - TREND_WINDOW;
        let prior_start = len.saturating_sub(2 * TREND_WINDOW);
        let recent = &counts[split..];
        let prior = &counts[prior_start..split];
        let recent_mean = mean(recent);
        let prior_mean = mean(prior);
        if prior_mean == 0.0 {
            return 0.0;
        }
        (recent_mean - prior_mean) / prior_mean
    }
}

// ============================================================================
// SECTION: History Statistics
// ============================================================================

/// Returns the arithmetic mean of a slice of token counts.
fn mean(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u64 = values.iter().copied().fold(0, u64::saturating_add);
    sum as f64 / values.len() as f64
}
