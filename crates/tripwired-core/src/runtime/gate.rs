// crates/tripwired-core/src/runtime/gate.rs
// ============================================================================
// Module: Tripwired Safety Gate
// Description: Authoritative veto layer over budgets, rates, and health.
// Purpose: Reject unsafe intents with tagged causes; account session health.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The gate is the single veto point. Evaluation runs five ordered concerns:
//! system prechecks (confidence floor, cooldown, health status), behavioral
//! vetoes (RUNAWAY, LOOPING, tempo compression), the tool-call rate cap, the
//! token budget, and finally an allow with the remaining budget. Behavioral
//! vetoes arm a cooldown that rejects everything until it expires. Anomalies
//! fed back by the host lower a health score that can only partially recover.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;

use crate::core::activity::ActivityMode;
use crate::core::activity::ActivityState;
use crate::core::config::PipelineConfig;
use crate::core::decision::IntentDecision;
use crate::core::decision::SafetyDecision;
use crate::core::decision::VetoReason;
use crate::core::event::ExecutionResult;
use crate::core::event::ExecutionStatus;
use crate::core::health::AnomalySeverity;
use crate::core::health::HealthChange;
use crate::core::health::HealthState;
use crate::core::health::HealthStatus;
use crate::core::time::Clock;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Length of the token and tool-call budget window, in milliseconds.
const BUDGET_WINDOW_MS: u64 = 60_000;
/// Health score below which status is DEGRADED rather than HEALTHY.
const HEALTH_DEGRADED_CUTOFF: f64 = 0.8;
/// Execution latency above which a soft anomaly is recorded, in milliseconds.
const EXECUTION_LATENCY_ANOMALY_MS: u64 = 10_000;
/// Quiet period after an anomaly before recovery ticks take effect.
const RECOVERY_QUIET_PERIOD_MS: u64 = 60_000;
/// Number of trailing inter-event intervals kept for the tempo check.
const INTERVAL_WINDOW: usize = 10;
/// Number of trailing intervals treated as "recent" in the tempo check.
const TEMPO_RECENT_INTERVALS: usize = 3;
/// Minimum recorded intervals before the tempo check engages.
const TEMPO_MIN_INTERVALS: usize = 4;

// ============================================================================
// SECTION: Safety Gate
// ============================================================================

/// Authoritative veto layer with budget, rate, cooldown, and health state.
pub struct SafetyGate<C> {
    /// Frozen pipeline configuration.
    config: PipelineConfig,
    /// Injected monotonic clock.
    clock: C,
    /// Tokens consumed in the current budget window.
    tokens_used: u64,
    /// Tool calls recorded in the current budget window.
    tool_calls: u32,
    /// Millisecond timestamp the current budget window opened at.
    window_start: u64,
    /// Bounded FIFO of inter-event intervals for the tempo check.
    intervals: VecDeque<u64>,
    /// Millisecond timestamp of the most recent recorded event, when any.
    last_event_ms: Option<u64>,
    /// Millisecond timestamp until which all decisions are rejected.
    cooldown_until: Option<u64>,
    /// Accumulated health accounting.
    health: HealthState,
}

impl<C: Clock> SafetyGate<C> {
    /// Creates a gate with a fresh budget window and pristine health.
    #[must_use]
    pub fn new(config: PipelineConfig, clock: C) -> Self {
        let window_start = clock.now_ms();
        Self {
            config,
            clock,
            tokens_used: 0,
            tool_calls: 0,
            window_start,
            intervals: VecDeque::with_capacity(INTERVAL_WINDOW),
            last_event_ms: None,
            cooldown_until: None,
            health: HealthState::new(),
        }
    }

    /// Returns the current health state.
    #[must_use]
    pub const fn health(&self) -> &HealthState {
        &self.health
    }

    /// Returns the active cooldown deadline, when one is armed.
    #[must_use]
    pub const fn cooldown_until(&self) -> Option<u64> {
        self.cooldown_until
    }

    /// Evaluates an intent against the current window, cooldown, and health.
    #[must_use]
    pub fn evaluate(&mut self, intent: &IntentDecision, state: &ActivityState) -> SafetyDecision {
        let now = self.clock.now_ms();
        self.roll_window(now);

        if intent.confidence < self.config.confidence_minimum {
            let reason = format!(
                "intent confidence {:.2} below minimum {:.2}",
                intent.confidence, self.config.confidence_minimum
            );
            return self.veto(VetoReason::HealthDegraded, reason, now);
        }
        if let Some(until) = self.cooldown_until {
            if now < until {
                let remaining = until.saturating_sub(now);
                let reason = format!("cooldown active for another {remaining} ms");
                return self.veto(VetoReason::CooldownActive, reason, now);
            }
            self.cooldown_until = None;
        }
        if matches!(self.health.status, HealthStatus::Suspended | HealthStatus::Stopped) {
            let reason = format!(
                "health status {} with score {:.2}",
                self.health.status, self.health.score
            );
            return self.veto(VetoReason::HealthDegraded, reason, now);
        }

        match state.mode() {
            ActivityMode::Runaway => {
                self.arm_cooldown(now);
                return self.veto(
                    VetoReason::RunawayDetected,
                    "RUNAWAY mode vetoed; cooldown engaged".to_owned(),
                    now,
                );
            }
            ActivityMode::Looping => {
                self.arm_cooldown(now);
                return self.veto(
                    VetoReason::LoopDetected,
                    "LOOPING mode vetoed; cooldown engaged".to_owned(),
                    now,
                );
            }
            ActivityMode::Idle | ActivityMode::Working => {}
        }
        if let Some((recent_mean, earlier_mean)) = self.tempo_means() {
            if recent_mean < earlier_mean * self.config.tempo_compression_ratio {
                let reason = format!(
                    "inter-event tempo compressed: recent mean {recent_mean:.0} ms against earlier mean {earlier_mean:.0} ms"
                );
                return self.veto(VetoReason::RateLimitExceeded, reason, now);
            }
        }
        if self.tool_calls >= self.config.max_tool_calls_per_minute {
            let reason = format!(
                "{} tool calls in window at limit {}",
                self.tool_calls, self.config.max_tool_calls_per_minute
            );
            return self.veto(VetoReason::RateLimitExceeded, reason, now);
        }

        if self.tokens_used >= self.config.max_tokens_per_minute {
            let reason = format!(
                "{} tokens in window at limit {}",
                self.tokens_used, self.config.max_tokens_per_minute
            );
            return self.veto(VetoReason::TokenBudgetExceeded, reason, now);
        }

        let remaining = self.remaining_budget();
        SafetyDecision {
            allowed: true,
            remaining_budget: remaining,
            reason: format!("within budget: {remaining} tokens remaining"),
            veto_reason: None,
            timestamp: now,
        }
    }

    /// Charges one event's consumption against the current window.
    pub fn record_event(&mut self, token_count: u64, tool_calls: u32) {
        let now = self.clock.now_ms();
        self.roll_window(now);
        self.tokens_used = self.tokens_used.saturating_add(token_count);
        self.tool_calls = self.tool_calls.saturating_add(tool_calls);
        if let Some(previous) = self.last_event_ms {
            self.intervals.push_back(now.saturating_sub(previous));
            while self.intervals.len() > INTERVAL_WINDOW {
                self.intervals.pop_front();
            }
        }
        self.last_event_ms = Some(now);
    }

    /// Accounts an execution result fed back by the host.
    ///
    /// Late, partial, and contract-violating executions each record an
    /// anomaly against the health score.
    pub fn record_execution_result(
        &mut self,
        result: &ExecutionResult,
        preceding: &SafetyDecision,
    ) -> Option<HealthChange> {
        let before = self.health.clone();
        if result.executed && result.latency_ms > EXECUTION_LATENCY_ANOMALY_MS {
            self.apply_anomaly(AnomalySeverity::Soft);
        }
        if result.executed && result.status == ExecutionStatus::Partial {
            self.apply_anomaly(AnomalySeverity::Soft);
        }
        if !result.executed && preceding.allowed {
            self.apply_anomaly(AnomalySeverity::Hard);
        }
        (before != self.health).then(|| HealthChange {
            previous: before,
            current: self.health.clone(),
        })
    }

    /// Records one anomaly of the given severity.
    pub fn record_anomaly(&mut self, severity: AnomalySeverity) -> Option<HealthChange> {
        let before = self.health.clone();
        self.apply_anomaly(severity);
        (before != self.health).then(|| HealthChange {
            previous: before,
            current: self.health.clone(),
        })
    }

    /// Applies one anomaly-free recovery tick.
    ///
    /// A gate that never recorded an anomaly has nothing to recover and keeps
    /// its pristine score. Recovery is withheld inside the quiet period after
    /// an anomaly and forever once STOPPED; once recovery applies, the score
    /// is clamped to the recovery cap and never reports full healing again.
    pub fn tick_recovery(&mut self) -> Option<HealthChange> {
        let now = self.clock.now_ms();
        let Some(last) = self.health.last_anomaly else {
            return None;
        };
        if now.saturating_sub(last) < RECOVERY_QUIET_PERIOD_MS {
            return None;
        }
        if self.health.status == HealthStatus::Stopped {
            return None;
        }
        let before = self.health.clone();
        if self.health.error_streak > 0 {
            self.health.error_streak = 0;
        }
        self.health.score =
            (self.health.score + self.config.recovery_rate).min(self.config.recovery_cap);
        self.health.status = self.status_for(self.health.score);
        (before != self.health).then(|| HealthChange {
            previous: before,
            current: self.health.clone(),
        })
    }

    /// Clears window, cooldown, intervals, and health back to construction
    /// state.
    pub fn reset(&mut self) {
        self.tokens_used = 0;
        self.tool_calls = 0;
        self.window_start = self.clock.now_ms();
        self.intervals.clear();
        self.last_event_ms = None;
        self.cooldown_until = None;
        self.health = HealthState::new();
    }

    /// Opens a fresh budget window when the current one has gone stale.
    fn roll_window(&mut self, now: u64) {
        if now.saturating_sub(self.window_start) >= BUDGET_WINDOW_MS {
            self.tokens_used = 0;
            self.tool_calls = 0;
            self.window_start = now;
        }
    }

    /// Returns tokens left in the current window.
    const fn remaining_budget(&self) -> u64 {
        self.config.max_tokens_per_minute.saturating_sub(self.tokens_used)
    }

    /// Arms the post-veto cooldown.
    fn arm_cooldown(&mut self, now: u64) {
        self.cooldown_until = Some(now.saturating_add(self.config.cooldown_duration_ms));
    }

    /// Builds a vetoed decision carrying the tagged cause.
    fn veto(&self, veto_reason: VetoReason, reason: String, now: u64) -> SafetyDecision {
        SafetyDecision {
            allowed: false,
            remaining_budget: self.remaining_budget(),
            reason,
            veto_reason: Some(veto_reason),
            timestamp: now,
        }
    }

    /// Returns recent and earlier interval means when enough intervals exist.
    fn tempo_means(&self) -> Option<(f64, f64)> {
        if self.intervals.len() < TEMPO_MIN_INTERVALS {
            return None;
        }
        let items: Vec<u64> = self.intervals.iter().copied().collect();
        let split = items.len() - TEMPO_RECENT_INTERVALS;
        let earlier_start = items.len().saturating_sub(2 * TEMPO_RECENT_INTERVALS);
        let recent = &items[split..];
        let earlier = &items[earlier_start..split];
        if earlier.is_empty() {
            return None;
        }
        Some((mean(recent), mean(earlier)))
    }

    /// Derives the health status for a score.
    fn status_for(&self, score: f64) -> HealthStatus {
        if score < self.config.hard_stop {
            HealthStatus::Stopped
        } else if score < self.config.soft_suspend {
            HealthStatus::Suspended
        } else if score < HEALTH_DEGRADED_CUTOFF {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }

    /// Lowers the score and recomputes derived health fields.
    fn apply_anomaly(&mut self, severity: AnomalySeverity) {
        let penalty = match severity {
            AnomalySeverity::Soft => self.config.soft_anomaly_severity,
            AnomalySeverity::Hard => self.config.hard_anomaly_severity,
        };
        self.health.score = (self.health.score - penalty).max(0.0);
        self.health.last_anomaly = Some(self.clock.now_ms());
        self.health.anomaly_count = self.health.anomaly_count.saturating_add(1);
        self.health.error_streak = self.health.error_streak.saturating_add(1);
        self.health.status = self.status_for(self.health.score);
    }
}

// ============================================================================
// SECTION: Interval Statistics
// ============================================================================

/// Returns the arithmetic mean of a slice of millisecond intervals.
fn mean(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u64 = values.iter().copied().fold(0, u64::saturating_add);
    sum as f64 / values.len() as f64
}
