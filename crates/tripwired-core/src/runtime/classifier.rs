// crates/tripwired-core/src/runtime/classifier.rs
// ============================================================================
// Module: Tripwired Activity Classifier
// Description: Buffered event-stream classification into mode and intensity.
// Purpose: Detect loops, runaway acceleration, and idleness with hysteresis.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The classifier keeps two bounded windows over the incoming stream: the
//! recent events themselves and the recent output hashes. Each call recomputes
//! a candidate state from the windows and passes it through a transition gate
//! that suppresses flapping; leaving a critical mode takes three times the
//! ordinary hysteresis.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::collections::VecDeque;

use crate::core::activity::ActivityMode;
use crate::core::activity::ActivityState;
use crate::core::activity::Intensity;
use crate::core::config::PipelineConfig;
use crate::core::event::AgentEvent;
use crate::core::time::Clock;
use crate::interfaces::ActivityEngine;
use crate::interfaces::EngineError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Quiet period after which the stream counts as idle, in milliseconds.
const IDLE_TIMEOUT_MS: u64 = 30_000;
/// Number of trailing events sampled for the intensity computation.
const INTENSITY_SAMPLE_SIZE: usize = 10;
/// Minimum buffered events before runaway detection engages.
const RUNAWAY_MIN_EVENTS: usize = 6;
/// Number of trailing intervals treated as "recent" in the tempo check.
const TEMPO_RECENT_INTERVALS: usize = 3;

// ============================================================================
// SECTION: Activity Classifier
// ============================================================================

/// Buffered classifier producing [`ActivityState`] records with hysteresis.
pub struct ActivityClassifier<C> {
    /// Frozen pipeline configuration.
    config: PipelineConfig,
    /// Injected monotonic clock.
    clock: C,
    /// Bounded FIFO of the most recent events.
    event_buffer: VecDeque<AgentEvent>,
    /// Bounded FIFO of the most recent output hashes.
    hash_buffer: VecDeque<String>,
    /// Currently held state, when any event has been observed.
    current: Option<ActivityState>,
}

impl<C: Clock> ActivityClassifier<C> {
    /// Creates a classifier with empty buffers.
    #[must_use]
    pub fn new(config: PipelineConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            event_buffer: VecDeque::with_capacity(config.event_buffer_size),
            hash_buffer: VecDeque::with_capacity(config.loop_window_size),
            current: None,
        }
    }

    /// Returns the currently held state, when any.
    #[must_use]
    pub const fn current_state(&self) -> Option<&ActivityState> {
        self.current.as_ref()
    }

    /// Absorbs one event into the buffers, evicting the oldest entries.
    fn absorb(&mut self, event: &AgentEvent) {
        self.event_buffer.push_back(event.clone());
        while self.event_buffer.len() > self.config.event_buffer_size {
            self.event_buffer.pop_front();
        }
        if let Some(hash) = &event.output_hash {
            self.hash_buffer.push_back(hash.clone());
            while self.hash_buffer.len() > self.config.loop_window_size {
                self.hash_buffer.pop_front();
            }
        }
    }

    /// Computes the candidate intensity from the trailing event sample.
    fn candidate_intensity(&self) -> Intensity {
        if self.event_buffer.len() < 3 {
            return Intensity::Normal;
        }
        let skip = self.event_buffer.len().saturating_sub(INTENSITY_SAMPLE_SIZE);
        let mut sample = self.event_buffer.iter().skip(skip);
        let Some(first) = sample.next() else {
            return Intensity::Normal;
        };
        let mut tokens = first.token_count;
        let mut last_ts = first.timestamp;
        let first_ts = first.timestamp;
        for event in sample {
            tokens = tokens.saturating_add(event.token_count);
            last_ts = event.timestamp;
        }
        let span = last_ts.saturating_sub(first_ts);
        let tokens_per_minute = if span == 0 {
            tokens as f64
        } else {
            (tokens as f64 / span as f64) * 60_000.0
        };
        if tokens_per_minute < self.config.intensity_low_threshold {
            Intensity::Low
        } else if tokens_per_minute > self.config.intensity_high_threshold {
            Intensity::High
        } else {
            Intensity::Normal
        }
    }

    /// Computes the candidate mode and its detail text, in priority order.
    fn candidate_mode(&self, intensity: Intensity, now: u64) -> (ActivityMode, String) {
        if let Some(detail) = self.loop_detail() {
            return (ActivityMode::Looping, detail);
        }
        if let Some(detail) = self.runaway_detail(intensity) {
            return (ActivityMode::Runaway, detail);
        }
        if let Some(detail) = self.idle_detail(now) {
            return (ActivityMode::Idle, detail);
        }
        (ActivityMode::Working, "stream advancing".to_owned())
    }

    /// Returns loop detail when the hash window is full and repetitive.
    fn loop_detail(&self) -> Option<String> {
        let window = self.config.loop_window_size;
        if window == 0 || self.hash_buffer.len() < window {
            return None;
        }
        let distinct = self.hash_buffer.iter().map(String::as_str).collect::<BTreeSet<_>>().len();
        let similarity = 1.0 - (distinct.saturating_sub(1)) as f64 / window as f64;
        if similarity >= self.config.loop_similarity_threshold {
            Some(format!("{distinct} distinct output hashes across window of {window}"))
        } else {
            None
        }
    }

    /// Returns runaway detail when tempo compresses at high intensity.
    fn runaway_detail(&self, intensity: Intensity) -> Option<String> {
        if self.event_buffer.len() < RUNAWAY_MIN_EVENTS || intensity != Intensity::High {
            return None;
        }
        let intervals = self.intervals();
        if intervals.len() <= TEMPO_RECENT_INTERVALS {
            return None;
        }
        let split = intervals.len() - TEMPO_RECENT_INTERVALS;
        let earlier_mean = mean(&intervals[..split]);
        let recent_mean = mean(&intervals[split..]);
        if recent_mean < earlier_mean * self.config.tempo_compression_ratio {
            Some(format!(
                "recent interval mean {recent_mean:.0} ms against earlier mean {earlier_mean:.0} ms"
            ))
        } else {
            None
        }
    }

    /// Returns idle detail when the stream has gone quiet.
    fn idle_detail(&self, now: u64) -> Option<String> {
        let Some(last) = self.event_buffer.back() else {
            return Some("event buffer empty".to_owned());
        };
        if now.saturating_sub(last.timestamp) > IDLE_TIMEOUT_MS {
            Some(format!("no events within {IDLE_TIMEOUT_MS} ms"))
        } else {
            None
        }
    }

    /// Returns successive timestamp deltas across the event buffer.
    fn intervals(&self) -> Vec<u64> {
        let mut intervals = Vec::with_capacity(self.event_buffer.len().saturating_sub(1));
        let mut previous: Option<u64> = None;
        for event in &self.event_buffer {
            if let Some(prev) = previous {
                intervals.push(event.timestamp.saturating_sub(prev));
            }
            previous = Some(event.timestamp);
        }
        intervals
    }

    /// Applies the transition gate to a freshly computed candidate.
    fn transition(&mut self, candidate: ActivityState, now: u64) -> ActivityState {
        let next = match self.current.take() {
            None => candidate,
            Some(current) => {
                let elapsed = now.saturating_sub(current.since());
                let hold = self.config.min_state_duration_ms;
                let critical_hold = hold.saturating_mul(self.config.critical_exit_multiplier);
                let leaving_critical =
                    current.mode().is_critical() && !candidate.mode().is_critical();
                let unchanged = current.mode() == candidate.mode()
                    && current.intensity() == candidate.intensity();
                let retain = elapsed < hold
                    || (leaving_critical && elapsed < critical_hold)
                    || unchanged;
                if retain {
                    current
                } else {
                    candidate
                }
            }
        };
        self.current = Some(next.clone());
        next
    }
}

impl<C: Clock> ActivityEngine for ActivityClassifier<C> {
    fn classify(&mut self, event: &AgentEvent) -> Result<ActivityState, EngineError> {
        self.absorb(event);
        let now = self.clock.now_ms();
        let intensity = self.candidate_intensity();
        let (mode, detail) = self.candidate_mode(intensity, now);
        let reason = format!("{mode} at {intensity} intensity: {detail}");
        let candidate = ActivityState::new(intensity, mode, reason, now)?;
        Ok(self.transition(candidate, now))
    }

    fn reset(&mut self) {
        self.event_buffer.clear();
        self.hash_buffer.clear();
        self.current = None;
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
