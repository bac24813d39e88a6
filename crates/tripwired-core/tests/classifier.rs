// crates/tripwired-core/tests/classifier.rs
// ============================================================================
// Module: Activity Classifier Tests
// Description: Tests for intensity mapping, mode priority, and hysteresis.
// ============================================================================
//! ## Overview
//! Validates classification of event streams into mode and intensity.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use tripwired_core::ActivityEngine;
use tripwired_core::ActivityMode;
use tripwired_core::ActivityState;
use tripwired_core::AgentEvent;
use tripwired_core::Intensity;
use tripwired_core::ManualClock;
use tripwired_core::PipelineConfig;
use tripwired_core::runtime::ActivityClassifier;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

fn event(timestamp: u64, token_count: u64) -> AgentEvent {
    AgentEvent {
        timestamp,
        token_count,
        tool_calls: 1,
        latency_ms: 100,
        output_length: 256,
        output_hash: None,
    }
}

fn hashed_event(timestamp: u64, token_count: u64, hash: &str) -> AgentEvent {
    AgentEvent {
        output_hash: Some(hash.to_string()),
        ..event(timestamp, token_count)
    }
}

fn classifier() -> (ActivityClassifier<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let classifier = ActivityClassifier::new(PipelineConfig::default(), clock.clone());
    (classifier, clock)
}

fn feed(
    classifier: &mut ActivityClassifier<ManualClock>,
    clock: &ManualClock,
    event: &AgentEvent,
) -> ActivityState {
    clock.set(event.timestamp);
    classifier.classify(event).unwrap()
}

// ============================================================================
// SECTION: Intensity Mapping
// ============================================================================

/// Tests short streams classify as normal working.
#[test]
fn test_short_stream_is_normal_working() {
    let (mut classifier, clock) = classifier();
    let state = feed(&mut classifier, &clock, &event(0, 500));
    assert_eq!(state.intensity(), Intensity::Normal);
    assert_eq!(state.mode(), ActivityMode::Working);
    assert!(state.reason().contains("WORKING"));
    assert!(state.reason().contains("NORMAL"));
}

/// Tests a sustained heavy token rate maps to high intensity.
#[test]
fn test_heavy_token_rate_maps_to_high_intensity() {
    let (mut classifier, clock) = classifier();
    // 10_000 tokens every 5 s is 120_000 tokens/minute.
    let mut state = feed(&mut classifier, &clock, &event(0, 10_000));
    for step in 1..4 {
        state = feed(&mut classifier, &clock, &event(step * 5_000, 10_000));
    }
    assert_eq!(state.intensity(), Intensity::High);
    assert_eq!(state.mode(), ActivityMode::Working);
}

/// Tests a trickle of tokens maps to low intensity.
#[test]
fn test_token_trickle_maps_to_low_intensity() {
    let (mut classifier, clock) = classifier();
    // 10 tokens every 20 s is 30 tokens/minute.
    feed(&mut classifier, &clock, &event(0, 10));
    feed(&mut classifier, &clock, &event(20_000, 10));
    let state = feed(&mut classifier, &clock, &event(40_000, 10));
    assert_eq!(state.intensity(), Intensity::Low);
    assert_eq!(state.mode(), ActivityMode::Working);
}

/// Tests a zero time span sums tokens directly.
#[test]
fn test_zero_time_span_uses_token_sum() {
    let (mut classifier, clock) = classifier();
    feed(&mut classifier, &clock, &event(0, 2_000));
    feed(&mut classifier, &clock, &event(0, 2_000));
    let state = feed(&mut classifier, &clock, &event(0, 2_000));
    // Sum is 6_000 tokens, between the 5_000 and 30_000 cutoffs.
    assert_eq!(state.intensity(), Intensity::Normal);
}

// ============================================================================
// SECTION: Loop Detection
// ============================================================================

/// Tests five identical output hashes classify as looping.
#[test]
fn test_identical_hashes_flag_looping() {
    let (mut classifier, clock) = classifier();
    let mut state = feed(&mut classifier, &clock, &hashed_event(0, 500, "H"));
    for step in 1..5 {
        state = feed(&mut classifier, &clock, &hashed_event(step * 3_000, 500, "H"));
    }
    assert_eq!(state.mode(), ActivityMode::Looping);
    assert!(state.reason().contains("LOOPING"));
}

/// Tests a partially filled hash window never counts as looping.
#[test]
fn test_loop_detection_requires_full_window() {
    let (mut classifier, clock) = classifier();
    let mut state = feed(&mut classifier, &clock, &hashed_event(0, 500, "H"));
    for step in 1..4 {
        state = feed(&mut classifier, &clock, &hashed_event(step * 3_000, 500, "H"));
    }
    assert_eq!(state.mode(), ActivityMode::Working);
}

/// Tests two distinct hashes in the window stay below the loop threshold.
#[test]
fn test_mixed_hashes_stay_below_loop_threshold() {
    let (mut classifier, clock) = classifier();
    let mut state = feed(&mut classifier, &clock, &hashed_event(0, 500, "H"));
    for step in 1..5 {
        let hash = if step == 4 { "other" } else { "H" };
        state = feed(&mut classifier, &clock, &hashed_event(step * 3_000, 500, hash));
    }
    assert_eq!(state.mode(), ActivityMode::Working);
}

// ============================================================================
// SECTION: Idle Detection
// ============================================================================

/// Tests a stale stream classifies as idle.
#[test]
fn test_stale_stream_classifies_idle() {
    let (mut classifier, clock) = classifier();
    feed(&mut classifier, &clock, &event(0, 500));
    // The queued event is 35 s older than the clock when it is processed.
    clock.set(40_000);
    let state = classifier.classify(&event(5_000, 500)).unwrap();
    assert_eq!(state.mode(), ActivityMode::Idle);
    assert!(state.reason().contains("IDLE"));
}

// ============================================================================
// SECTION: Runaway Detection
// ============================================================================

/// Tests tempo compression at high intensity classifies as runaway.
#[test]
fn test_tempo_compression_classifies_runaway() {
    let (mut classifier, clock) = classifier();
    let mut state = feed(&mut classifier, &clock, &event(0, 5_000));
    for step in 1..5 {
        state = feed(&mut classifier, &clock, &event(step * 5_000, 5_000));
    }
    for step in 1..4 {
        state = feed(&mut classifier, &clock, &event(20_000 + step * 500, 5_000));
    }
    assert_eq!(state.mode(), ActivityMode::Runaway);
    assert_eq!(state.intensity(), Intensity::High);
}

/// Tests a steady tempo never classifies as runaway.
#[test]
fn test_steady_tempo_stays_working() {
    let (mut classifier, clock) = classifier();
    let mut state = feed(&mut classifier, &clock, &event(0, 5_000));
    for step in 1..8 {
        state = feed(&mut classifier, &clock, &event(step * 1_000, 5_000));
    }
    assert_eq!(state.mode(), ActivityMode::Working);
}

// ============================================================================
// SECTION: Transition Hysteresis
// ============================================================================

/// Tests a fresh state is retained for the minimum duration.
#[test]
fn test_state_retained_within_minimum_duration() {
    let (mut classifier, clock) = classifier();
    let first = feed(&mut classifier, &clock, &event(0, 500));
    // Heavy burst 1 s later would reclassify, but the hold window applies.
    feed(&mut classifier, &clock, &event(500, 20_000));
    let state = feed(&mut classifier, &clock, &event(1_000, 20_000));
    assert_eq!(state.intensity(), first.intensity());
    assert_eq!(state.since(), first.since());
}

/// Tests `since` only advances when the classification changes.
#[test]
fn test_since_is_stable_while_classification_holds() {
    let (mut classifier, clock) = classifier();
    let first = feed(&mut classifier, &clock, &event(0, 500));
    let mut state = first.clone();
    for step in 1..4 {
        state = feed(&mut classifier, &clock, &event(step * 6_000, 500));
    }
    assert_eq!(state.mode(), ActivityMode::Working);
    assert_eq!(state.since(), first.since());
}

// ============================================================================
// SECTION: Reset
// ============================================================================

/// Tests reset clears buffers and the held state.
#[test]
fn test_reset_clears_buffers_and_state() {
    let (mut classifier, clock) = classifier();
    for step in 0..5 {
        feed(&mut classifier, &clock, &hashed_event(step * 3_000, 500, "H"));
    }
    classifier.reset();
    assert!(classifier.current_state().is_none());
    let state = feed(&mut classifier, &clock, &event(20_000, 500));
    assert_eq!(state.mode(), ActivityMode::Working);
}
