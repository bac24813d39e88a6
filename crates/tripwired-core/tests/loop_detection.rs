// crates/tripwired-core/tests/loop_detection.rs
// ============================================================================
// Module: Loop Detection Boundary Tests
// Description: Tests for repeated-output vetoes and cooldown arming.
// ============================================================================
//! ## Overview
//! Validates that a full window of identical output hashes trips the loop
//! veto and arms the cooldown.

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

use tripwired_core::ActivityMode;
use tripwired_core::AdapterError;
use tripwired_core::AgentEvent;
use tripwired_core::ExecutionAdapter;
use tripwired_core::ExecutionResult;
use tripwired_core::ExecutionStatus;
use tripwired_core::Intent;
use tripwired_core::ManualClock;
use tripwired_core::NullTelemetrySink;
use tripwired_core::Pipeline;
use tripwired_core::PipelineConfig;
use tripwired_core::SafetyDecision;
use tripwired_core::VetoReason;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

struct EchoAdapter;

impl ExecutionAdapter for EchoAdapter {
    fn execute(&self, decision: &SafetyDecision) -> Result<ExecutionResult, AdapterError> {
        Ok(ExecutionResult {
            executed: true,
            status: ExecutionStatus::Success,
            tokens_used: 0,
            latency_ms: 10,
            timestamp: decision.timestamp,
        })
    }
}

fn hashed_event(timestamp: u64) -> AgentEvent {
    AgentEvent {
        timestamp,
        token_count: 500,
        tool_calls: 1,
        latency_ms: 100,
        output_length: 256,
        output_hash: Some("H".to_owned()),
    }
}

// ============================================================================
// SECTION: Loop Veto
// ============================================================================

/// Tests identical output hashes trip the loop veto with a cooldown.
#[test]
fn test_repeated_hashes_trip_loop_veto() {
    let clock = ManualClock::new();
    let mut pipeline = Pipeline::with_classifier(
        PipelineConfig::default(),
        EchoAdapter,
        None::<NullTelemetrySink>,
        clock.clone(),
    );

    // Four identical hashes leave the window one short of full.
    for step in 0..4u64 {
        clock.set(step * 3_000);
        let outcome = pipeline.process(&hashed_event(step * 3_000)).unwrap();
        assert_ne!(outcome.state.mode(), ActivityMode::Looping);
    }

    // The fifth fills the window; hysteresis has elapsed, so the mode flips
    // and the gate vetoes with a cooldown.
    clock.set(12_000);
    let outcome = pipeline.process(&hashed_event(12_000)).unwrap();
    assert_eq!(outcome.state.mode(), ActivityMode::Looping);
    assert_eq!(outcome.intent.intent, Intent::Pause);
    assert!(!outcome.decision.allowed);
    assert_eq!(outcome.decision.veto_reason, Some(VetoReason::LoopDetected));
    assert_eq!(outcome.result.status, ExecutionStatus::Blocked);

    // The sixth event lands inside the freshly armed cooldown.
    clock.set(15_000);
    let outcome = pipeline.process(&hashed_event(15_000)).unwrap();
    assert!(!outcome.decision.allowed);
    assert_eq!(outcome.decision.veto_reason, Some(VetoReason::CooldownActive));
}

/// Tests the loop cooldown expires after its full duration.
#[test]
fn test_loop_cooldown_expires() {
    let clock = ManualClock::new();
    let mut pipeline = Pipeline::with_classifier(
        PipelineConfig::default(),
        EchoAdapter,
        None::<NullTelemetrySink>,
        clock.clone(),
    );
    for step in 0..5u64 {
        clock.set(step * 3_000);
        pipeline.process(&hashed_event(step * 3_000)).unwrap();
    }

    // Cooldown was armed at 12 s for 60 s; at 71 s it still holds.
    clock.set(71_000);
    let held = pipeline.process(&hashed_event(71_000)).unwrap();
    assert_eq!(held.decision.veto_reason, Some(VetoReason::CooldownActive));

    // Past expiry the behavioral veto fires again because the state is
    // still LOOPING, re-arming the cooldown.
    clock.set(72_001);
    let reopened = pipeline.process(&hashed_event(72_001)).unwrap();
    assert_eq!(reopened.decision.veto_reason, Some(VetoReason::LoopDetected));
}
