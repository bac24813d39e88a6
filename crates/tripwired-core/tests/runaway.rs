// crates/tripwired-core/tests/runaway.rs
// ============================================================================
// Module: Runaway Boundary Tests
// Description: Tests for tempo-compression detection and the runaway veto.
// ============================================================================
//! ## Overview
//! Validates that sudden acceleration at high intensity trips the runaway
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
use tripwired_core::Intensity;
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

fn event(timestamp: u64) -> AgentEvent {
    AgentEvent {
        timestamp,
        token_count: 5_000,
        tool_calls: 1,
        latency_ms: 100,
        output_length: 256,
        output_hash: None,
    }
}

// ============================================================================
// SECTION: Runaway Veto
// ============================================================================

/// Tests tempo compression at high intensity trips the runaway veto.
#[test]
fn test_tempo_compression_trips_runaway_veto() {
    let clock = ManualClock::new();
    let mut pipeline = Pipeline::with_classifier(
        PipelineConfig::default(),
        EchoAdapter,
        None::<NullTelemetrySink>,
        clock.clone(),
    );

    // A steady cadence of heavy events at five-second intervals.
    for step in 0..5u64 {
        clock.set(step * 5_000);
        let outcome = pipeline.process(&event(step * 5_000)).unwrap();
        assert_ne!(outcome.state.mode(), ActivityMode::Runaway);
    }

    // The cadence collapses to half-second intervals; once the recent
    // interval mean drops below 30% of the earlier mean, the classifier
    // flips to RUNAWAY and the gate vetoes with a cooldown.
    let mut veto_seen = false;
    for step in 1..=5u64 {
        let timestamp = 20_000 + step * 500;
        clock.set(timestamp);
        let outcome = pipeline.process(&event(timestamp)).unwrap();
        if outcome.state.mode() == ActivityMode::Runaway {
            assert_eq!(outcome.state.intensity(), Intensity::High);
            assert_eq!(outcome.intent.intent, Intent::Stop);
            assert!(!outcome.decision.allowed);
            assert_eq!(outcome.decision.veto_reason, Some(VetoReason::RunawayDetected));
            assert_eq!(outcome.result.status, ExecutionStatus::Blocked);
            veto_seen = true;
            break;
        }
    }
    assert!(veto_seen, "runaway veto never fired");
}

/// Tests the runaway veto is followed by an armed cooldown.
#[test]
fn test_runaway_veto_arms_cooldown() {
    let clock = ManualClock::new();
    let mut pipeline = Pipeline::with_classifier(
        PipelineConfig::default(),
        EchoAdapter,
        None::<NullTelemetrySink>,
        clock.clone(),
    );
    for step in 0..5u64 {
        clock.set(step * 5_000);
        pipeline.process(&event(step * 5_000)).unwrap();
    }
    for step in 1..=5u64 {
        let timestamp = 20_000 + step * 500;
        clock.set(timestamp);
        pipeline.process(&event(timestamp)).unwrap();
    }

    // The next event lands inside the cooldown armed by the veto.
    clock.set(24_000);
    let outcome = pipeline.process(&event(24_000)).unwrap();
    assert!(!outcome.decision.allowed);
    assert_eq!(outcome.decision.veto_reason, Some(VetoReason::CooldownActive));
}
