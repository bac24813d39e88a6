// crates/tripwired-core/tests/execution_invariant.rs
// ============================================================================
// Module: Execution Invariant Tests
// Description: Tests that vetoed decisions never reach the adapter.
// ============================================================================
//! ## Overview
//! Validates that the adapter is called only for allowed decisions across a
//! stream containing vetoes.

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

use std::sync::Mutex;

use tripwired_core::AdapterError;
use tripwired_core::AgentEvent;
use tripwired_core::ExecutionAdapter;
use tripwired_core::ExecutionResult;
use tripwired_core::ExecutionStatus;
use tripwired_core::ManualClock;
use tripwired_core::NullTelemetrySink;
use tripwired_core::Pipeline;
use tripwired_core::PipelineConfig;
use tripwired_core::SafetyDecision;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Adapter that records the decisions it was invoked with.
struct FlaggingAdapter {
    /// Timestamps of decisions that reached the adapter.
    invocations: Mutex<Vec<u64>>,
}

impl FlaggingAdapter {
    fn new() -> Self {
        Self {
            invocations: Mutex::new(Vec::new()),
        }
    }

    fn invocations(&self) -> Vec<u64> {
        self.invocations.lock().unwrap().clone()
    }
}

impl ExecutionAdapter for &FlaggingAdapter {
    fn execute(&self, decision: &SafetyDecision) -> Result<ExecutionResult, AdapterError> {
        assert!(decision.allowed, "adapter invoked with a vetoed decision");
        self.invocations.lock().unwrap().push(decision.timestamp);
        Ok(ExecutionResult {
            executed: true,
            status: ExecutionStatus::Success,
            tokens_used: 0,
            latency_ms: 10,
            timestamp: decision.timestamp,
        })
    }
}

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

// ============================================================================
// SECTION: Execution Invariant
// ============================================================================

/// Tests the adapter never runs for vetoed events.
#[test]
fn test_adapter_never_runs_for_vetoed_events() {
    let clock = ManualClock::new();
    let adapter = FlaggingAdapter::new();
    let mut pipeline = Pipeline::with_classifier(
        PipelineConfig::default(),
        &adapter,
        None::<NullTelemetrySink>,
        clock.clone(),
    );

    // Fill the token window, then keep sending; everything at or past the
    // cap is vetoed and must never reach the adapter.
    let mut allowed = Vec::new();
    let mut vetoed = Vec::new();
    for step in 0..8u64 {
        let timestamp = step * 1_000;
        clock.set(timestamp);
        let outcome = pipeline.process(&event(timestamp, 10_000)).unwrap();
        if outcome.decision.allowed {
            allowed.push(timestamp);
            assert!(outcome.result.executed);
        } else {
            vetoed.push(timestamp);
            assert!(!outcome.result.executed);
            assert_eq!(outcome.result.status, ExecutionStatus::Blocked);
        }
    }

    assert!(!vetoed.is_empty(), "stream produced no vetoes");
    assert_eq!(adapter.invocations(), allowed);
}
