// crates/tripwired-core/examples/minimal.rs
// ============================================================================
// Module: Tripwired Minimal Example
// Description: Minimal end-to-end pipeline run with an in-memory adapter.
// Purpose: Demonstrate event processing, a loop veto, and replay parity.
// Dependencies: tripwired-core
// ============================================================================

//! ## Overview
//! Runs a short session through the decision pipeline: ordinary work, then a
//! repetitive burst that trips the loop veto. Exits nonzero when any expected
//! behavior is missing, so it doubles as a quick smoke check.

use tripwired_core::ActivityMode;
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
use tripwired_core::VetoReason;

/// Error type for example preconditions.
#[derive(Debug)]
struct ExampleError(&'static str);

impl std::fmt::Display for ExampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ExampleError {}

/// Adapter that acknowledges every allowed decision immediately.
struct ExampleAdapter;

impl ExecutionAdapter for ExampleAdapter {
    fn execute(&self, decision: &SafetyDecision) -> Result<ExecutionResult, AdapterError> {
        Ok(ExecutionResult {
            executed: true,
            status: ExecutionStatus::Success,
            tokens_used: 50,
            latency_ms: 15,
            timestamp: decision.timestamp,
        })
    }
}

fn event(timestamp: u64, output_hash: Option<&str>) -> AgentEvent {
    AgentEvent {
        timestamp,
        token_count: 600,
        tool_calls: 1,
        latency_ms: 120,
        output_length: 512,
        output_hash: output_hash.map(str::to_owned),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let clock = ManualClock::new();
    let mut pipeline = Pipeline::with_classifier(
        PipelineConfig::default(),
        ExampleAdapter,
        None::<NullTelemetrySink>,
        clock.clone(),
    );

    // Ordinary work passes the gate and executes.
    for step in 0..3u64 {
        let timestamp = step * 2_000;
        clock.set(timestamp);
        let outcome = pipeline.process(&event(timestamp, None))?;
        if !outcome.result.executed {
            return Err(Box::new(ExampleError("ordinary work should execute")));
        }
    }

    // A repetitive burst fills the hash window and trips the loop veto.
    let mut veto = None;
    for step in 0..6u64 {
        let timestamp = 6_000 + step * 3_000;
        clock.set(timestamp);
        let outcome = pipeline.process(&event(timestamp, Some("same-output")))?;
        if outcome.decision.veto_reason == Some(VetoReason::LoopDetected) {
            veto = Some(outcome);
            break;
        }
    }
    let vetoed = veto.ok_or(ExampleError("loop veto never fired"))?;
    if vetoed.state.mode() != ActivityMode::Looping {
        return Err(Box::new(ExampleError("veto should follow a LOOPING state")));
    }
    if vetoed.result.status != ExecutionStatus::Blocked {
        return Err(Box::new(ExampleError("vetoed work must be blocked")));
    }

    // The session fingerprint is ready for replay comparison.
    if pipeline.fingerprint().as_hex().len() != 64 {
        return Err(Box::new(ExampleError("fingerprint must be a sha-256 hex digest")));
    }
    Ok(())
}
