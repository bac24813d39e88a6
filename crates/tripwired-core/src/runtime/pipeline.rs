// crates/tripwired-core/src/runtime/pipeline.rs
// ============================================================================
// Module: Tripwired Pipeline Orchestrator
// Description: Composition of classifier, intent core, gate, and adapter.
// Purpose: Run the four-stage decision transaction with replay fingerprinting.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The pipeline is the sole public entry point. Each [`Pipeline::process`]
//! call is one synchronous transaction: classify, decide intent, gate, then
//! execute or skip. Stage faults at the classifier and adapter seams degrade
//! defensively (synthetic RUNAWAY state, FAILED result) instead of aborting
//! the decision loop, and every event, intent, decision, and result folds
//! into the session fingerprint in strict order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::activity::ActivityMode;
use crate::core::activity::ActivityState;
use crate::core::activity::Intensity;
use crate::core::activity::StateError;
use crate::core::config::PipelineConfig;
use crate::core::decision::IntentDecision;
use crate::core::decision::SafetyDecision;
use crate::core::event::AgentEvent;
use crate::core::event::ExecutionResult;
use crate::core::event::ExecutionStatus;
use crate::core::fingerprint::HashError;
use crate::core::fingerprint::SessionDigest;
use crate::core::fingerprint::SessionFingerprint;
use crate::core::health::HealthState;
use crate::core::telemetry::SystemEvent;
use crate::core::time::Clock;
use crate::interfaces::ActivityEngine;
use crate::interfaces::ExecutionAdapter;
use crate::interfaces::TelemetrySink;
use crate::runtime::classifier::ActivityClassifier;
use crate::runtime::gate::SafetyGate;
use crate::runtime::intent::IntentCore;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Component label attached to classifier stage errors.
const ACTIVITY_ENGINE_COMPONENT: &str = "ActivityEngine";
/// Component label attached to adapter stage errors.
const EXECUTION_ADAPTER_COMPONENT: &str = "ExecutionAdapter";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Catastrophic pipeline faults surfaced to the caller.
///
/// Stage faults never appear here; they degrade defensively inside
/// [`Pipeline::process`]. Only the pipeline's own orchestration (fingerprint
/// folding, synthetic state construction) can fail.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fingerprint folding failed.
    #[error(transparent)]
    Fingerprint(#[from] HashError),
    /// Synthetic state construction failed.
    #[error(transparent)]
    State(#[from] StateError),
}

// ============================================================================
// SECTION: Process Outcome
// ============================================================================

/// Full result of one pipeline transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome {
    /// Classified activity state (possibly the defensive fallback).
    pub state: ActivityState,
    /// Intent decision for the state.
    pub intent: IntentDecision,
    /// The gate's final verdict.
    pub decision: SafetyDecision,
    /// Execution result, synthetic when blocked or failed.
    pub result: ExecutionResult,
}

/// Collected output of a whole-run replay.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Telemetry records in emission order.
    pub telemetry: Vec<SystemEvent>,
    /// Final session fingerprint.
    pub fingerprint: SessionDigest,
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

/// Four-stage decision pipeline owning all per-session state.
///
/// # Invariants
/// - The adapter is called only for allowed decisions.
/// - Telemetry and fingerprint folds follow the fixed per-event order.
pub struct Pipeline<E, A, T, C> {
    /// Classifier seam implementation.
    engine: E,
    /// Intent core stage.
    intent: IntentCore<C>,
    /// Safety gate stage.
    gate: SafetyGate<C>,
    /// Execution adapter seam implementation.
    adapter: A,
    /// Optional downstream telemetry sink.
    sink: Option<T>,
    /// Injected monotonic clock.
    clock: C,
    /// Incremental replay fingerprint.
    fingerprint: SessionFingerprint,
    /// Owned telemetry log in emission order.
    telemetry: Vec<SystemEvent>,
    /// State returned for the previous event, for change detection.
    previous_state: Option<ActivityState>,
    /// Decision returned for the most recent event, for host feedback.
    last_decision: Option<SafetyDecision>,
}

impl<A, T, C> Pipeline<ActivityClassifier<C>, A, T, C>
where
    A: ExecutionAdapter,
    T: TelemetrySink,
    C: Clock + Clone,
{
    /// Creates a pipeline using the built-in activity classifier.
    #[must_use]
    pub fn with_classifier(
        config: PipelineConfig,
        adapter: A,
        sink: Option<T>,
        clock: C,
    ) -> Self {
        let engine = ActivityClassifier::new(config, clock.clone());
        Self::new(config, engine, adapter, sink, clock)
    }
}

impl<E, A, T, C> Pipeline<E, A, T, C>
where
    E: ActivityEngine,
    A: ExecutionAdapter,
    T: TelemetrySink,
    C: Clock + Clone,
{
    /// Creates a pipeline around a caller-supplied activity engine.
    #[must_use]
    pub fn new(
        config: PipelineConfig,
        engine: E,
        adapter: A,
        sink: Option<T>,
        clock: C,
    ) -> Self {
        Self {
            engine,
            intent: IntentCore::new(config, clock.clone()),
            gate: SafetyGate::new(config, clock.clone()),
            adapter,
            sink,
            clock,
            fingerprint: SessionFingerprint::new(),
            telemetry: Vec::new(),
            previous_state: None,
            last_decision: None,
        }
    }

    /// Runs one event through all four stages.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] only for catastrophic orchestration faults;
    /// stage faults degrade defensively and the transaction completes.
    pub fn process(&mut self, event: &AgentEvent) -> Result<ProcessOutcome, PipelineError> {
        let mut errors: Vec<(String, String)> = Vec::new();

        self.emit(SystemEvent::AgentEvent {
            event: event.clone(),
        });
        self.fingerprint.fold_event(event)?;

        let state = match self.engine.classify(event) {
            Ok(state) => state,
            Err(err) => {
                errors.push((ACTIVITY_ENGINE_COMPONENT.to_owned(), err.to_string()));
                self.defensive_state(&err)?
            }
        };
        if self.previous_state.as_ref() != Some(&state) {
            self.emit(SystemEvent::StateChange {
                previous: self.previous_state.clone(),
                current: state.clone(),
            });
            self.previous_state = Some(state.clone());
        }

        self.intent.update(event);
        let intent = self.intent.decide(&state);
        self.fingerprint.fold_intent(&intent)?;

        let decision = self.gate.evaluate(&intent, &state);
        self.gate.record_event(event.token_count, event.tool_calls);
        self.fingerprint.fold_decision(&decision)?;
        self.emit(SystemEvent::Intent {
            intent: intent.clone(),
            decision: decision.clone(),
        });

        let result = if decision.allowed {
            match self.adapter.execute(&decision) {
                Ok(result) => result,
                Err(err) => {
                    errors.push((EXECUTION_ADAPTER_COMPONENT.to_owned(), err.to_string()));
                    self.synthetic_result(ExecutionStatus::Failed)
                }
            }
        } else {
            self.synthetic_result(ExecutionStatus::Blocked)
        };
        self.fingerprint.fold_result(&result)?;
        self.emit(SystemEvent::Execution {
            result: result.clone(),
        });

        for (component, error) in errors {
            self.emit(SystemEvent::Error {
                component,
                error,
            });
        }

        self.last_decision = Some(decision.clone());
        Ok(ProcessOutcome {
            state,
            intent,
            decision,
            result,
        })
    }

    /// Processes a whole event sequence and reports telemetry plus the final
    /// fingerprint.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when any transaction faults catastrophically.
    pub fn run(&mut self, events: &[AgentEvent]) -> Result<RunReport, PipelineError> {
        for event in events {
            self.process(event)?;
        }
        Ok(RunReport {
            telemetry: self.telemetry.clone(),
            fingerprint: self.fingerprint.digest(),
        })
    }

    /// Feeds an execution result back into the gate's health accounting.
    ///
    /// Uses the decision returned for the most recent event; ignored when no
    /// event has been processed yet. Emits a health-change record when the
    /// health state moves. This path is host-driven; `process` never invokes
    /// it.
    pub fn feed_execution_result(&mut self, result: &ExecutionResult) {
        let Some(decision) = self.last_decision.clone() else {
            return;
        };
        if let Some(change) = self.gate.record_execution_result(result, &decision) {
            self.emit(SystemEvent::HealthChange {
                previous: change.previous,
                current: change.current,
            });
        }
    }

    /// Applies one anomaly-free recovery tick to the gate's health.
    pub fn tick_recovery(&mut self) {
        if let Some(change) = self.gate.tick_recovery() {
            self.emit(SystemEvent::HealthChange {
                previous: change.previous,
                current: change.current,
            });
        }
    }

    /// Resets every component, the telemetry log, and the fingerprint.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.intent.reset();
        self.gate.reset();
        self.fingerprint = SessionFingerprint::new();
        self.telemetry.clear();
        self.previous_state = None;
        self.last_decision = None;
    }

    /// Returns the telemetry log in emission order.
    #[must_use]
    pub fn telemetry(&self) -> &[SystemEvent] {
        &self.telemetry
    }

    /// Returns the current session fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> SessionDigest {
        self.fingerprint.digest()
    }

    /// Returns the gate's current health state.
    #[must_use]
    pub const fn health(&self) -> &HealthState {
        self.gate.health()
    }

    /// Appends a telemetry record and forwards it to the sink.
    fn emit(&mut self, event: SystemEvent) {
        if let Some(sink) = &self.sink {
            sink.record(&event);
        }
        self.telemetry.push(event);
    }

    /// Builds the defensive fallback state that forces a STOP downstream.
    fn defensive_state(&self, err: &dyn std::error::Error) -> Result<ActivityState, StateError> {
        ActivityState::new(
            Intensity::High,
            ActivityMode::Runaway,
            format!("RUNAWAY at HIGH intensity: activity engine failure: {err}"),
            self.clock.now_ms(),
        )
    }

    /// Builds a synthetic result for blocked or failed executions.
    fn synthetic_result(&self, status: ExecutionStatus) -> ExecutionResult {
        ExecutionResult {
            executed: false,
            status,
            tokens_used: 0,
            latency_ms: 0,
            timestamp: self.clock.now_ms(),
        }
    }
}
