// crates/tripwired-core/src/lib.rs
// ============================================================================
// Module: Tripwired Core Library
// Description: Public API surface for the Tripwired decision core.
// Purpose: Expose core types, interfaces, and the runtime pipeline.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Tripwired core provides the deterministic decision pipeline of a
//! behavioral kill-switch for autonomous agents: it classifies activity
//! event streams, proposes intents, and vetoes or allows execution with a
//! replayable fingerprint. It is host-agnostic and integrates through
//! explicit interfaces rather than embedding into agent frameworks.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use interfaces::ActivityEngine;
pub use interfaces::AdapterError;
pub use interfaces::EngineError;
pub use interfaces::ExecutionAdapter;
pub use interfaces::NullTelemetrySink;
pub use interfaces::TelemetrySink;
pub use runtime::ActivityClassifier;
pub use runtime::IntentCore;
pub use runtime::Pipeline;
pub use runtime::PipelineError;
pub use runtime::ProcessOutcome;
pub use runtime::RunReport;
pub use runtime::SafetyGate;
