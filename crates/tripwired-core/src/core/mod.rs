// crates/tripwired-core/src/core/mod.rs
// ============================================================================
// Module: Tripwired Core Types
// Description: Canonical data model for the behavioral kill-switch pipeline.
// Purpose: Provide stable, serializable types for events, decisions, and replay.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Core types define the pipeline's data model: agent events, activity
//! states, intent and safety decisions, health accounting, telemetry records,
//! the frozen configuration, and the replay fingerprint. These types are the
//! canonical source of truth for any derived surfaces.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod activity;
pub mod config;
pub mod decision;
pub mod event;
pub mod fingerprint;
pub mod health;
pub mod telemetry;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use activity::ActivityMode;
pub use activity::ActivityState;
pub use activity::Intensity;
pub use activity::StateError;
pub use config::PipelineConfig;
pub use decision::Intent;
pub use decision::IntentDecision;
pub use decision::SafetyDecision;
pub use decision::VetoReason;
pub use event::AgentEvent;
pub use event::ExecutionResult;
pub use event::ExecutionStatus;
pub use fingerprint::HashError;
pub use fingerprint::SessionDigest;
pub use fingerprint::SessionFingerprint;
pub use fingerprint::canonical_json_bytes;
pub use health::AnomalySeverity;
pub use health::HealthChange;
pub use health::HealthState;
pub use health::HealthStatus;
pub use telemetry::SystemEvent;
pub use time::Clock;
pub use time::ManualClock;
pub use time::SystemClock;
