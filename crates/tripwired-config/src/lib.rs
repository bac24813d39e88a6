// crates/tripwired-config/src/lib.rs
// ============================================================================
// Module: Tripwired Config Library
// Description: Public API surface for Tripwired configuration loading.
// Purpose: Expose strict TOML loading and validation of pipeline thresholds.
// Dependencies: crate::config
// ============================================================================

//! ## Overview
//! Tripwired config turns a TOML file into a validated
//! [`PipelineConfig`](tripwired_core::PipelineConfig). Loading fails closed:
//! oversized files, unknown keys, and out-of-range thresholds are rejected
//! rather than silently corrected. Hosts embedding the core directly may
//! construct `PipelineConfig` themselves and call [`validate`] alone.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::from_toml_str;
pub use config::load_from_path;
pub use config::validate;
