// crates/tripwired-config/tests/config_defaults.rs
// ============================================================================
// Module: Config Defaults Tests
// Description: Tests for default thresholds and partial-file overlay.
// ============================================================================
//! ## Overview
//! Validates that omitted keys keep their documented defaults and explicit
//! keys override only themselves.

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
    clippy::float_cmp,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use tripwired_config::from_toml_str;
use tripwired_core::PipelineConfig;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Tests an empty document yields the documented defaults.
#[test]
fn test_empty_document_yields_defaults() {
    let config = from_toml_str("").unwrap();
    assert_eq!(config, PipelineConfig::default());
    assert_eq!(config.max_tokens_per_minute, 50_000);
    assert_eq!(config.max_tool_calls_per_minute, 60);
    assert_eq!(config.loop_similarity_threshold, 0.9);
    assert_eq!(config.loop_window_size, 5);
    assert_eq!(config.tempo_compression_ratio, 0.3);
    assert_eq!(config.cooldown_duration_ms, 60_000);
    assert_eq!(config.min_state_duration_ms, 10_000);
    assert_eq!(config.critical_exit_multiplier, 3);
    assert_eq!(config.intensity_low_threshold, 5_000.0);
    assert_eq!(config.intensity_high_threshold, 30_000.0);
    assert_eq!(config.soft_suspend, 0.6);
    assert_eq!(config.hard_stop, 0.3);
    assert_eq!(config.recovery_rate, 0.01);
    assert_eq!(config.recovery_cap, 0.8);
    assert_eq!(config.confidence_minimum, 0.2);
    assert_eq!(config.confidence_decay_rate, 0.0001);
    assert_eq!(config.soft_anomaly_severity, 0.02);
    assert_eq!(config.hard_anomaly_severity, 0.10);
    assert_eq!(config.event_buffer_size, 100);
    assert_eq!(config.token_history_size, 20);
}

/// Tests explicit keys override only themselves.
#[test]
fn test_partial_document_overlays_defaults() {
    let config = from_toml_str(
        r#"
        [budget]
        max_tokens_per_minute = 10000

        [classifier]
        loop_window_size = 8

        [health]
        recovery_cap = 0.5
        "#,
    )
    .unwrap();
    assert_eq!(config.max_tokens_per_minute, 10_000);
    assert_eq!(config.loop_window_size, 8);
    assert_eq!(config.recovery_cap, 0.5);
    assert_eq!(config.max_tool_calls_per_minute, 60);
    assert_eq!(config.min_state_duration_ms, 10_000);
}

/// Tests the shipped defaults pass validation.
#[test]
fn test_defaults_validate() {
    tripwired_config::validate(&PipelineConfig::default()).unwrap();
}
