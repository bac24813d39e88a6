// crates/tripwired-config/src/config.rs
// ============================================================================
// Module: Tripwired Configuration
// Description: Configuration loading and validation for the decision pipeline.
// Purpose: Provide strict, fail-closed TOML parsing of every threshold.
// Dependencies: serde, toml, tripwired-core
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits and
//! unknown-key rejection. Sections mirror the pipeline stages; every omitted
//! key keeps its documented default. Validation enforces range and ordering
//! constraints so a misconfigured gate can never be weaker than intended.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tripwired_core::PipelineConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Minimum buffered events the classifier needs for its trailing sample.
const MIN_EVENT_BUFFER_SIZE: usize = 10;
/// Minimum token-history length the intent trend computation needs.
const MIN_TOKEN_HISTORY_SIZE: usize = 6;
/// Minimum output hashes a loop window must compare.
const MIN_LOOP_WINDOW_SIZE: usize = 2;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: File Model
// ============================================================================

/// Top-level TOML document, one section per pipeline concern.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    /// Budget and rate thresholds.
    budget: BudgetSection,
    /// Classifier windows and thresholds.
    classifier: ClassifierSection,
    /// Intent core tunables.
    intent: IntentSection,
    /// Gate cooldown and confidence floor.
    gate: GateSection,
    /// Health scoring tunables.
    health: HealthSection,
}

/// `[budget]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BudgetSection {
    /// Token budget per 60-second window.
    max_tokens_per_minute: Option<u64>,
    /// Tool-call cap per 60-second window.
    max_tool_calls_per_minute: Option<u32>,
}

/// `[classifier]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ClassifierSection {
    /// Similarity score at which the hash window counts as looping.
    loop_similarity_threshold: Option<f64>,
    /// Number of output hashes compared for loop detection.
    loop_window_size: Option<usize>,
    /// Recent/earlier interval ratio counting as compressed tempo.
    tempo_compression_ratio: Option<f64>,
    /// Minimum time a classified state is retained, in milliseconds.
    min_state_duration_ms: Option<u64>,
    /// Extra hysteresis factor applied when leaving a critical mode.
    critical_exit_multiplier: Option<u64>,
    /// Tokens-per-minute rate below which intensity is LOW.
    intensity_low_threshold: Option<f64>,
    /// Tokens-per-minute rate above which intensity is HIGH.
    intensity_high_threshold: Option<f64>,
    /// Capacity of the classifier's event buffer.
    event_buffer_size: Option<usize>,
}

/// `[intent]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct IntentSection {
    /// Intent confidence lost per second between decisions.
    confidence_decay_rate: Option<f64>,
    /// Capacity of the intent core's token history.
    token_history_size: Option<usize>,
}

/// `[gate]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GateSection {
    /// Cooldown applied after a behavioral veto, in milliseconds.
    cooldown_duration_ms: Option<u64>,
    /// Intent confidence below which the gate rejects outright.
    confidence_minimum: Option<f64>,
}

/// `[health]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct HealthSection {
    /// Health score below which status becomes SUSPENDED.
    soft_suspend: Option<f64>,
    /// Health score below which status becomes STOPPED.
    hard_stop: Option<f64>,
    /// Health score regained per anomaly-free recovery tick.
    recovery_rate: Option<f64>,
    /// Upper bound the health score can recover to.
    recovery_cap: Option<f64>,
    /// Health penalty for a soft anomaly.
    soft_anomaly_severity: Option<f64>,
    /// Health penalty for a hard anomaly.
    hard_anomaly_severity: Option<f64>,
}

impl ConfigFile {
    /// Overlays the file's explicit keys onto the documented defaults.
    fn into_config(self) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        let Self {
            budget,
            classifier,
            intent,
            gate,
            health,
        } = self;
        if let Some(value) = budget.max_tokens_per_minute {
            config.max_tokens_per_minute = value;
        }
        if let Some(value) = budget.max_tool_calls_per_minute {
            config.max_tool_calls_per_minute = value;
        }
        if let Some(value) = classifier.loop_similarity_threshold {
            config.loop_similarity_threshold = value;
        }
        if let Some(value) = classifier.loop_window_size {
            config.loop_window_size = value;
        }
        if let Some(value) = classifier.tempo_compression_ratio {
            config.tempo_compression_ratio = value;
        }
        if let Some(value) = classifier.min_state_duration_ms {
            config.min_state_duration_ms = value;
        }
        if let Some(value) = classifier.critical_exit_multiplier {
            config.critical_exit_multiplier = value;
        }
        if let Some(value) = classifier.intensity_low_threshold {
            config.intensity_low_threshold = value;
        }
        if let Some(value) = classifier.intensity_high_threshold {
            config.intensity_high_threshold = value;
        }
        if let Some(value) = classifier.event_buffer_size {
            config.event_buffer_size = value;
        }
        if let Some(value) = intent.confidence_decay_rate {
            config.confidence_decay_rate = value;
        }
        if let Some(value) = intent.token_history_size {
            config.token_history_size = value;
        }
        if let Some(value) = gate.cooldown_duration_ms {
            config.cooldown_duration_ms = value;
        }
        if let Some(value) = gate.confidence_minimum {
            config.confidence_minimum = value;
        }
        if let Some(value) = health.soft_suspend {
            config.soft_suspend = value;
        }
        if let Some(value) = health.hard_stop {
            config.hard_stop = value;
        }
        if let Some(value) = health.recovery_rate {
            config.recovery_rate = value;
        }
        if let Some(value) = health.recovery_cap {
            config.recovery_cap = value;
        }
        if let Some(value) = health.soft_anomaly_severity {
            config.soft_anomaly_severity = value;
        }
        if let Some(value) = health.hard_anomaly_severity {
            config.hard_anomaly_severity = value;
        }
        config
    }
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads and validates a pipeline configuration from a TOML file.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read, exceeds the size
/// limit, fails to parse, or fails validation.
pub fn load_from_path(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    let content = std::str::from_utf8(&bytes)
        .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
    from_toml_str(content)
}

/// Parses and validates a pipeline configuration from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError`] when the text fails to parse or validation fails.
pub fn from_toml_str(content: &str) -> Result<PipelineConfig, ConfigError> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
    let config = file.into_config();
    validate(&config)?;
    Ok(config)
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a pipeline configuration for range and ordering constraints.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] naming the first violated constraint.
pub fn validate(config: &PipelineConfig) -> Result<(), ConfigError> {
    if config.max_tokens_per_minute == 0 {
        return Err(invalid("max_tokens_per_minute must be positive"));
    }
    if config.max_tool_calls_per_minute == 0 {
        return Err(invalid("max_tool_calls_per_minute must be positive"));
    }
    if config.loop_similarity_threshold <= 0.0 || config.loop_similarity_threshold > 1.0 {
        return Err(invalid("loop_similarity_threshold must lie in (0, 1]"));
    }
    if config.loop_window_size < MIN_LOOP_WINDOW_SIZE {
        return Err(invalid("loop_window_size must compare at least two hashes"));
    }
    if config.tempo_compression_ratio <= 0.0 || config.tempo_compression_ratio >= 1.0 {
        return Err(invalid("tempo_compression_ratio must lie in (0, 1)"));
    }
    if config.cooldown_duration_ms == 0 {
        return Err(invalid("cooldown_duration_ms must be positive"));
    }
    if config.min_state_duration_ms == 0 {
        return Err(invalid("min_state_duration_ms must be positive"));
    }
    if config.critical_exit_multiplier == 0 {
        return Err(invalid("critical_exit_multiplier must be positive"));
    }
    if config.intensity_low_threshold <= 0.0 {
        return Err(invalid("intensity_low_threshold must be positive"));
    }
    if config.intensity_high_threshold <= config.intensity_low_threshold {
        return Err(invalid("intensity_high_threshold must exceed intensity_low_threshold"));
    }
    if config.hard_stop <= 0.0 || config.hard_stop >= 1.0 {
        return Err(invalid("hard_stop must lie in (0, 1)"));
    }
    if config.soft_suspend <= config.hard_stop || config.soft_suspend >= 1.0 {
        return Err(invalid("soft_suspend must lie between hard_stop and 1"));
    }
    if config.recovery_rate <= 0.0 || config.recovery_rate > 1.0 {
        return Err(invalid("recovery_rate must lie in (0, 1]"));
    }
    if config.recovery_cap <= 0.0 || config.recovery_cap > 1.0 {
        return Err(invalid("recovery_cap must lie in (0, 1]"));
    }
    if config.confidence_minimum < 0.0 || config.confidence_minimum >= 1.0 {
        return Err(invalid("confidence_minimum must lie in [0, 1)"));
    }
    if config.confidence_decay_rate < 0.0 {
        return Err(invalid("confidence_decay_rate must not be negative"));
    }
    if config.soft_anomaly_severity <= 0.0 || config.soft_anomaly_severity > 1.0 {
        return Err(invalid("soft_anomaly_severity must lie in (0, 1]"));
    }
    if config.hard_anomaly_severity < config.soft_anomaly_severity
        || config.hard_anomaly_severity > 1.0
    {
        return Err(invalid("hard_anomaly_severity must lie in [soft_anomaly_severity, 1]"));
    }
    if config.event_buffer_size < MIN_EVENT_BUFFER_SIZE {
        return Err(invalid("event_buffer_size must hold the trailing intensity sample"));
    }
    if config.token_history_size < MIN_TOKEN_HISTORY_SIZE {
        return Err(invalid("token_history_size must hold the trend window"));
    }
    Ok(())
}

/// Builds an [`ConfigError::Invalid`] from a constraint description.
fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid(message.to_string())
}
