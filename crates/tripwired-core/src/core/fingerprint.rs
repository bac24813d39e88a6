// crates/tripwired-core/src/core/fingerprint.rs
// ============================================================================
// Module: Tripwired Replay Fingerprint
// Description: RFC 8785 canonicalization and incremental decision-stream digest.
// Purpose: Bind decision values and their sequence into one replayable hash.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Every agent event, intent decision, safety decision, and execution result
//! folds into an incremental SHA-256 digest as the canonical JSON (RFC 8785)
//! of a type-tagged record. Two runs over the same events with the same
//! configuration and clock produce equal digests; inequality indicates a
//! nondeterminism defect.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

use crate::core::decision::IntentDecision;
use crate::core::decision::SafetyDecision;
use crate::core::event::AgentEvent;
use crate::core::event::ExecutionResult;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when folding records into the fingerprint.
#[derive(Debug, Error)]
pub enum HashError {
    /// JSON canonicalization failed.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Canonicalization
// ============================================================================

/// Returns canonical JSON bytes for a serializable value using RFC 8785.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, HashError> {
    serde_jcs::to_vec(value).map_err(|err| HashError::Canonicalization(err.to_string()))
}

// ============================================================================
// SECTION: Session Digest
// ============================================================================

/// Lowercase hex SHA-256 digest of a decision stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionDigest(String);

impl SessionDigest {
    /// Returns the digest as a lowercase hex string slice.
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Fingerprint Records
// ============================================================================

/// Type-tagged wrapper serialized for each folded record.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum FingerprintRecord<'a> {
    /// An input agent event.
    Event {
        /// The observed event.
        event: &'a AgentEvent,
    },
    /// An intent core decision.
    Intent {
        /// The proposed intent.
        intent: &'a IntentDecision,
    },
    /// A safety gate verdict.
    Decision {
        /// The allow/veto verdict.
        decision: &'a SafetyDecision,
    },
    /// An execution adapter result.
    Result {
        /// The execution outcome.
        result: &'a ExecutionResult,
    },
}

// ============================================================================
// SECTION: Session Fingerprint
// ============================================================================

/// Incremental SHA-256 digest over the session's decision stream.
///
/// # Invariants
/// - Records fold in strict pipeline order: event, intent, decision, result.
#[derive(Clone, Default)]
pub struct SessionFingerprint {
    /// Incremental hash state.
    hasher: Sha256,
}

impl SessionFingerprint {
    /// Creates an empty fingerprint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Folds an agent event into the digest.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Canonicalization`] when serialization fails.
    pub fn fold_event(&mut self, event: &AgentEvent) -> Result<(), HashError> {
        self.fold(&FingerprintRecord::Event {
            event,
        })
    }

    /// Folds an intent decision into the digest.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Canonicalization`] when serialization fails.
    pub fn fold_intent(&mut self, intent: &IntentDecision) -> Result<(), HashError> {
        self.fold(&FingerprintRecord::Intent {
            intent,
        })
    }

    /// Folds a safety decision into the digest.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Canonicalization`] when serialization fails.
    pub fn fold_decision(&mut self, decision: &SafetyDecision) -> Result<(), HashError> {
        self.fold(&FingerprintRecord::Decision {
            decision,
        })
    }

    /// Folds an execution result into the digest.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Canonicalization`] when serialization fails.
    pub fn fold_result(&mut self, result: &ExecutionResult) -> Result<(), HashError> {
        self.fold(&FingerprintRecord::Result {
            result,
        })
    }

    /// Returns the current session digest without consuming the stream.
    #[must_use]
    pub fn digest(&self) -> SessionDigest {
        let digest = self.hasher.clone().finalize();
        SessionDigest(hex_encode(&digest))
    }

    /// Canonicalizes one tagged record and folds its bytes.
    fn fold(&mut self, record: &FingerprintRecord<'_>) -> Result<(), HashError> {
        let bytes = canonical_json_bytes(record)?;
        self.hasher.update(&bytes);
        Ok(())
    }
}

impl fmt::Debug for SessionFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionFingerprint").field("digest", &self.digest().as_hex()).finish()
    }
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}
