// crates/tripwired-core/src/core/time.rs
// ============================================================================
// Module: Tripwired Time Model
// Description: Injectable monotonic clocks for deterministic decision replay.
// Purpose: Let every component read time through one seam so replays are exact.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Tripwired timestamps are monotonic milliseconds. Components never call the
//! platform clock directly; they read an injected [`Clock`]. Hosts use
//! [`SystemClock`] in production and [`ManualClock`] for deterministic tests
//! and replay, where clones of one clock share a single time value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Instant;

// ============================================================================
// SECTION: Clock Seam
// ============================================================================

/// Monotonic time source measured in milliseconds.
///
/// # Invariants
/// - Successive reads are non-decreasing.
pub trait Clock {
    /// Returns the current monotonic time in milliseconds.
    fn now_ms(&self) -> u64;
}

// ============================================================================
// SECTION: System Clock
// ============================================================================

/// Platform clock anchored to its construction instant.
///
/// Clones share the anchor, so all components of one pipeline observe the
/// same monotonic scale.
#[derive(Debug, Clone)]
pub struct SystemClock {
    /// Instant the clock was anchored at; reads are elapsed time since then.
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock anchored at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

// ============================================================================
// SECTION: Manual Clock
// ============================================================================

/// Settable clock for deterministic tests and replay.
///
/// Clones share one underlying value; advancing any clone advances them all.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    /// Shared current time in milliseconds.
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a manual clock starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manual clock starting at the given millisecond value.
    #[must_use]
    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(now_ms)),
        }
    }

    /// Sets the clock to an absolute millisecond value.
    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    /// Advances the clock by the given number of milliseconds.
    pub fn advance(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
