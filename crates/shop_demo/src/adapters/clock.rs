// Rust guideline compliant 2026-10-16

//! Scaled monotonic clock handing out engine `Timestamp`s.
//!
//! Backed by `tokio::time::Instant`, so paused-time tests advance it
//! deterministically. `scale` compresses simulated hours into real seconds
//! so decay and window resets are visible in a short demo run.

use std::time::Duration;

use domain::Timestamp;
use tokio::time::Instant;

/// Monotonic clock whose origin is the moment it was created.
#[derive(Debug, Clone, Copy)]
pub struct ScaledClock {
    origin: Instant,
    scale: u32,
}

impl ScaledClock {
    /// Start a clock that runs `scale` times faster than real time. `0` is treated as `1`.
    #[must_use]
    pub fn new(scale: u32) -> Self {
        Self { origin: Instant::now(), scale: scale.max(1) }
    }

    /// Simulated time elapsed since creation.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        let elapsed = self.origin.elapsed().checked_mul(self.scale).unwrap_or(Duration::MAX);
        Timestamp::from_duration(elapsed)
    }
}
