// Rust guideline compliant 2026-10-16

//! Trending aggregator -- a process-wide, profile-independent popularity signal.
//!
//! [`TrendingAggregator`] is an explicitly owned service object: construct one
//! per process and share it by `Arc`. Its score map sits behind a single
//! `Mutex`, the only lock the engine needs. Entry points:
//! [`TrendingAggregator::record_global`], [`TrendingAggregator::trending`],
//! [`TrendingAggregator::reset`]. Configuration via [`TrendingConfig::builder`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use domain::{InteractionEvent, ItemId, Timestamp, decay_factor};

// ---------------------------------------------------------------------------
// TrendingError
// ---------------------------------------------------------------------------

/// Errors raised while configuring the aggregator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrendingError {
    /// The supplied configuration is invalid.
    #[error("invalid trending configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// TrendingConfig + builder
// ---------------------------------------------------------------------------

/// Runtime configuration for a [`TrendingAggregator`].
///
/// Construct via [`TrendingConfig::builder`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrendingConfig {
    /// Time constant of the decay applied to the whole map.
    pub half_life: Duration,
    /// Age of the window after which [`TrendingAggregator::reset_if_due`] clears it.
    pub reset_interval: Duration,
}

/// Builder for [`TrendingConfig`].
///
/// Obtain via [`TrendingConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct TrendingConfigBuilder {
    half_life: Duration,
    reset_interval: Duration,
}

impl TrendingConfig {
    /// Create a builder.
    ///
    /// Default values: `half_life = 3600 s`, `reset_interval = 24 h`.
    #[must_use]
    pub fn builder() -> TrendingConfigBuilder {
        TrendingConfigBuilder {
            half_life: Duration::from_secs(3600),
            reset_interval: Duration::from_secs(24 * 3600),
        }
    }
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self { half_life: Duration::from_secs(3600), reset_interval: Duration::from_secs(24 * 3600) }
    }
}

impl TrendingConfigBuilder {
    /// Override the decay time constant.
    #[must_use]
    pub fn half_life(mut self, half_life: Duration) -> Self {
        self.half_life = half_life;
        self
    }

    /// Override the window length.
    #[must_use]
    pub fn reset_interval(mut self, reset_interval: Duration) -> Self {
        self.reset_interval = reset_interval;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TrendingError::InvalidConfig`] when either duration is zero.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<TrendingConfig, TrendingError> {
        if self.half_life.is_zero() {
            return Err(TrendingError::InvalidConfig { reason: "half_life must be > 0".to_owned() });
        }
        if self.reset_interval.is_zero() {
            return Err(TrendingError::InvalidConfig {
                reason: "reset_interval must be > 0".to_owned(),
            });
        }
        Ok(TrendingConfig { half_life: self.half_life, reset_interval: self.reset_interval })
    }
}

// ---------------------------------------------------------------------------
// Inner state
// ---------------------------------------------------------------------------

/// Score map plus the two anchors of the current window.
#[derive(Debug)]
struct TrendingState {
    item_score: HashMap<ItemId, f64>,
    /// Start of the current window; moved only by a reset.
    window_start: Timestamp,
    /// Instant every score in `item_score` is currently decayed to.
    decayed_at: Timestamp,
}

impl TrendingState {
    fn fresh(at: Timestamp) -> Self {
        Self { item_score: HashMap::new(), window_start: at, decayed_at: at }
    }
}

// ---------------------------------------------------------------------------
// TrendingAggregator
// ---------------------------------------------------------------------------

/// Decaying popularity counter shared by every session.
///
/// All methods take `&self`; the single `Mutex` is held only for the duration
/// of one in-memory update or query.
#[derive(Debug)]
pub struct TrendingAggregator {
    config: TrendingConfig,
    state: Mutex<TrendingState>,
}

impl TrendingAggregator {
    /// Create an empty aggregator whose first window opens at `started_at`.
    #[must_use]
    pub fn new(config: TrendingConfig, started_at: Timestamp) -> Self {
        Self { config, state: Mutex::new(TrendingState::fresh(started_at)) }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &TrendingConfig {
        &self.config
    }

    // Every critical section leaves the state consistent; a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, TrendingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decay the whole map to `event.timestamp`, then add the event's base weight.
    ///
    /// Duration and price play no part: trending measures raw engagement
    /// volume. An event stamped before the latest decay point is added at full
    /// weight without decaying anything.
    pub fn record_global(&self, event: &InteractionEvent) {
        let weight = event.kind.base_weight();
        let mut state = self.lock();

        let elapsed = event.timestamp.saturating_since(state.decayed_at);
        if !elapsed.is_zero() {
            let factor = decay_factor(elapsed, self.config.half_life);
            for score in state.item_score.values_mut() {
                *score *= factor;
            }
            state.decayed_at = event.timestamp;
        }

        *state.item_score.entry(event.item_id).or_insert(0.0) += weight;
        tracing::trace!(item_id = %event.item_id, weight, "trending.record_global");
    }

    /// Top `n` item ids by score, descending, ties by ascending id.
    #[must_use]
    pub fn trending(&self, n: usize) -> Vec<ItemId> {
        let mut entries: Vec<(ItemId, f64)> = {
            let state = self.lock();
            state.item_score.iter().map(|(id, score)| (*id, *score)).collect()
        };
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.into_iter().take(n).map(|(id, _)| id).collect()
    }

    /// `true` when `item_id` is among the current top `n`.
    #[must_use]
    pub fn is_trending(&self, item_id: ItemId, n: usize) -> bool {
        self.trending(n).contains(&item_id)
    }

    /// Current score of `item_id`, `None` if it has no interaction in this window.
    #[must_use]
    pub fn score_of(&self, item_id: ItemId) -> Option<f64> {
        self.lock().item_score.get(&item_id).copied()
    }

    /// Number of items with a score in this window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().item_score.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().item_score.is_empty()
    }

    /// Start of the current window.
    #[must_use]
    pub fn window_start(&self) -> Timestamp {
        self.lock().window_start
    }

    /// Clear every score and open a new window at `now`.
    pub fn reset(&self, now: Timestamp) {
        let cleared = {
            let mut state = self.lock();
            let cleared = state.item_score.len();
            *state = TrendingState::fresh(now);
            cleared
        };
        tracing::info!(cleared, "trending.reset");
    }

    /// Reset if the current window is at least `reset_interval` old.
    ///
    /// Intended for a periodic trigger owned by the host. Returns whether a reset happened.
    pub fn reset_if_due(&self, now: Timestamp) -> bool {
        let cleared = {
            let mut state = self.lock();
            if now.saturating_since(state.window_start) < self.config.reset_interval {
                return false;
            }
            let cleared = state.item_score.len();
            *state = TrendingState::fresh(now);
            cleared
        };
        tracing::info!(cleared, "trending.reset.scheduled");
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
