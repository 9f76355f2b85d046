// Rust guideline compliant 2026-10-16

//! Recommendation service -- the only API surface the storefront talks to.
//!
//! Validates interaction events, folds them into the owning session's
//! profile, feeds the shared trending aggregator, and ranks the catalog on
//! demand with a cold-start fallback.
//!
//! Entry points: [`RecommendationService::start_session`],
//! [`RecommendationService::record_interaction`],
//! [`RecommendationService::recommend`], [`RecommendationService::trending`],
//! [`RecommendationService::end_session`]. Configuration via
//! [`RecommenderConfig::builder`].

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use domain::{Catalog, EventError, InteractionEvent, ItemId, PreferenceProfile, RawEvent};
use preference::{PreferenceConfig, PreferenceStore};
use scoring::{Ranking, ScoredItem, Scorer, ScoringConfig};
use serde::{Deserialize, Serialize};
use trending::TrendingAggregator;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identifiers and phases
// ---------------------------------------------------------------------------

/// Opaque session handle returned by [`RecommendationService::start_session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Underlying UUID, e.g. for correlating logs.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle of a session: `Created` -> `Active` -> `Ended` (terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Started, no interaction recorded yet.
    Created,
    /// At least one interaction recorded.
    Active,
    /// Ended; every operation on the session now fails with `UnknownSession`.
    Ended,
}

// ---------------------------------------------------------------------------
// RecommendError
// ---------------------------------------------------------------------------

/// Errors surfaced to the caller. No variant leaves partial state behind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecommendError {
    /// The session was never started or has ended.
    #[error("unknown session: {session}")]
    UnknownSession { session: SessionId },
    /// The event references an item missing from the catalog.
    #[error("unknown item: {item_id}")]
    UnknownItem { item_id: ItemId },
    /// The raw event failed validation.
    #[error("invalid event: {0}")]
    InvalidEvent(#[from] EventError),
}

// ---------------------------------------------------------------------------
// RecommenderConfig + builder
// ---------------------------------------------------------------------------

/// Ordering served while a session has no personal signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackOrder {
    /// Catalog insertion order.
    #[default]
    CatalogOrder,
    /// Current trending order, padded with catalog order.
    Trending,
}

/// Runtime configuration for a [`RecommendationService`].
///
/// Construct via [`RecommenderConfig::builder`].
#[derive(Debug, Clone, Default)]
pub struct RecommenderConfig {
    pub preference: PreferenceConfig,
    pub scoring: ScoringConfig,
    pub fallback: FallbackOrder,
}

/// Builder for [`RecommenderConfig`].
///
/// Component configs are validated by their own builders before they get here.
#[derive(Debug, Default)]
pub struct RecommenderConfigBuilder {
    preference: PreferenceConfig,
    scoring: ScoringConfig,
    fallback: FallbackOrder,
}

impl RecommenderConfig {
    /// Create a builder with every component at its default.
    #[must_use]
    pub fn builder() -> RecommenderConfigBuilder {
        RecommenderConfigBuilder::default()
    }
}

impl RecommenderConfigBuilder {
    /// Use a custom preference-store configuration.
    #[must_use]
    pub fn preference(mut self, preference: PreferenceConfig) -> Self {
        self.preference = preference;
        self
    }

    /// Use a custom scorer configuration.
    #[must_use]
    pub fn scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Choose the cold-start ordering.
    #[must_use]
    pub fn fallback(mut self, fallback: FallbackOrder) -> Self {
        self.fallback = fallback;
        self
    }

    #[must_use]
    pub fn build(self) -> RecommenderConfig {
        RecommenderConfig { preference: self.preference, scoring: self.scoring, fallback: self.fallback }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Where a recommendation list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationSource {
    /// Ranked against the session profile.
    Personalized,
    /// Configured default ordering; scores are all zero.
    Fallback,
}

/// Ordered recommendations for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    pub source: RecommendationSource,
    pub items: Vec<ScoredItem>,
}

impl Recommendations {
    /// Item ids in rank order.
    #[must_use]
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|s| s.item_id).collect()
    }

    #[must_use]
    pub fn is_personalized(&self) -> bool {
        self.source == RecommendationSource::Personalized
    }
}

// ---------------------------------------------------------------------------
// RecommendationService
// ---------------------------------------------------------------------------

/// Per-session state. The profile is written only by `record_interaction`.
#[derive(Debug)]
struct SessionSlot {
    phase: SessionPhase,
    profile: PreferenceProfile,
}

type SharedSlot = Arc<Mutex<SessionSlot>>;

fn lock_slot(slot: &SharedSlot) -> MutexGuard<'_, SessionSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Orchestrates the preference store, scorer and trending aggregator over a `Catalog` port.
///
/// Generic over `C: Catalog` for static dispatch. The trending aggregator is
/// injected so a single instance can be shared across services and hosts.
/// Each session is serialized by its own lock; distinct sessions never contend
/// except briefly on the session registry.
#[derive(Debug)]
pub struct RecommendationService<C: Catalog> {
    fallback: FallbackOrder,
    preferences: PreferenceStore,
    scorer: Scorer,
    catalog: C,
    trending: Arc<TrendingAggregator>,
    sessions: RwLock<HashMap<SessionId, SharedSlot>>,
}

impl<C: Catalog> RecommendationService<C> {
    /// Create a service over `catalog`, sharing `trending` with any other owner.
    #[must_use]
    pub fn new(config: RecommenderConfig, catalog: C, trending: Arc<TrendingAggregator>) -> Self {
        Self {
            fallback: config.fallback,
            preferences: PreferenceStore::new(config.preference),
            scorer: Scorer::new(config.scoring),
            catalog,
            trending,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// The catalog port this service ranks.
    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// The shared trending aggregator.
    #[must_use]
    pub fn trending_aggregator(&self) -> &Arc<TrendingAggregator> {
        &self.trending
    }

    /// Open a session with a fresh zero-weight profile.
    #[must_use]
    pub fn start_session(&self) -> SessionId {
        self.insert_session(PreferenceProfile::new())
    }

    /// Open a session from a previously flushed profile snapshot.
    ///
    /// The session starts `Active` when the snapshot carries any history.
    #[must_use]
    pub fn restore_session(&self, profile: PreferenceProfile) -> SessionId {
        self.insert_session(profile)
    }

    fn insert_session(&self, profile: PreferenceProfile) -> SessionId {
        let session = SessionId(Uuid::new_v4());
        let phase = if profile.is_empty() { SessionPhase::Created } else { SessionPhase::Active };
        let slot = Arc::new(Mutex::new(SessionSlot { phase, profile }));
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session, slot);
        tracing::info!(%session, ?phase, "recommender.session.started");
        session
    }

    /// Discard the session's profile. Later calls against it fail with `UnknownSession`.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::UnknownSession`] if the session is not open.
    pub fn end_session(&self, session: SessionId) -> Result<(), RecommendError> {
        let slot = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&session)
            .ok_or(RecommendError::UnknownSession { session })?;
        // An in-flight record_interaction holding a clone of the slot sees
        // `Ended` once it acquires the lock and backs out.
        lock_slot(&slot).phase = SessionPhase::Ended;
        tracing::info!(%session, "recommender.session.ended");
        Ok(())
    }

    fn slot(&self, session: SessionId) -> Result<SharedSlot, RecommendError> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&session)
            .map(Arc::clone)
            .ok_or(RecommendError::UnknownSession { session })
    }

    /// Current lifecycle phase of an open session.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::UnknownSession`] if the session is not open.
    pub fn session_phase(&self, session: SessionId) -> Result<SessionPhase, RecommendError> {
        let slot = self.slot(session)?;
        let phase = lock_slot(&slot).phase;
        match phase {
            SessionPhase::Ended => Err(RecommendError::UnknownSession { session }),
            open => Ok(open),
        }
    }

    /// Number of open sessions.
    #[must_use]
    pub fn active_sessions(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Copy of the session's profile, for an explicit flush by the host.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::UnknownSession`] if the session is not open.
    pub fn snapshot(&self, session: SessionId) -> Result<PreferenceProfile, RecommendError> {
        let slot = self.slot(session)?;
        let guard = lock_slot(&slot);
        if guard.phase == SessionPhase::Ended {
            return Err(RecommendError::UnknownSession { session });
        }
        Ok(guard.profile.clone())
    }

    /// Validate `raw`, fold it into the session's profile and the trending signal.
    ///
    /// All-or-nothing: on any error neither the profile nor trending is touched.
    /// Events for one session apply in call order; their timestamps drive decay only.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::InvalidEvent`] for a malformed event,
    /// [`RecommendError::UnknownSession`] for a session that is not open, or
    /// [`RecommendError::UnknownItem`] when the item is not in the catalog.
    pub fn record_interaction(&self, session: SessionId, raw: RawEvent) -> Result<(), RecommendError> {
        let event = InteractionEvent::try_from(raw).inspect_err(|e| {
            tracing::warn!(%session, error = %e, "recommender.event.rejected");
        })?;
        let slot = self.slot(session)?;
        let item = self
            .catalog
            .item(event.item_id)
            .ok_or(RecommendError::UnknownItem { item_id: event.item_id })?;

        let mut guard = lock_slot(&slot);
        if guard.phase == SessionPhase::Ended {
            return Err(RecommendError::UnknownSession { session });
        }
        let next = self.preferences.apply_event(&guard.profile, &event, item);
        self.trending.record_global(&event);
        guard.profile = next;
        guard.phase = SessionPhase::Active;
        drop(guard);

        tracing::debug!(%session, item_id = %event.item_id, kind = event.kind.name(), "recommender.interaction.recorded");
        Ok(())
    }

    /// Top `n` catalog items for the session, or the configured fallback on cold start.
    ///
    /// Repeated calls without an intervening `record_interaction` return identical results.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::UnknownSession`] if the session is not open.
    pub fn recommend(&self, session: SessionId, n: usize) -> Result<Recommendations, RecommendError> {
        let profile = self.snapshot(session)?;
        let recommendations = match self.scorer.rank(self.catalog.items(), &profile, n) {
            Ranking::Ranked(items) => Recommendations { source: RecommendationSource::Personalized, items },
            Ranking::ColdStart => Recommendations {
                source: RecommendationSource::Fallback,
                items: self.fallback_items(n),
            },
        };
        tracing::debug!(
            %session,
            source = ?recommendations.source,
            returned = recommendations.items.len(),
            "recommender.recommend"
        );
        Ok(recommendations)
    }

    fn fallback_items(&self, n: usize) -> Vec<ScoredItem> {
        let unscored = |item_id| ScoredItem { item_id, score: 0.0 };
        let catalog_order = self.catalog.items().iter().map(|item| item.id);
        match self.fallback {
            FallbackOrder::CatalogOrder => catalog_order.take(n).map(unscored).collect(),
            FallbackOrder::Trending => {
                let mut seen = HashSet::new();
                self.trending
                    .trending(n)
                    .into_iter()
                    .filter(|id| self.catalog.item(*id).is_some())
                    .chain(catalog_order)
                    .filter(|id| seen.insert(*id))
                    .take(n)
                    .map(unscored)
                    .collect()
            }
        }
    }

    /// Top `n` items by global popularity. Independent of any session.
    #[must_use]
    pub fn trending(&self, n: usize) -> Vec<ItemId> {
        self.trending.trending(n)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
