// Rust guideline compliant 2026-10-16

//! Shopper simulator -- drives a `RecommendationService` with seeded,
//! storefront-like traffic.
//!
//! Each [`Shopper`] favours one category, browses detail views through a
//! [`ViewTimer`], and adds items to cart or wishlist. Like the storefront,
//! it refreshes its recommendations after every cart or wishlist action.
//! Configuration via [`SimulatorConfig::builder`].

use std::time::Duration;

use domain::{CatalogItem, Category, KIND_ADD_TO_CART, KIND_ADD_TO_WISHLIST, RawEvent};
use rand::seq::IndexedRandom as _;
use rand::{Rng as _, SeedableRng, rngs::StdRng};
use recommender::{RecommendError, RecommendationService, Recommendations, SessionId};

use super::clock::ScaledClock;
use super::in_memory_catalog::InMemoryCatalog;
use super::view_timer::ViewTimer;

/// Size of the recommendation strip refreshed after intent actions.
const STRIP_SIZE: usize = 4;

// ---------------------------------------------------------------------------
// SimulatorError
// ---------------------------------------------------------------------------

/// Errors that can occur while simulating shoppers.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    /// The supplied configuration is invalid.
    #[error("invalid simulator configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// The catalog has nothing to browse.
    #[error("catalog is empty")]
    EmptyCatalog,
    /// The recommendation service rejected a call.
    #[error("recommendation service error: {0}")]
    Recommend(#[from] RecommendError),
}

// ---------------------------------------------------------------------------
// SimulatorConfig + builder
// ---------------------------------------------------------------------------

/// Runtime configuration for a [`Simulator`].
///
/// Construct via [`SimulatorConfig::builder`].
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Actions per shopper (range: `[1, ..]`).
    pub actions_per_shopper: usize,
    /// Longest real time a detail view stays open.
    pub max_dwell: Duration,
    /// Real delay between two actions.
    pub pace: Duration,
    /// Probability of picking an item from the favourite category, in `[0, 1]`.
    pub loyalty: f64,
    /// Optional RNG seed for reproducible traffic. `None` seeds from the OS.
    pub seed: Option<u64>,
}

/// Builder for [`SimulatorConfig`].
///
/// Obtain via [`SimulatorConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct SimulatorConfigBuilder {
    actions_per_shopper: usize,
    max_dwell: Duration,
    pace: Duration,
    loyalty: f64,
    seed: Option<u64>,
}

impl SimulatorConfig {
    /// Create a builder. `actions_per_shopper` is the only required parameter.
    ///
    /// Default values: `max_dwell = 60 ms`, `pace = 25 ms`, `loyalty = 0.7`, `seed = None`.
    #[must_use]
    pub fn builder(actions_per_shopper: usize) -> SimulatorConfigBuilder {
        SimulatorConfigBuilder {
            actions_per_shopper,
            max_dwell: Duration::from_millis(60),
            pace: Duration::from_millis(25),
            loyalty: 0.7,
            seed: None,
        }
    }
}

impl SimulatorConfigBuilder {
    /// Override the longest detail-view dwell time.
    #[must_use]
    pub fn max_dwell(mut self, max_dwell: Duration) -> Self {
        self.max_dwell = max_dwell;
        self
    }

    /// Override the inter-action delay.
    #[must_use]
    pub fn pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    /// Override the favourite-category probability.
    #[must_use]
    pub fn loyalty(mut self, loyalty: f64) -> Self {
        self.loyalty = loyalty;
        self
    }

    /// Fix the RNG seed for deterministic traffic (useful in tests).
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::InvalidConfig`] when `actions_per_shopper` is
    /// zero or `loyalty` is outside `[0, 1]`.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<SimulatorConfig, SimulatorError> {
        if self.actions_per_shopper == 0 {
            return Err(SimulatorError::InvalidConfig {
                reason: "actions_per_shopper must be >= 1".to_owned(),
            });
        }
        if !(0.0..=1.0).contains(&self.loyalty) {
            return Err(SimulatorError::InvalidConfig {
                reason: format!("loyalty must be in [0, 1], got {}", self.loyalty),
            });
        }
        Ok(SimulatorConfig {
            actions_per_shopper: self.actions_per_shopper,
            max_dwell: self.max_dwell,
            pace: self.pace,
            loyalty: self.loyalty,
            seed: self.seed,
        })
    }
}

// ---------------------------------------------------------------------------
// Simulator / Shopper
// ---------------------------------------------------------------------------

/// Hands out independently seeded [`Shopper`]s.
#[derive(Debug)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    #[must_use]
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Create shopper number `index` favouring `favorite`.
    ///
    /// With a configured seed, shopper `index` always gets seed `seed + index`.
    #[must_use]
    pub fn shopper(&self, index: u64, favorite: Category) -> Shopper {
        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index)),
            None => StdRng::from_os_rng(),
        };
        Shopper { config: self.config.clone(), favorite, rng, timer: ViewTimer::new() }
    }
}

/// Summary of one shopper's visit.
#[derive(Debug)]
pub struct ShopperReport {
    pub session: SessionId,
    pub favorite: Category,
    /// Events accepted by the service.
    pub events_recorded: usize,
    /// Recommendations served after the last action.
    pub final_recommendations: Recommendations,
}

/// One simulated visitor. Owns its RNG and view timer; `Send`, so it can run as a task.
#[derive(Debug)]
pub struct Shopper {
    config: SimulatorConfig,
    favorite: Category,
    rng: StdRng,
    timer: ViewTimer,
}

/// What a shopper does with the item it picked.
#[derive(Debug, Clone, Copy)]
enum Action {
    Browse,
    Wishlist,
    Cart,
}

impl Shopper {
    fn pick_item<'a>(&mut self, catalog: &'a InMemoryCatalog) -> Result<&'a CatalogItem, SimulatorError> {
        use domain::Catalog as _;

        let favorites: Vec<&CatalogItem> = catalog.in_category(self.favorite).collect();
        let loyal = self.rng.random_bool(self.config.loyalty);
        let picked = if loyal && !favorites.is_empty() {
            favorites.choose(&mut self.rng).copied()
        } else {
            catalog.items().choose(&mut self.rng)
        };
        picked.ok_or(SimulatorError::EmptyCatalog)
    }

    fn pick_action(&mut self) -> Action {
        let roll: f64 = self.rng.random();
        if roll < 0.6 {
            Action::Browse
        } else if roll < 0.85 {
            Action::Wishlist
        } else {
            Action::Cart
        }
    }

    /// Play `actions_per_shopper` actions against `service` as `session`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::EmptyCatalog`] when there is nothing to pick,
    /// or [`SimulatorError::Recommend`] if the service rejects a call (e.g.
    /// the session was ended concurrently).
    pub async fn run(
        mut self,
        service: &RecommendationService<InMemoryCatalog>,
        session: SessionId,
        clock: &ScaledClock,
    ) -> Result<ShopperReport, SimulatorError> {
        let mut events_recorded = 0usize;

        for _ in 0..self.config.actions_per_shopper {
            let item_id = self.pick_item(service.catalog())?.id;
            match self.pick_action() {
                Action::Browse => {
                    for event in self.timer.open(item_id, clock.now()) {
                        service.record_interaction(session, event)?;
                        events_recorded += 1;
                    }
                    let dwell = self.rng.random_range(Duration::ZERO..=self.config.max_dwell);
                    tokio::time::sleep(dwell).await;
                    if let Some(event) = self.timer.close(clock.now()) {
                        service.record_interaction(session, event)?;
                        events_recorded += 1;
                    }
                }
                action @ (Action::Wishlist | Action::Cart) => {
                    let kind = if matches!(action, Action::Cart) { KIND_ADD_TO_CART } else { KIND_ADD_TO_WISHLIST };
                    service.record_interaction(session, RawEvent::new(item_id, kind, clock.now()))?;
                    events_recorded += 1;
                    let strip = service.recommend(session, STRIP_SIZE)?;
                    tracing::debug!(%session, %item_id, kind, strip = ?strip.item_ids(), "shopper.strip.refreshed");
                }
            }
            tokio::time::sleep(self.config.pace).await;
        }

        let final_recommendations = service.recommend(session, STRIP_SIZE)?;
        tracing::info!(
            %session,
            favorite = %self.favorite,
            events_recorded,
            "shopper.visit.finished"
        );
        Ok(ShopperReport { session, favorite: self.favorite, events_recorded, final_recommendations })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
