// Rust guideline compliant 2026-10-14

//! Preference store -- folds validated interaction events into a session's
//! decaying [`PreferenceProfile`].
//!
//! Entry point: [`PreferenceStore::apply_event`]. Configuration via
//! [`PreferenceConfig::builder`].

use std::time::Duration;

use domain::{CatalogItem, InteractionEvent, InteractionKind, PreferenceProfile, decay_factor};

// ---------------------------------------------------------------------------
// PreferenceError
// ---------------------------------------------------------------------------

/// Errors raised while configuring the preference store.
///
/// `apply_event` itself is total; malformed events are rejected by the domain event model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PreferenceError {
    /// The supplied configuration is invalid.
    #[error("invalid preference configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// PreferenceConfig + builder
// ---------------------------------------------------------------------------

/// Longest view duration that still earns bonus weight.
pub const DURATION_CAP: Duration = Duration::from_secs(60);

/// Seconds of viewing per extra point of weight.
const SECONDS_PER_POINT: f64 = 20.0;

/// Tunable constants of the preference store.
///
/// Construct via [`PreferenceConfig::builder`].
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceConfig {
    /// Time constant of the exponential decay applied between events.
    pub half_life: Duration,
    /// Smoothing factor of the price-affinity moving average, in `(0, 1]`.
    pub price_alpha: f64,
    /// Weights that decay below this value are dropped from the profile.
    pub prune_below: f64,
}

/// Builder for [`PreferenceConfig`].
///
/// Obtain via [`PreferenceConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct PreferenceConfigBuilder {
    half_life: Duration,
    price_alpha: f64,
    prune_below: f64,
}

impl PreferenceConfig {
    /// Create a builder.
    ///
    /// Default values: `half_life = 3600 s`, `price_alpha = 0.3`, `prune_below = 1e-9`.
    #[must_use]
    pub fn builder() -> PreferenceConfigBuilder {
        PreferenceConfigBuilder {
            half_life: Duration::from_secs(3600),
            price_alpha: 0.3,
            prune_below: 1e-9,
        }
    }
}

impl Default for PreferenceConfig {
    fn default() -> Self {
        Self { half_life: Duration::from_secs(3600), price_alpha: 0.3, prune_below: 1e-9 }
    }
}

impl PreferenceConfigBuilder {
    /// Override the decay time constant.
    #[must_use]
    pub fn half_life(mut self, half_life: Duration) -> Self {
        self.half_life = half_life;
        self
    }

    /// Override the price-affinity smoothing factor.
    #[must_use]
    pub fn price_alpha(mut self, price_alpha: f64) -> Self {
        self.price_alpha = price_alpha;
        self
    }

    /// Override the pruning threshold. `0.0` keeps every weight forever.
    #[must_use]
    pub fn prune_below(mut self, prune_below: f64) -> Self {
        self.prune_below = prune_below;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PreferenceError::InvalidConfig`] when `half_life` is zero,
    /// `price_alpha` is outside `(0, 1]`, or `prune_below` is negative.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<PreferenceConfig, PreferenceError> {
        if self.half_life.is_zero() {
            return Err(PreferenceError::InvalidConfig { reason: "half_life must be > 0".to_owned() });
        }
        if self.price_alpha.is_nan() || self.price_alpha <= 0.0 || self.price_alpha > 1.0 {
            return Err(PreferenceError::InvalidConfig {
                reason: format!("price_alpha must be in (0, 1], got {}", self.price_alpha),
            });
        }
        if self.prune_below.is_nan() || self.prune_below < 0.0 {
            return Err(PreferenceError::InvalidConfig {
                reason: format!("prune_below must be >= 0, got {}", self.prune_below),
            });
        }
        Ok(PreferenceConfig {
            half_life: self.half_life,
            price_alpha: self.price_alpha,
            prune_below: self.prune_below,
        })
    }
}

// ---------------------------------------------------------------------------
// PreferenceStore
// ---------------------------------------------------------------------------

/// Weight an event contributes to its item's category and to each of its tags.
///
/// `viewWithDuration` earns `1 + min(duration, 60 s) / 20`, i.e. at most 3 bonus points.
#[must_use]
pub fn contribution(kind: InteractionKind) -> f64 {
    match kind {
        InteractionKind::ViewWithDuration { duration } => {
            kind.base_weight() + duration.min(DURATION_CAP).as_secs_f64() / SECONDS_PER_POINT
        }
        other => other.base_weight(),
    }
}

/// Pure profile-update logic. Holds configuration only; profiles are owned by the caller.
#[derive(Debug, Clone, Default)]
pub struct PreferenceStore {
    config: PreferenceConfig,
}

impl PreferenceStore {
    /// Create a store from `config`.
    #[must_use]
    pub fn new(config: PreferenceConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &PreferenceConfig {
        &self.config
    }

    /// Return `profile` updated with `event` on `item`.
    ///
    /// Existing weights are first decayed by the time elapsed since
    /// `profile.last_updated`. An event stamped before `last_updated` decays
    /// nothing and leaves `last_updated` unchanged; its weight is still added.
    /// Price affinity only moves on cart and wishlist events; the first such
    /// event seeds it with the item price.
    ///
    /// `item` must be the catalog entry referenced by `event.item_id`.
    #[must_use]
    pub fn apply_event(
        &self,
        profile: &PreferenceProfile,
        event: &InteractionEvent,
        item: &CatalogItem,
    ) -> PreferenceProfile {
        let mut next = profile.clone();

        let elapsed = profile
            .last_updated
            .map_or(Duration::ZERO, |last| event.timestamp.saturating_since(last));
        let factor = decay_factor(elapsed, self.config.half_life);
        if factor < 1.0 {
            let floor = self.config.prune_below;
            next.category_weight.retain(|_, w| {
                *w *= factor;
                *w > floor
            });
            next.tag_weight.retain(|_, w| {
                *w *= factor;
                *w > floor
            });
        }

        let weight = contribution(event.kind);
        *next.category_weight.entry(item.category).or_insert(0.0) += weight;
        for tag in &item.tags {
            *next.tag_weight.entry(tag.clone()).or_insert(0.0) += weight;
        }

        if event.kind.is_intent() {
            let alpha = self.config.price_alpha;
            next.price_affinity = Some(match profile.price_affinity {
                Some(old) => alpha * item.price + (1.0 - alpha) * old,
                None => item.price,
            });
        }

        next.last_updated = Some(profile.last_updated.map_or(event.timestamp, |last| last.max(event.timestamp)));

        tracing::debug!(
            item_id = %item.id,
            kind = event.kind.name(),
            weight,
            decay = factor,
            "preference.apply_event"
        );
        next
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Category, ItemId, Timestamp};

    fn tops_item() -> CatalogItem {
        CatalogItem::new(1, "Linen shirt", Category::Tops, ["linen", "summer"], 30.0)
    }

    fn event(kind: InteractionKind, secs: u64) -> InteractionEvent {
        InteractionEvent { item_id: ItemId(1), kind, timestamp: Timestamp::from_secs(secs) }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ------------------------------------------------------------------
    // PS-T01: config builder
    // ------------------------------------------------------------------

    #[test]
    fn config_defaults() {
        let cfg = PreferenceConfig::builder().build().unwrap();
        assert_eq!(cfg.half_life, Duration::from_secs(3600));
        assert!(close(cfg.price_alpha, 0.3));
        assert_eq!(cfg, PreferenceConfig::default());
    }

    #[test]
    fn config_zero_half_life_returns_err() {
        let cfg = PreferenceConfig::builder().half_life(Duration::ZERO).build();
        assert!(matches!(cfg, Err(PreferenceError::InvalidConfig { .. })));
    }

    #[test]
    fn config_alpha_out_of_range_returns_err() {
        for alpha in [0.0, -0.1, 1.5, f64::NAN] {
            let cfg = PreferenceConfig::builder().price_alpha(alpha).build();
            assert!(matches!(cfg, Err(PreferenceError::InvalidConfig { .. })), "alpha={alpha}");
        }
    }

    // ------------------------------------------------------------------
    // PS-T02: contribution per kind
    // ------------------------------------------------------------------

    #[test]
    fn contribution_per_kind() {
        assert!(close(contribution(InteractionKind::View), 1.0));
        assert!(close(contribution(InteractionKind::AddToCart), 5.0));
        assert!(close(contribution(InteractionKind::AddToWishlist), 3.0));
        let twenty = InteractionKind::ViewWithDuration { duration: Duration::from_secs(20) };
        assert!(close(contribution(twenty), 2.0));
    }

    #[test]
    fn long_view_is_capped_at_three_bonus_points() {
        let hour = InteractionKind::ViewWithDuration { duration: Duration::from_secs(3600) };
        assert!(close(contribution(hour), 4.0));
    }

    // ------------------------------------------------------------------
    // PS-T03: weights land on category and every tag
    // ------------------------------------------------------------------

    #[test]
    fn first_event_sets_category_and_tags() {
        let store = PreferenceStore::default();
        let p = store.apply_event(&PreferenceProfile::new(), &event(InteractionKind::AddToCart, 10), &tops_item());
        assert!(close(p.category_weight(Category::Tops), 5.0));
        assert!(close(p.tag_weight("linen"), 5.0));
        assert!(close(p.tag_weight("summer"), 5.0));
        assert!(close(p.category_weight(Category::Dresses), 0.0));
        assert_eq!(p.last_updated, Some(Timestamp::from_secs(10)));
    }

    #[test]
    fn input_profile_is_left_untouched() {
        let store = PreferenceStore::default();
        let before = PreferenceProfile::new();
        let _after = store.apply_event(&before, &event(InteractionKind::View, 0), &tops_item());
        assert!(before.is_empty());
    }

    // ------------------------------------------------------------------
    // PS-T04: decay
    // ------------------------------------------------------------------

    #[test]
    fn same_instant_events_accumulate_without_decay() {
        let store = PreferenceStore::default();
        let item = tops_item();
        let p = store.apply_event(&PreferenceProfile::new(), &event(InteractionKind::View, 5), &item);
        let p = store.apply_event(&p, &event(InteractionKind::View, 5), &item);
        assert!(close(p.category_weight(Category::Tops), 2.0));
    }

    #[test]
    fn repeated_event_after_long_gap_is_less_than_double() {
        let store = PreferenceStore::default();
        let item = tops_item();
        let once = store.apply_event(&PreferenceProfile::new(), &event(InteractionKind::AddToCart, 0), &item);
        let twice = store.apply_event(&once, &event(InteractionKind::AddToCart, 5 * 3600), &item);
        let single = once.category_weight(Category::Tops);
        let double = twice.category_weight(Category::Tops);
        assert!(double < 2.0 * single, "decay ignored: {double} vs {single}");
        assert!(double > single);
        let expected = 5.0 * (-5.0_f64).exp() + 5.0;
        assert!(close(double, expected));
    }

    #[test]
    fn decay_never_flips_sign() {
        let store = PreferenceStore::new(PreferenceConfig::builder().prune_below(0.0).build().unwrap());
        let item = tops_item();
        let other = CatalogItem::new(2, "Skirt", Category::Bottoms, ["denim"], 40.0);
        let p = store.apply_event(&PreferenceProfile::new(), &event(InteractionKind::View, 0), &item);
        let p = store.apply_event(&p, &event(InteractionKind::View, 100 * 3600), &other);
        assert!(p.category_weight.values().all(|w| *w >= 0.0));
        assert!(p.tag_weight.values().all(|w| *w >= 0.0));
    }

    #[test]
    fn fully_decayed_weights_are_pruned() {
        let store = PreferenceStore::default();
        let item = tops_item();
        let other = CatalogItem::new(2, "Skirt", Category::Bottoms, ["denim"], 40.0);
        let p = store.apply_event(&PreferenceProfile::new(), &event(InteractionKind::View, 0), &item);
        let p = store.apply_event(&p, &event(InteractionKind::View, 1000 * 3600), &other);
        assert!(!p.category_weight.contains_key(&Category::Tops));
        assert!(!p.tag_weight.contains_key("linen"));
        assert!(close(p.category_weight(Category::Bottoms), 1.0));
    }

    #[test]
    fn out_of_order_event_does_not_rewind_or_inflate() {
        let store = PreferenceStore::default();
        let item = tops_item();
        let p = store.apply_event(&PreferenceProfile::new(), &event(InteractionKind::View, 1000), &item);
        let p = store.apply_event(&p, &event(InteractionKind::View, 10), &item);
        assert_eq!(p.last_updated, Some(Timestamp::from_secs(1000)));
        assert!(close(p.category_weight(Category::Tops), 2.0));
    }

    // ------------------------------------------------------------------
    // PS-T05: price affinity
    // ------------------------------------------------------------------

    #[test]
    fn views_do_not_move_price_affinity() {
        let store = PreferenceStore::default();
        let p = store.apply_event(&PreferenceProfile::new(), &event(InteractionKind::View, 0), &tops_item());
        assert!(p.price_affinity.is_none());
    }

    #[test]
    fn price_affinity_is_an_exponential_average() {
        let store = PreferenceStore::default();
        let cheap = tops_item();
        let pricey = CatalogItem::new(3, "Parka", Category::Outerwear, ["down"], 130.0);
        let p = store.apply_event(&PreferenceProfile::new(), &event(InteractionKind::AddToCart, 0), &cheap);
        assert_eq!(p.price_affinity, Some(30.0));
        let p = store.apply_event(&p, &event(InteractionKind::AddToWishlist, 1), &pricey);
        let affinity = p.price_affinity.unwrap();
        assert!(close(affinity, 0.3 * 130.0 + 0.7 * 30.0));
    }
}
