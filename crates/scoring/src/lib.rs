// Rust guideline compliant 2026-10-14

//! Scoring engine for the recommendation pipeline.
//!
//! [`Scorer`] maps `(CatalogItem, PreferenceProfile)` to a raw, unbounded,
//! non-negative relevance score and ranks a catalog by it. It owns no state
//! beyond its configuration -- profiles are read, never written.

use domain::{CatalogItem, ItemId, PreferenceProfile};

// ---------------------------------------------------------------------------
// ScoringError
// ---------------------------------------------------------------------------

/// Errors raised while configuring the scorer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    /// The supplied configuration is invalid.
    #[error("invalid scoring configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// ScoringConfig + builder
// ---------------------------------------------------------------------------

/// Tunable constants of the scorer.
///
/// Construct via [`ScoringConfig::builder`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Weight of the price-distance penalty.
    pub price_lambda: f64,
}

/// Builder for [`ScoringConfig`].
#[derive(Debug)]
pub struct ScoringConfigBuilder {
    price_lambda: f64,
}

impl ScoringConfig {
    /// Create a builder. Default value: `price_lambda = 0.5`.
    #[must_use]
    pub fn builder() -> ScoringConfigBuilder {
        ScoringConfigBuilder { price_lambda: 0.5 }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { price_lambda: 0.5 }
    }
}

impl ScoringConfigBuilder {
    /// Override the price-distance penalty weight.
    #[must_use]
    pub fn price_lambda(mut self, price_lambda: f64) -> Self {
        self.price_lambda = price_lambda;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidConfig`] when `price_lambda` is negative or not finite.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<ScoringConfig, ScoringError> {
        if !self.price_lambda.is_finite() || self.price_lambda < 0.0 {
            return Err(ScoringError::InvalidConfig {
                reason: format!("price_lambda must be finite and >= 0, got {}", self.price_lambda),
            });
        }
        Ok(ScoringConfig { price_lambda: self.price_lambda })
    }
}

// ---------------------------------------------------------------------------
// Ranking output
// ---------------------------------------------------------------------------

/// One ranked catalog entry with its raw score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredItem {
    pub item_id: ItemId,
    pub score: f64,
}

impl ScoredItem {
    /// Storefront "% match" for this entry. See [`match_percentage`].
    #[must_use]
    pub fn match_percentage(&self) -> f64 {
        match_percentage(self.score)
    }
}

/// Result of ranking a catalog against a profile.
#[derive(Debug, Clone, PartialEq)]
pub enum Ranking {
    /// Every item scored zero; the caller must apply its own default ordering.
    ColdStart,
    /// Top entries, score descending, ties by ascending id.
    Ranked(Vec<ScoredItem>),
}

/// Presentation transform of a raw score into a `0..=100` percentage.
#[must_use]
pub fn match_percentage(score: f64) -> f64 {
    (score * 20.0).clamp(0.0, 100.0)
}

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

/// Content-based scorer: category affinity, tag affinity, price comfort zone.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    /// Create a scorer from `config`.
    #[must_use]
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Raw relevance of `item` for `profile`, never negative.
    ///
    /// `category weight + sum of tag weights - price penalty`, where the
    /// penalty is `lambda * |price - affinity| / max(affinity, 1)` and is zero
    /// while the profile has no price affinity yet.
    #[must_use]
    pub fn score(&self, item: &CatalogItem, profile: &PreferenceProfile) -> f64 {
        let affinity = profile.category_weight(item.category)
            + item.tags.iter().map(|t| profile.tag_weight(t)).sum::<f64>();
        let penalty = profile.price_affinity.map_or(0.0, |comfort| {
            self.config.price_lambda * (item.price - comfort).abs() / comfort.max(1.0)
        });
        (affinity - penalty).max(0.0)
    }

    /// Rank `items` against `profile` and keep the first `n`.
    ///
    /// Returns [`Ranking::ColdStart`] when every item scores zero (including an
    /// empty catalog) so no arbitrary order is mistaken for personalization.
    #[must_use]
    pub fn rank<'a, I>(&self, items: I, profile: &PreferenceProfile, n: usize) -> Ranking
    where
        I: IntoIterator<Item = &'a CatalogItem>,
    {
        let mut scored: Vec<ScoredItem> = items
            .into_iter()
            .map(|item| ScoredItem { item_id: item.id, score: self.score(item, profile) })
            .collect();

        if scored.iter().all(|s| s.score <= 0.0) {
            tracing::debug!(catalog_size = scored.len(), "scoring.rank.cold_start");
            return Ranking::ColdStart;
        }

        scored.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.item_id.cmp(&b.item_id)));
        scored.truncate(n);
        tracing::debug!(returned = scored.len(), "scoring.rank");
        Ranking::Ranked(scored)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Category, Timestamp};

    fn catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new(1, "Tee A", Category::Tops, ["cotton"], 30.0),
            CatalogItem::new(2, "Tee B", Category::Tops, ["linen"], 32.0),
            CatalogItem::new(3, "Coat C", Category::Outerwear, ["wool"], 200.0),
        ]
    }

    fn profile(tops: f64, cotton: f64, affinity: Option<f64>) -> PreferenceProfile {
        let mut p = PreferenceProfile::new();
        p.category_weight.insert(Category::Tops, tops);
        p.tag_weight.insert("cotton".to_owned(), cotton);
        p.price_affinity = affinity;
        p.last_updated = Some(Timestamp::ZERO);
        p
    }

    fn ids(ranking: &Ranking) -> Vec<u64> {
        match ranking {
            Ranking::ColdStart => vec![],
            Ranking::Ranked(items) => items.iter().map(|s| s.item_id.0).collect(),
        }
    }

    // ------------------------------------------------------------------
    // SC-T01: config
    // ------------------------------------------------------------------

    #[test]
    fn config_negative_lambda_returns_err() {
        let cfg = ScoringConfig::builder().price_lambda(-1.0).build();
        assert!(matches!(cfg, Err(ScoringError::InvalidConfig { .. })));
    }

    #[test]
    fn config_default_lambda() {
        let cfg = ScoringConfig::builder().build().unwrap();
        assert_eq!(cfg, ScoringConfig::default());
    }

    // ------------------------------------------------------------------
    // SC-T02: score
    // ------------------------------------------------------------------

    #[test]
    fn empty_profile_scores_zero_for_every_item() {
        let scorer = Scorer::default();
        let empty = PreferenceProfile::new();
        for item in &catalog() {
            assert!(scorer.score(item, &empty).abs() < f64::EPSILON, "item {}", item.id);
        }
    }

    #[test]
    fn score_sums_category_and_tags_without_affinity() {
        let scorer = Scorer::default();
        let p = profile(4.0, 1.5, None);
        let items = catalog();
        assert!((scorer.score(&items[0], &p) - 5.5).abs() < 1e-9);
        assert!((scorer.score(&items[1], &p) - 4.0).abs() < 1e-9);
        assert!(scorer.score(&items[2], &p).abs() < f64::EPSILON);
    }

    #[test]
    fn price_penalty_scales_with_distance() {
        let scorer = Scorer::default();
        let p = profile(4.0, 0.0, Some(30.0));
        let items = catalog();
        let at_comfort = scorer.score(&items[0], &p);
        let near = scorer.score(&items[1], &p);
        assert!((at_comfort - 4.0).abs() < 1e-9);
        assert!((near - (4.0 - 0.5 * 2.0 / 30.0)).abs() < 1e-9);
    }

    #[test]
    fn small_affinity_uses_unit_denominator() {
        let scorer = Scorer::default();
        let p = profile(10.0, 0.0, Some(0.5));
        let item = CatalogItem::new(9, "Tank", Category::Tops, Vec::<String>::new(), 2.5);
        assert!((scorer.score(&item, &p) - (10.0 - 0.5 * 2.0)).abs() < 1e-9);
    }

    #[test]
    fn score_is_clamped_and_bounded() {
        let scorer = Scorer::new(ScoringConfig::builder().price_lambda(50.0).build().unwrap());
        let p = profile(1.0, 1.0, Some(10.0));
        for item in &catalog() {
            let s = scorer.score(item, &p);
            assert!(s >= 0.0);
            assert!(s <= p.total_weight());
        }
    }

    // ------------------------------------------------------------------
    // SC-T03: rank
    // ------------------------------------------------------------------

    #[test]
    fn empty_profile_ranks_as_cold_start() {
        let scorer = Scorer::default();
        assert_eq!(scorer.rank(&catalog(), &PreferenceProfile::new(), 3), Ranking::ColdStart);
    }

    #[test]
    fn empty_catalog_ranks_as_cold_start() {
        let scorer = Scorer::default();
        assert_eq!(scorer.rank(&Vec::<CatalogItem>::new(), &profile(1.0, 0.0, None), 3), Ranking::ColdStart);
    }

    #[test]
    fn rank_orders_by_score_then_truncates() {
        let scorer = Scorer::default();
        let ranking = scorer.rank(&catalog(), &profile(4.0, 1.0, None), 2);
        assert_eq!(ids(&ranking), vec![1, 2]);
    }

    #[test]
    fn zero_scores_trail_personalized_items() {
        let scorer = Scorer::default();
        let ranking = scorer.rank(&catalog(), &profile(4.0, 1.0, None), 10);
        assert_eq!(ids(&ranking), vec![1, 2, 3]);
    }

    #[test]
    fn ties_break_by_ascending_id() {
        let scorer = Scorer::default();
        let mut items = catalog();
        items.reverse();
        let p = profile(2.0, 0.0, None);
        let first = scorer.rank(&items, &p, 3);
        let second = scorer.rank(&items, &p, 3);
        assert_eq!(ids(&first), vec![1, 2, 3]);
        assert_eq!(first, second);
    }

    #[test]
    fn match_percentage_is_capped() {
        assert!((match_percentage(2.5) - 50.0).abs() < 1e-9);
        assert!((match_percentage(40.0) - 100.0).abs() < f64::EPSILON);
        let s = ScoredItem { item_id: ItemId(1), score: 1.0 };
        assert!((s.match_percentage() - 20.0).abs() < 1e-9);
    }
}
