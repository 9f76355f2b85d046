// Rust guideline compliant 2026-10-16

//! Recommendation throughput benchmark entry point.
//!
//! Measures engine throughput (operations per second) across a range of
//! catalog sizes. Each size is run `ROUNDS` times; min/avg/max throughput is
//! printed to stdout.
//!
//! # Measurement scope
//!
//! One operation is either a `record_interaction` or a `recommend` call,
//! interleaved `RECOMMEND_EVERY`-to-one over `SESSIONS` sessions. What is measured:
//!
//! - Event validation and catalog lookup
//! - Profile decay, weight accumulation and price-affinity update
//! - Trending decay over every tracked item
//! - Full-catalog scoring and ranking
//!
//! Catalog construction is excluded. No tracing subscriber is installed, so
//! log macros are disabled and add no I/O to the measurements.
//!
//! # Usage
//!
//! ```text
//! # Accurate throughput numbers (release build)
//! cargo run --bin shop_demo_bench --release
//! ```

// Load only the catalog adapter into this binary's module tree; the rest of
// `adapters` belongs to the demo binary.
#[path = "adapters/in_memory_catalog.rs"]
mod in_memory_catalog;

use std::sync::Arc;
use std::time::{Duration, Instant};

use domain::{
    CatalogItem, Category, ItemId, KIND_ADD_TO_CART, KIND_ADD_TO_WISHLIST, KIND_VIEW, KIND_VIEW_WITH_DURATION,
    RawEvent, Timestamp,
};
use in_memory_catalog::InMemoryCatalog;
use rand::seq::IndexedRandom as _;
use rand::{Rng as _, SeedableRng, rngs::StdRng};
use recommender::{RecommendationService, RecommenderConfig, SessionId};
use scoring::ScoringConfig;
use trending::{TrendingAggregator, TrendingConfig};

// ---------------------------------------------------------------------------
// Benchmark parameters
// ---------------------------------------------------------------------------

/// Operations per run.
const OPERATIONS: u64 = 20_000;

/// Number of runs averaged per catalog size.
const ROUNDS: u32 = 5;

/// Catalog sizes exercised.
const CATALOG_SIZES: &[u64] = &[100, 1_000, 10_000];

/// Concurrently open sessions the operations are spread over.
const SESSIONS: usize = 16;

/// One `recommend` per this many operations.
const RECOMMEND_EVERY: u64 = 10;

/// Simulated time between two operations.
const STEP: Duration = Duration::from_secs(5);

const TAGS: &[&str] = &[
    "basic", "casual", "classic", "cotton", "denim", "evening", "floral", "linen", "office", "silk", "summer",
    "utility", "winter", "wool",
];

// ---------------------------------------------------------------------------
// Single run
// ---------------------------------------------------------------------------

/// Random catalog of `size` items with ids `1..=size`.
fn synthetic_catalog(size: u64, rng: &mut StdRng) -> anyhow::Result<InMemoryCatalog> {
    let items = (1..=size)
        .map(|id| {
            let category = Category::ALL[rng.random_range(0..Category::ALL.len())];
            let tags: Vec<&str> = TAGS.choose_multiple(&mut *rng, 3).copied().collect();
            let price = (rng.random_range(10.0..300.0_f64) * 100.0).round() / 100.0;
            CatalogItem::new(id, "Synthetic", category, tags, price)
        })
        .collect();
    Ok(InMemoryCatalog::new(items)?)
}

fn random_event(rng: &mut StdRng, catalog_size: u64, at: Timestamp) -> RawEvent {
    let item_id = ItemId(rng.random_range(1..=catalog_size));
    match rng.random_range(0..10) {
        0..=4 => RawEvent::new(item_id, KIND_VIEW, at),
        5..=7 => RawEvent::new(item_id, KIND_VIEW_WITH_DURATION, at).with_duration(rng.random_range(0.0..90.0)),
        8 => RawEvent::new(item_id, KIND_ADD_TO_WISHLIST, at),
        _ => RawEvent::new(item_id, KIND_ADD_TO_CART, at),
    }
}

/// Run `OPERATIONS` operations over a catalog of `catalog_size`; return `(ops, elapsed)`.
///
/// # Errors
///
/// Returns an error if a config builder fails or the service rejects an operation.
fn run_bench(catalog_size: u64, seed: u64) -> anyhow::Result<(u64, Duration)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let catalog = synthetic_catalog(catalog_size, &mut rng)?;

    let config = RecommenderConfig::builder()
        .scoring(ScoringConfig::builder().price_lambda(0.5).build()?)
        .build();
    let trending = Arc::new(TrendingAggregator::new(TrendingConfig::builder().build()?, Timestamp::ZERO));
    let service = RecommendationService::new(config, catalog, trending);
    let sessions: Vec<SessionId> = (0..SESSIONS).map(|_| service.start_session()).collect();

    let start = Instant::now();
    let mut at = Timestamp::ZERO;
    for op in 0..OPERATIONS {
        let session = sessions[rng.random_range(0..sessions.len())];
        if op % RECOMMEND_EVERY == 0 {
            let recommendations = service.recommend(session, 10)?;
            std::hint::black_box(recommendations);
        } else {
            service.record_interaction(session, random_event(&mut rng, catalog_size, at))?;
        }
        at = Timestamp::from_duration(at.as_duration() + STEP);
    }
    let elapsed = start.elapsed();

    Ok((OPERATIONS, elapsed))
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    println!("bench: OPERATIONS={OPERATIONS}  ROUNDS={ROUNDS}  SESSIONS={SESSIONS}  (catalog build excluded)");
    println!(
        "{:>10} | {:>10} | {:>10} | {:>10} | {:>10}",
        "catalog", "ops", "min ops/s", "avg ops/s", "max ops/s"
    );
    println!("{:-<11}+{:-<12}+{:-<12}+{:-<12}+{:-<11}", "", "", "", "", "");

    for &catalog_size in CATALOG_SIZES {
        let mut ops_first = 0u64;
        let mut min_ops = f64::MAX;
        let mut max_ops = 0.0_f64;
        let mut sum_ops = 0.0_f64;

        for round in 0..ROUNDS {
            let (ops, elapsed) = run_bench(catalog_size, 42 + u64::from(round))?;
            let ops_per_sec = ops as f64 / elapsed.as_secs_f64();
            if round == 0 {
                ops_first = ops;
            }
            min_ops = min_ops.min(ops_per_sec);
            max_ops = max_ops.max(ops_per_sec);
            sum_ops += ops_per_sec;
        }

        let avg_ops = sum_ops / f64::from(ROUNDS);

        println!(
            "{:>10} | {:>10} | {:>10} | {:>10} | {:>10}",
            fmt_number(catalog_size),
            fmt_number(ops_first),
            fmt_number(min_ops as u64),
            fmt_number(avg_ops as u64),
            fmt_number(max_ops as u64),
        );
    }

    Ok(())
}

/// Format a `u64` with space-separated thousands groups (e.g. `1 234 567`).
fn fmt_number(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
