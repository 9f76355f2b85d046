// Rust guideline compliant 2026-10-16

//! Storefront demo entry point.
//!
//! Wires the recommendation service to the in-memory catalog, a scaled clock
//! and a shared trending aggregator, then lets simulated shoppers browse
//! concurrently. On completion (or CTRL+C) every session's profile is flushed
//! as a JSON snapshot and the session is ended.
//!
//! # Usage
//!
//! ```text
//! # Shopper summaries, recommendation strips and snapshots
//! RUST_LOG=info cargo run --bin shop_demo
//!
//! # Also show every recorded interaction and strip refresh
//! RUST_LOG=debug cargo run --bin shop_demo
//!
//! # Reproducible traffic
//! SHOP_DEMO_SEED=42 RUST_LOG=info cargo run --bin shop_demo
//! ```

mod adapters;

use std::sync::Arc;
use std::time::Duration;

use adapters::clock::ScaledClock;
use adapters::in_memory_catalog::InMemoryCatalog;
use adapters::simulator::{ShopperReport, Simulator, SimulatorConfig};
use anyhow::Context as _;
use domain::{Catalog as _, Category, ItemId};
use preference::PreferenceConfig;
use recommender::{FallbackOrder, RecommendationService, RecommenderConfig, SessionId};
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;
use trending::{TrendingAggregator, TrendingConfig};

type Service = RecommendationService<InMemoryCatalog>;

/// Concurrent shoppers; favourites cycle through every category.
const SHOPPERS: u64 = 8;

/// One real second is ten simulated minutes.
const CLOCK_SCALE: u32 = 600;

/// Size of the recommendation and trending strips.
const STRIP_SIZE: usize = 4;

/// Real period of the trending reset check.
const RESET_TICK: Duration = Duration::from_millis(200);

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let clock = ScaledClock::new(CLOCK_SCALE);

    // A short window so a default run shows at least one scheduled reset.
    let trending_config = TrendingConfig::builder()
        .half_life(Duration::from_secs(30 * 60))
        .reset_interval(Duration::from_secs(15 * 60))
        .build()
        .context("failed to build trending config")?;
    let trending = Arc::new(TrendingAggregator::new(trending_config, clock.now()));

    let preference_config = PreferenceConfig::builder()
        .half_life(Duration::from_secs(60 * 60))
        .build()
        .context("failed to build preference config")?;
    let recommender_config = RecommenderConfig::builder()
        .preference(preference_config)
        .fallback(FallbackOrder::Trending)
        .build();

    let catalog = InMemoryCatalog::demo().context("failed to load demo catalog")?;
    let service: Arc<Service> = Arc::new(RecommendationService::new(recommender_config, catalog, trending));

    let mut simulator_config = SimulatorConfig::builder(40)
        .max_dwell(Duration::from_millis(60))
        .pace(Duration::from_millis(25))
        .loyalty(0.7);
    if let Some(seed) = seed_from_env()? {
        simulator_config = simulator_config.seed(seed);
    }
    let simulator = Simulator::new(simulator_config.build().context("failed to build simulator config")?);

    // -- Shoppers: one session and one task each --
    let mut sessions: Vec<SessionId> = Vec::new();
    let mut shoppers = JoinSet::new();
    for (index, favorite) in (0..SHOPPERS).zip(Category::ALL.into_iter().cycle()) {
        let session = service.start_session();
        sessions.push(session);
        let shopper = simulator.shopper(index, favorite);
        let service = Arc::clone(&service);
        shoppers.spawn(async move { shopper.run(&service, session, &clock).await });
    }

    // -- Periodic trending window check, owned by the host --
    let ticker = {
        let trending = Arc::clone(service.trending_aggregator());
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(RESET_TICK);
            loop {
                interval.tick().await;
                if trending.reset_if_due(clock.now()) {
                    tracing::debug!(window_start = ?trending.window_start(), "main.trending.window");
                }
            }
        })
    };

    let visits = async {
        let mut reports = Vec::with_capacity(sessions.len());
        while let Some(joined) = shoppers.join_next().await {
            reports.push(joined.context("shopper task failed")?.context("shopper visit failed")?);
        }
        anyhow::Ok(reports)
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("main.shutdown: ctrl_c received, stopping shoppers");
        }
        result = visits => {
            for report in result? {
                log_report(&service, &report);
            }
        }
    }
    shoppers.shutdown().await;
    ticker.abort();

    log_trending(&service);
    flush_sessions(&service, &sessions)?;
    Ok(())
}

/// `SHOP_DEMO_SEED`, if set.
fn seed_from_env() -> anyhow::Result<Option<u64>> {
    match std::env::var("SHOP_DEMO_SEED") {
        Ok(raw) => raw.parse().map(Some).context("SHOP_DEMO_SEED must be a u64"),
        Err(_) => Ok(None),
    }
}

fn item_name(service: &Service, item_id: ItemId) -> &str {
    service.catalog().item(item_id).map_or("?", |item| item.name.as_str())
}

fn log_report(service: &Service, report: &ShopperReport) {
    let trending = service.trending_aggregator();
    tracing::info!(
        session = %report.session,
        favorite = %report.favorite,
        events = report.events_recorded,
        source = ?report.final_recommendations.source,
        "main.visit.report"
    );
    for entry in &report.final_recommendations.items {
        tracing::info!(
            session = %report.session,
            item_id = %entry.item_id,
            name = item_name(service, entry.item_id),
            match_pct = entry.match_percentage().round(),
            trending = trending.is_trending(entry.item_id, STRIP_SIZE),
            "main.visit.recommendation"
        );
    }
}

fn log_trending(service: &Service) {
    let trending = service.trending_aggregator();
    tracing::info!(tracked = trending.len(), "main.trending.summary");
    for (rank, item_id) in service.trending(STRIP_SIZE).into_iter().enumerate() {
        tracing::info!(
            rank = rank + 1,
            %item_id,
            name = item_name(service, item_id),
            score = trending.score_of(item_id).unwrap_or(0.0),
            "main.trending.item"
        );
    }
}

/// Serialize each open session's profile and end the session.
fn flush_sessions(service: &Service, sessions: &[SessionId]) -> anyhow::Result<()> {
    for &session in sessions {
        let profile = service.snapshot(session).context("failed to snapshot session")?;
        let json = serde_json::to_string(&profile).context("failed to serialize profile snapshot")?;
        tracing::info!(%session, snapshot = %json, "main.session.flushed");
        service.end_session(session).context("failed to end session")?;
    }
    tracing::info!(open = service.active_sessions(), "main.shutdown: sessions flushed");
    Ok(())
}
