//! Alertrix Worker
//!
//! Runs the signal fusion engine behind the evaluation scheduler and the
//! HTTP surface in one process. Engine events fan out to logging, metrics
//! and a broadcast channel for downstream consumers.

use alertrix::config;
use alertrix::core::http::start_server;
use alertrix::core::scheduler::EvaluationScheduler;
use alertrix::detectors::registry::default_registry;
use alertrix::logging;
use alertrix::metrics::{Metrics, MetricsSubscriber};
use alertrix::services::market_data::{MarketDataProvider, PlaceholderMarketDataProvider};
use alertrix::signals::aggregator::SignalAggregator;
use alertrix::signals::events::{BroadcastBridge, LogSubscriber};
use alertrix::signals::weights::SignalWeights;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let env = config::get_environment();
    let port = config::get_http_port();
    let eval_interval = config::get_eval_interval_seconds();
    let symbols = config::get_symbols();

    info!("Starting Alertrix Worker");
    info!(environment = %env, "Environment");

    if eval_interval == 0 {
        return Err("EVAL_INTERVAL_SECONDS must be > 0 for worker".into());
    }
    info!(
        interval = eval_interval,
        symbols = ?symbols,
        "Signal evaluation: every {} seconds for {}",
        eval_interval,
        symbols.join(", ")
    );

    let metrics = Arc::new(Metrics::new()?);

    // Build the engine with the full default detector set and wire the
    // outbound event streams.
    let mut aggregator = SignalAggregator::new(default_registry(), SignalWeights::default());
    aggregator.subscribe(Arc::new(LogSubscriber));
    aggregator.subscribe(Arc::new(MetricsSubscriber::new(metrics.clone())));
    // Holding the initial receiver keeps the channel open for downstream
    // consumers that attach via BroadcastBridge::subscribe; slow readers
    // drop the oldest events per the channel's ring semantics.
    let (bridge, _event_rx) = BroadcastBridge::new(config::get_event_channel_capacity());
    aggregator.subscribe(Arc::new(bridge));
    let engine = Arc::new(RwLock::new(aggregator));

    // Data sources are external collaborators; the placeholder returns
    // empty snapshots until a real provider is plugged in.
    let provider: Arc<dyn MarketDataProvider + Send + Sync> =
        Arc::new(PlaceholderMarketDataProvider);

    let scheduler = EvaluationScheduler::new(
        engine.clone(),
        provider,
        symbols,
        eval_interval,
        Some(metrics.clone()),
    )
    .map_err(|e| format!("failed to create scheduler: {}", e))?;
    scheduler.start().await;

    let mut server_handle = tokio::spawn({
        let engine = engine.clone();
        let metrics = metrics.clone();
        async move {
            if let Err(e) = start_server(port, engine, metrics).await {
                error!(error = %e, "HTTP server error");
            }
        }
    });

    info!("Worker started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down worker...");
            scheduler.stop().await;
            server_handle.abort();
            info!("Worker stopped");
        }
        _ = &mut server_handle => {
            error!("HTTP server stopped");
            scheduler.stop().await;
        }
    }

    Ok(())
}
