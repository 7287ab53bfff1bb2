//! Cron-based scheduler driving periodic detection passes.

use crate::metrics::Metrics;
use crate::services::market_data::MarketDataProvider;
use crate::signals::aggregator::SignalAggregator;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// Periodically pulls a snapshot per symbol from the data provider and
/// runs it through the engine. The engine itself stays synchronous; all
/// scheduling lives here.
pub struct EvaluationScheduler {
    engine: Arc<RwLock<SignalAggregator>>,
    provider: Arc<dyn MarketDataProvider + Send + Sync>,
    symbols: Vec<String>,
    schedule: Schedule,
    metrics: Option<Arc<Metrics>>,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl EvaluationScheduler {
    pub fn new(
        engine: Arc<RwLock<SignalAggregator>>,
        provider: Arc<dyn MarketDataProvider + Send + Sync>,
        symbols: Vec<String>,
        interval_seconds: u64,
        metrics: Option<Arc<Metrics>>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        if interval_seconds == 0 {
            return Err("scheduler disabled: interval_seconds is 0".into());
        }

        // Cron format: second minute hour day month weekday
        let cron_expr = if interval_seconds >= 60 {
            format!("0 */{} * * * *", interval_seconds / 60)
        } else {
            format!("*/{} * * * * *", interval_seconds)
        };
        let schedule = Schedule::from_str(&cron_expr).map_err(|e| {
            format!("invalid cron expression '{}': {}", cron_expr, e)
        })?;

        info!(
            interval = interval_seconds,
            cron = %cron_expr,
            symbols = ?symbols,
            "EvaluationScheduler: created with interval {}s",
            interval_seconds
        );

        Ok(Self {
            engine,
            provider,
            symbols,
            schedule,
            metrics,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    pub async fn start(&self) {
        let engine = self.engine.clone();
        let provider = self.provider.clone();
        let symbols = self.symbols.clone();
        let schedule = self.schedule.clone();
        let metrics = self.metrics.clone();

        let handle = tokio::spawn(async move {
            info!("EvaluationScheduler: started, waiting for cron schedule");
            loop {
                let Some(next_tick) = schedule.upcoming(chrono::Utc).next() else {
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                };
                let now = chrono::Utc::now();
                if next_tick > now {
                    let wait = (next_tick - now).to_std().unwrap_or_default();
                    tokio::time::sleep(wait).await;
                }

                for symbol in &symbols {
                    let snapshot = match provider.latest_snapshot(symbol).await {
                        Ok(snapshot) => snapshot,
                        Err(e) => {
                            error!(
                                symbol = %symbol,
                                error = %e,
                                "EvaluationScheduler: failed to fetch snapshot for {}",
                                symbol
                            );
                            continue;
                        }
                    };

                    let start = Instant::now();
                    let alerts = engine.write().await.process_data(&snapshot);
                    if let Some(ref metrics) = metrics {
                        metrics.evaluations_total.inc();
                        metrics
                            .evaluation_duration_seconds
                            .observe(start.elapsed().as_secs_f64());
                    }
                    debug!(
                        symbol = %symbol,
                        alerts = alerts.len(),
                        "EvaluationScheduler: pass for {} generated {} alerts",
                        symbol,
                        alerts.len()
                    );
                }

                // The consumer-side sweep: expired alerts leave history
                // here, per the fixed expiry policy.
                let pruned = engine.write().await.prune_stale_alerts(chrono::Utc::now());
                if pruned > 0 {
                    debug!(pruned = pruned, "EvaluationScheduler: pruned {} stale alerts", pruned);
                }
            }
        });

        let mut h = self.handle.write().await;
        *h = Some(handle);
        info!("EvaluationScheduler: started successfully");
    }

    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("EvaluationScheduler: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle.read().await.is_some()
    }
}
