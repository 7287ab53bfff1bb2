//! Alertrix API Server
//!
//! HTTP API with health check, metrics and alert/statistics endpoints.
//! Serves a standalone engine instance; run the worker binary to drive
//! periodic evaluation in the same process as the engine.

use alertrix::core::http::start_server;
use alertrix::detectors::registry::default_registry;
use alertrix::logging;
use alertrix::metrics::Metrics;
use alertrix::signals::aggregator::SignalAggregator;
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

    let port = alertrix::config::get_http_port();
    let env = alertrix::config::get_environment();
    info!("Starting Alertrix API Server");
    info!(environment = %env, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let metrics = Arc::new(Metrics::new()?);
    let engine = Arc::new(RwLock::new(SignalAggregator::new(
        default_registry(),
        SignalWeights::default(),
    )));

    let server_handle = tokio::spawn({
        let engine = engine.clone();
        let metrics = metrics.clone();
        async move {
            if let Err(e) = start_server(port, engine, metrics).await {
                error!(error = %e, "HTTP server error");
            }
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
