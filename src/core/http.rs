//! HTTP endpoint server using Axum.

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::metrics::Metrics;
use crate::signals::aggregator::SignalAggregator;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<SignalAggregator>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Json(json!({
        "status": "healthy",
        "uptime_seconds": uptime_seconds,
        "service": "alertrix-fusion-engine"
    }))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics.
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(start.elapsed().as_secs_f64());

    response
}

#[derive(Debug, Deserialize)]
struct AlertQuery {
    /// When true, apply the staleness contract and return only live
    /// alerts.
    #[serde(default)]
    active: bool,
    limit: Option<usize>,
}

async fn list_alerts(
    State(state): State<AppState>,
    Query(params): Query<AlertQuery>,
) -> Json<Value> {
    let limit = params.limit.unwrap_or(50);
    let engine = state.engine.read().await;
    let alerts = if params.active {
        engine.active_alerts(chrono::Utc::now(), limit)
    } else {
        engine.recent_alerts(limit)
    };
    Json(json!(alerts))
}

async fn signal_statistics(State(state): State<AppState>) -> Json<Value> {
    let engine = state.engine.read().await;
    Json(json!(engine.signal_statistics()))
}

async fn list_detectors(State(state): State<AppState>) -> Json<Value> {
    let engine = state.engine.read().await;
    Json(json!(engine.registry().registry_info()))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/alerts", get(list_alerts))
        .route("/api/signals/statistics", get(signal_statistics))
        .route("/api/detectors", get(list_detectors))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    port: u16,
    engine: Arc<RwLock<SignalAggregator>>,
    metrics: Arc<Metrics>,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState {
        engine,
        metrics,
        start_time: Arc::new(Instant::now()),
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
