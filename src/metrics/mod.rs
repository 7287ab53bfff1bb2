//! Prometheus metrics for the engine and its HTTP surface.

use crate::models::alert::AggregatedAlert;
use crate::models::signal::TradingSignal;
use crate::signals::events::EventSubscriber;
use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

pub struct Metrics {
    registry: Registry,
    pub signals_detected_total: IntCounterVec,
    pub alerts_generated_total: IntCounterVec,
    pub evaluations_total: IntCounter,
    pub evaluation_duration_seconds: Histogram,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let signals_detected_total = IntCounterVec::new(
            Opts::new("signals_detected_total", "Signals detected, by type"),
            &["signal_type"],
        )?;
        let alerts_generated_total = IntCounterVec::new(
            Opts::new("alerts_generated_total", "Alerts generated, by level"),
            &["level"],
        )?;
        let evaluations_total = IntCounter::new(
            "evaluations_total",
            "Completed detection and aggregation passes",
        )?;
        let evaluation_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "evaluation_duration_seconds",
            "Duration of one detection and aggregation pass",
        ))?;
        let http_requests_total =
            IntCounter::new("http_requests_total", "HTTP requests received")?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests in flight")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration",
        ))?;

        registry.register(Box::new(signals_detected_total.clone()))?;
        registry.register(Box::new(alerts_generated_total.clone()))?;
        registry.register(Box::new(evaluations_total.clone()))?;
        registry.register(Box::new(evaluation_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            signals_detected_total,
            alerts_generated_total,
            evaluations_total,
            evaluation_duration_seconds,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
        })
    }

    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        encoder.encode_to_string(&self.registry.gather())
    }
}

/// Feeds engine events into the counters.
pub struct MetricsSubscriber {
    metrics: Arc<Metrics>,
}

impl MetricsSubscriber {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }
}

impl EventSubscriber for MetricsSubscriber {
    fn on_signal(&self, signal: &TradingSignal) {
        self.metrics
            .signals_detected_total
            .with_label_values(&[signal.signal_type.as_str()])
            .inc();
    }

    fn on_alert(&self, alert: &AggregatedAlert) {
        self.metrics
            .alerts_generated_total
            .with_label_values(&[alert.level.as_str()])
            .inc();
    }
}
