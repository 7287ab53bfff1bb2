//! Multi-source signal fusion and alerting engine.
//!
//! Independently computed technical, sentiment, fundamental and volume
//! indicators flow through pluggable detectors; the aggregator weights,
//! groups and combines the resulting signals into deduplicated,
//! human-readable alerts with confidence scores.

pub mod config;
pub mod core;
pub mod detectors;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
