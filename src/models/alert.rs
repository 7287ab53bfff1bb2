//! Aggregated alert data model and expiry policy.

use crate::models::signal::TradingSignal;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Severity of an aggregated alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Info,
    Warning,
    Danger,
    Success,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Danger => "danger",
            AlertLevel::Success => "success",
        }
    }

    /// Wall-clock lifetime after which a consumer sweep must treat the
    /// alert as stale: one hour for info, four hours for everything else.
    pub fn lifetime(&self) -> Duration {
        match self {
            AlertLevel::Info => Duration::hours(1),
            _ => Duration::hours(4),
        }
    }
}

static ALERT_SEQ: AtomicU64 = AtomicU64::new(0);

fn next_alert_id() -> String {
    let n = ALERT_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("alert-{:06}", n)
}

/// The engine's externally visible output: one or more signals fused into
/// a human-facing alert with an overall confidence.
///
/// Holds an immutable snapshot of its constituent signals, not live
/// references. `expires_at` is stamped from the level's lifetime at
/// creation; the engine never deletes alerts on a timer itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedAlert {
    pub id: String,
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
    pub signals: Vec<TradingSignal>,
    pub overall_confidence: f64,
    pub recommended_action: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AggregatedAlert {
    pub fn new(
        level: AlertLevel,
        title: impl Into<String>,
        message: impl Into<String>,
        signals: Vec<TradingSignal>,
        overall_confidence: f64,
        recommended_action: impl Into<String>,
    ) -> Self {
        let timestamp = Utc::now();
        Self {
            id: next_alert_id(),
            level,
            title: title.into(),
            message: message.into(),
            signals,
            overall_confidence: overall_confidence.clamp(0.0, 1.0),
            recommended_action: recommended_action.into(),
            timestamp,
            expires_at: Some(timestamp + level.lifetime()),
        }
    }

    /// Whether the consumer sweep should drop this alert at `now`.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| now >= at).unwrap_or(false)
    }
}
