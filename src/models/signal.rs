//! Trading signal data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source family a signal originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    Technical,
    Sentiment,
    Fundamental,
    MoneyFlow,
    News,
    Volume,
}

impl SignalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::Technical => "technical",
            SignalType::Sentiment => "sentiment",
            SignalType::Fundamental => "fundamental",
            SignalType::MoneyFlow => "money_flow",
            SignalType::News => "news",
            SignalType::Volume => "volume",
        }
    }
}

/// Trade direction of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalDirection {
    Buy,
    Sell,
    Hold,
}

impl SignalDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalDirection::Buy => "buy",
            SignalDirection::Sell => "sell",
            SignalDirection::Hold => "hold",
        }
    }
}

/// Signal strength on a 1..5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStrength {
    VeryWeak = 1,
    Weak = 2,
    Moderate = 3,
    Strong = 4,
    VeryStrong = 5,
}

impl SignalStrength {
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Contribution factor used by the weighted-confidence formula.
    pub fn factor(&self) -> f64 {
        self.value() as f64 / 5.0
    }
}

/// Language-neutral classification of the market condition behind a signal.
///
/// Combination rules match on these tags, never on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionTag {
    Overbought,
    Oversold,
    GoldenCross,
    DeathCross,
    Breakout,
    Breakdown,
    ExtremeGreed,
    ExtremeFear,
    BullishNews,
    BearishNews,
    InflowSurge,
    OutflowSurge,
    Overvalued,
    Undervalued,
    StrongProfitability,
    EarningsAcceleration,
    EarningsDecline,
    VolumeSurge,
    BullishDivergence,
    BearishDivergence,
}

static SIGNAL_SEQ: AtomicU64 = AtomicU64::new(0);

fn next_signal_id(signal_type: SignalType) -> String {
    let n = SIGNAL_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("sig-{}-{:06}", signal_type.as_str(), n)
}

/// One detector's atomic observation.
///
/// Immutable once created; confidence is clamped to [0, 1] on construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSignal {
    pub id: String,
    pub signal_type: SignalType,
    pub direction: SignalDirection,
    pub strength: SignalStrength,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<ConditionTag>,
    pub message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub details: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Value::is_null", default)]
    pub source_data: Value,
    pub timestamp: DateTime<Utc>,
}

impl TradingSignal {
    pub fn new(
        signal_type: SignalType,
        direction: SignalDirection,
        strength: SignalStrength,
        confidence: f64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: next_signal_id(signal_type),
            signal_type,
            direction,
            strength,
            confidence: confidence.clamp(0.0, 1.0),
            tags: Vec::new(),
            message: message.into(),
            details: BTreeMap::new(),
            source_data: Value::Null,
            timestamp: Utc::now(),
        }
    }

    pub fn with_tag(mut self, tag: ConditionTag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: f64) -> Self {
        self.details.insert(key.into(), value);
        self
    }

    pub fn with_source_data(mut self, source_data: Value) -> Self {
        self.source_data = source_data;
        self
    }

    pub fn has_tag(&self, tag: ConditionTag) -> bool {
        self.tags.contains(&tag)
    }
}
