//! Inbound market data contract: candles plus externally computed
//! indicator bundles. All indicator keys are optional; the engine treats
//! a missing key as "no signal from this source", not an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }
}

/// MACD lines as computed by the upstream indicator pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacdIndicator {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Precomputed moving averages keyed by period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovingAverages {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma5: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma10: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma20: Option<f64>,
}

/// KDJ stochastic oscillator lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdjIndicator {
    pub k: f64,
    pub d: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub j: Option<f64>,
}

/// Bollinger band envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BollingerIndicator {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Technical indicator bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdIndicator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma: Option<MovingAverages>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kdj: Option<KdjIndicator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger: Option<BollingerIndicator>,
}

impl TechnicalIndicators {
    pub fn with_rsi(mut self, rsi: f64) -> Self {
        self.rsi = Some(rsi);
        self
    }

    pub fn with_macd(mut self, macd: MacdIndicator) -> Self {
        self.macd = Some(macd);
        self
    }

    pub fn with_ma(mut self, ma: MovingAverages) -> Self {
        self.ma = Some(ma);
        self
    }

    pub fn with_kdj(mut self, kdj: KdjIndicator) -> Self {
        self.kdj = Some(kdj);
        self
    }
}

/// Sentiment indicator bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentimentIndicators {
    /// Composite fear/greed score in [0, 100].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fear_greed_index: Option<f64>,
    /// News sentiment in [0, 1].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news_sentiment: Option<f64>,
    /// Net buying vs. selling pressure in [-1, 1].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub money_flow: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vix_index: Option<f64>,
}

impl SentimentIndicators {
    pub fn with_fear_greed(mut self, index: f64) -> Self {
        self.fear_greed_index = Some(index);
        self
    }

    pub fn with_news_sentiment(mut self, sentiment: f64) -> Self {
        self.news_sentiment = Some(sentiment);
        self
    }

    pub fn with_money_flow(mut self, flow: f64) -> Self {
        self.money_flow = Some(flow);
        self
    }
}

/// Fundamental valuation/profitability bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundamentalIndicators {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pb_ratio: Option<f64>,
    /// Return on equity as a percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roe: Option<f64>,
    /// Year-over-year earnings growth as a percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earnings_growth: Option<f64>,
}

/// The full data bundle one detection pass runs over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub candles: Vec<Candle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical: Option<TechnicalIndicators>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentIndicators>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fundamental: Option<FundamentalIndicators>,
}

impl MarketSnapshot {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    pub fn with_candles(mut self, candles: Vec<Candle>) -> Self {
        self.candles = candles;
        self
    }

    pub fn with_technical(mut self, technical: TechnicalIndicators) -> Self {
        self.technical = Some(technical);
        self
    }

    pub fn with_sentiment(mut self, sentiment: SentimentIndicators) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn with_fundamental(mut self, fundamental: FundamentalIndicators) -> Self {
        self.fundamental = Some(fundamental);
        self
    }

    pub fn last_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }
}
