//! Shared data models spanning the engine layers.

pub mod alert;
pub mod market;
pub mod signal;

pub use alert::{AggregatedAlert, AlertLevel};
pub use market::{
    BollingerIndicator, Candle, FundamentalIndicators, KdjIndicator, MacdIndicator,
    MarketSnapshot, MovingAverages, SentimentIndicators, TechnicalIndicators,
};
pub use signal::{ConditionTag, SignalDirection, SignalStrength, SignalType, TradingSignal};
