//! Sentiment detection rules: fear/greed extremes, news sentiment and
//! money-flow pressure.

use crate::detectors::error::DetectorError;
use crate::detectors::framework::{param, DetectionParams, DetectionRule};
use crate::models::market::MarketSnapshot;
use crate::models::signal::{
    ConditionTag, SignalDirection, SignalStrength, SignalType, TradingSignal,
};

pub struct SentimentRule;

impl DetectionRule for SentimentRule {
    fn signal_type(&self) -> SignalType {
        SignalType::Sentiment
    }

    fn default_params(&self) -> DetectionParams {
        DetectionParams::from([
            ("fear_greed_high".to_string(), 85.0),
            ("fear_greed_low".to_string(), 15.0),
            ("news_bullish".to_string(), 80.0),
            ("news_bearish".to_string(), 20.0),
            ("money_flow_threshold".to_string(), 0.8),
        ])
    }

    fn evaluate(
        &self,
        snapshot: &MarketSnapshot,
        params: &DetectionParams,
    ) -> Result<Vec<TradingSignal>, DetectorError> {
        let Some(sentiment) = &snapshot.sentiment else {
            return Ok(Vec::new());
        };
        let mut signals = Vec::new();

        if let Some(index) = sentiment.fear_greed_index {
            if !index.is_finite() {
                return Err(DetectorError::NonFinite {
                    field: "fear_greed_index",
                    value: index,
                });
            }
            let high = param(params, "fear_greed_high", 85.0);
            let low = param(params, "fear_greed_low", 15.0);
            if index >= high {
                signals.push(
                    TradingSignal::new(
                        SignalType::Sentiment,
                        SignalDirection::Sell,
                        SignalStrength::VeryStrong,
                        0.9,
                        format!("extreme greed ({:.0}/100)", index),
                    )
                    .with_tag(ConditionTag::ExtremeGreed)
                    .with_detail("fear_greed_index", index),
                );
            } else if index <= low {
                signals.push(
                    TradingSignal::new(
                        SignalType::Sentiment,
                        SignalDirection::Buy,
                        SignalStrength::VeryStrong,
                        0.9,
                        format!("extreme fear ({:.0}/100)", index),
                    )
                    .with_tag(ConditionTag::ExtremeFear)
                    .with_detail("fear_greed_index", index),
                );
            }
        }

        if let Some(news) = sentiment.news_sentiment {
            if !news.is_finite() {
                return Err(DetectorError::NonFinite {
                    field: "news_sentiment",
                    value: news,
                });
            }
            // News sentiment arrives in [0, 1]; thresholds read on the
            // 0..100 scale.
            let scaled = news * 100.0;
            let bullish = param(params, "news_bullish", 80.0);
            let bearish = param(params, "news_bearish", 20.0);
            if scaled >= bullish {
                signals.push(
                    TradingSignal::new(
                        SignalType::News,
                        SignalDirection::Buy,
                        SignalStrength::Moderate,
                        0.6,
                        format!("positive news sentiment ({:.0}/100)", scaled),
                    )
                    .with_tag(ConditionTag::BullishNews)
                    .with_detail("news_sentiment", scaled),
                );
            } else if scaled <= bearish {
                signals.push(
                    TradingSignal::new(
                        SignalType::News,
                        SignalDirection::Sell,
                        SignalStrength::Moderate,
                        0.6,
                        format!("negative news sentiment ({:.0}/100)", scaled),
                    )
                    .with_tag(ConditionTag::BearishNews)
                    .with_detail("news_sentiment", scaled),
                );
            }
        }

        if let Some(flow) = sentiment.money_flow {
            if !flow.is_finite() {
                return Err(DetectorError::NonFinite {
                    field: "money_flow",
                    value: flow,
                });
            }
            let threshold = param(params, "money_flow_threshold", 0.8);
            if flow >= threshold {
                signals.push(
                    TradingSignal::new(
                        SignalType::MoneyFlow,
                        SignalDirection::Buy,
                        SignalStrength::Strong,
                        0.75,
                        format!("strong capital inflow ({:+.2})", flow),
                    )
                    .with_tag(ConditionTag::InflowSurge)
                    .with_detail("money_flow", flow),
                );
            } else if flow <= -threshold {
                signals.push(
                    TradingSignal::new(
                        SignalType::MoneyFlow,
                        SignalDirection::Sell,
                        SignalStrength::Strong,
                        0.75,
                        format!("strong capital outflow ({:+.2})", flow),
                    )
                    .with_tag(ConditionTag::OutflowSurge)
                    .with_detail("money_flow", flow),
                );
            }
        }

        Ok(signals)
    }
}
