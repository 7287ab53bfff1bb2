//! Technical indicator detection rules: RSI extremes, MACD crosses, moving
//! average alignment, KDJ extremes and price-channel breakouts.

use crate::detectors::error::DetectorError;
use crate::detectors::framework::{param, DetectionParams, DetectionRule};
use crate::models::market::MarketSnapshot;
use crate::models::signal::{
    ConditionTag, SignalDirection, SignalStrength, SignalType, TradingSignal,
};
use serde_json::json;

pub struct TechnicalRule;

impl TechnicalRule {
    fn rsi_signal(
        &self,
        rsi: f64,
        params: &DetectionParams,
    ) -> Result<Option<TradingSignal>, DetectorError> {
        if !rsi.is_finite() {
            return Err(DetectorError::NonFinite {
                field: "rsi",
                value: rsi,
            });
        }

        let overbought = param(params, "rsi_overbought", 80.0);
        let oversold = param(params, "rsi_oversold", 20.0);
        let extreme_margin = param(params, "rsi_extreme_margin", 5.0);

        let signal = if rsi >= overbought {
            let strength = if rsi >= overbought + extreme_margin {
                SignalStrength::Strong
            } else {
                SignalStrength::Moderate
            };
            let confidence = ((rsi - 70.0) / 30.0).min(0.95);
            Some(
                TradingSignal::new(
                    SignalType::Technical,
                    SignalDirection::Sell,
                    strength,
                    confidence,
                    format!("RSI overbought: {:.1}", rsi),
                )
                .with_tag(ConditionTag::Overbought)
                .with_detail("rsi", rsi),
            )
        } else if rsi <= oversold {
            let strength = if rsi <= oversold - extreme_margin {
                SignalStrength::Strong
            } else {
                SignalStrength::Moderate
            };
            let confidence = ((30.0 - rsi) / 30.0).min(0.95);
            Some(
                TradingSignal::new(
                    SignalType::Technical,
                    SignalDirection::Buy,
                    strength,
                    confidence,
                    format!("RSI oversold: {:.1}", rsi),
                )
                .with_tag(ConditionTag::Oversold)
                .with_detail("rsi", rsi),
            )
        } else {
            None
        };
        Ok(signal)
    }

    fn macd_signal(
        &self,
        macd: &crate::models::market::MacdIndicator,
        params: &DetectionParams,
    ) -> Result<Option<TradingSignal>, DetectorError> {
        let gap = macd.macd - macd.signal;
        if !gap.is_finite() {
            return Err(DetectorError::NonFinite {
                field: "macd",
                value: gap,
            });
        }

        let cross_gap = param(params, "macd_cross_gap", 0.01);
        let signal = if gap > cross_gap {
            Some(
                TradingSignal::new(
                    SignalType::Technical,
                    SignalDirection::Buy,
                    SignalStrength::Moderate,
                    0.7,
                    format!("MACD golden cross: MACD={:.4}, signal={:.4}", macd.macd, macd.signal),
                )
                .with_tag(ConditionTag::GoldenCross)
                .with_detail("macd_gap", gap)
                .with_source_data(json!({
                    "macd": macd.macd,
                    "signal": macd.signal,
                    "histogram": macd.histogram,
                })),
            )
        } else if gap < -cross_gap {
            Some(
                TradingSignal::new(
                    SignalType::Technical,
                    SignalDirection::Sell,
                    SignalStrength::Moderate,
                    0.7,
                    format!("MACD death cross: MACD={:.4}, signal={:.4}", macd.macd, macd.signal),
                )
                .with_tag(ConditionTag::DeathCross)
                .with_detail("macd_gap", gap)
                .with_source_data(json!({
                    "macd": macd.macd,
                    "signal": macd.signal,
                    "histogram": macd.histogram,
                })),
            )
        } else {
            None
        };
        Ok(signal)
    }

    fn ma_signal(
        &self,
        price: f64,
        ma: &crate::models::market::MovingAverages,
    ) -> Option<TradingSignal> {
        let (ma5, ma20) = (ma.ma5?, ma.ma20?);
        if price > ma5 && ma5 > ma20 {
            Some(
                TradingSignal::new(
                    SignalType::Technical,
                    SignalDirection::Buy,
                    SignalStrength::Moderate,
                    0.65,
                    format!("bullish MA breakthrough: price {:.2} > MA5 {:.2} > MA20 {:.2}", price, ma5, ma20),
                )
                .with_tag(ConditionTag::Breakout)
                .with_detail("price", price)
                .with_detail("ma5", ma5)
                .with_detail("ma20", ma20),
            )
        } else if price < ma5 && ma5 < ma20 {
            Some(
                TradingSignal::new(
                    SignalType::Technical,
                    SignalDirection::Sell,
                    SignalStrength::Moderate,
                    0.65,
                    format!("bearish MA breakdown: price {:.2} < MA5 {:.2} < MA20 {:.2}", price, ma5, ma20),
                )
                .with_tag(ConditionTag::Breakdown)
                .with_detail("price", price)
                .with_detail("ma5", ma5)
                .with_detail("ma20", ma20),
            )
        } else {
            None
        }
    }

    fn kdj_signal(
        &self,
        kdj: &crate::models::market::KdjIndicator,
        params: &DetectionParams,
    ) -> Option<TradingSignal> {
        let k_overbought = param(params, "kdj_k_overbought", 90.0);
        let d_overbought = param(params, "kdj_d_overbought", 80.0);
        let k_oversold = param(params, "kdj_k_oversold", 10.0);
        let d_oversold = param(params, "kdj_d_oversold", 20.0);

        if kdj.k >= k_overbought && kdj.d >= d_overbought {
            Some(
                TradingSignal::new(
                    SignalType::Technical,
                    SignalDirection::Sell,
                    SignalStrength::Moderate,
                    0.65,
                    format!("KDJ overbought: K={:.1}, D={:.1}", kdj.k, kdj.d),
                )
                .with_tag(ConditionTag::Overbought)
                .with_detail("k", kdj.k)
                .with_detail("d", kdj.d),
            )
        } else if kdj.k <= k_oversold && kdj.d <= d_oversold {
            Some(
                TradingSignal::new(
                    SignalType::Technical,
                    SignalDirection::Buy,
                    SignalStrength::Moderate,
                    0.65,
                    format!("KDJ oversold: K={:.1}, D={:.1}", kdj.k, kdj.d),
                )
                .with_tag(ConditionTag::Oversold)
                .with_detail("k", kdj.k)
                .with_detail("d", kdj.d),
            )
        } else {
            None
        }
    }

    /// Breakout of the price channel formed by the trailing window of bars
    /// preceding the current close.
    fn channel_signal(
        &self,
        snapshot: &MarketSnapshot,
        params: &DetectionParams,
    ) -> Result<Option<TradingSignal>, DetectorError> {
        let window = param(params, "channel_window", 20.0) as usize;
        if snapshot.candles.len() <= window {
            return Ok(None);
        }

        let Some((last, prior)) = snapshot.candles.split_last() else {
            return Ok(None);
        };
        if !last.close.is_finite() {
            return Err(DetectorError::NonFinite {
                field: "close",
                value: last.close,
            });
        }

        let tail = &prior[prior.len() - window..];
        let rolling_high = tail.iter().map(|c| c.high).fold(f64::MIN, f64::max);
        let rolling_low = tail.iter().map(|c| c.low).fold(f64::MAX, f64::min);
        if !rolling_high.is_finite() || !rolling_low.is_finite() {
            return Err(DetectorError::MalformedSeries(
                "non-finite high/low in channel window".to_string(),
            ));
        }

        let breakout_ratio = param(params, "channel_breakout_ratio", 1.02);
        let breakdown_ratio = param(params, "channel_breakdown_ratio", 0.98);

        let signal = if last.close >= breakout_ratio * rolling_high {
            Some(
                TradingSignal::new(
                    SignalType::Technical,
                    SignalDirection::Buy,
                    SignalStrength::Strong,
                    0.8,
                    format!("price channel breakout: close {:.2} above {}-bar high {:.2}", last.close, window, rolling_high),
                )
                .with_tag(ConditionTag::Breakout)
                .with_detail("close", last.close)
                .with_detail("rolling_high", rolling_high)
                .with_source_data(json!({
                    "window": window,
                    "rolling_high": rolling_high,
                    "rolling_low": rolling_low,
                })),
            )
        } else if last.close <= breakdown_ratio * rolling_low {
            Some(
                TradingSignal::new(
                    SignalType::Technical,
                    SignalDirection::Sell,
                    SignalStrength::Strong,
                    0.8,
                    format!("price channel breakdown: close {:.2} below {}-bar low {:.2}", last.close, window, rolling_low),
                )
                .with_tag(ConditionTag::Breakdown)
                .with_detail("close", last.close)
                .with_detail("rolling_low", rolling_low)
                .with_source_data(json!({
                    "window": window,
                    "rolling_high": rolling_high,
                    "rolling_low": rolling_low,
                })),
            )
        } else {
            None
        };
        Ok(signal)
    }
}

impl DetectionRule for TechnicalRule {
    fn signal_type(&self) -> SignalType {
        SignalType::Technical
    }

    fn default_params(&self) -> DetectionParams {
        DetectionParams::from([
            ("rsi_overbought".to_string(), 80.0),
            ("rsi_oversold".to_string(), 20.0),
            ("rsi_extreme_margin".to_string(), 5.0),
            ("macd_cross_gap".to_string(), 0.01),
            ("channel_window".to_string(), 20.0),
            ("channel_breakout_ratio".to_string(), 1.02),
            ("channel_breakdown_ratio".to_string(), 0.98),
            ("kdj_k_overbought".to_string(), 90.0),
            ("kdj_d_overbought".to_string(), 80.0),
            ("kdj_k_oversold".to_string(), 10.0),
            ("kdj_d_oversold".to_string(), 20.0),
        ])
    }

    fn evaluate(
        &self,
        snapshot: &MarketSnapshot,
        params: &DetectionParams,
    ) -> Result<Vec<TradingSignal>, DetectorError> {
        let mut signals = Vec::new();

        if let Some(tech) = &snapshot.technical {
            if let Some(rsi) = tech.rsi {
                signals.extend(self.rsi_signal(rsi, params)?);
            }
            if let Some(macd) = &tech.macd {
                signals.extend(self.macd_signal(macd, params)?);
            }
            if let (Some(price), Some(ma)) = (snapshot.last_close(), tech.ma.as_ref()) {
                signals.extend(self.ma_signal(price, ma));
            }
            if let Some(kdj) = &tech.kdj {
                signals.extend(self.kdj_signal(kdj, params));
            }
        }

        signals.extend(self.channel_signal(snapshot, params)?);

        Ok(signals)
    }
}
