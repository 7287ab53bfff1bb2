//! Volume detection rules: surges against the trailing average and
//! price/volume divergence.

use crate::detectors::error::DetectorError;
use crate::detectors::framework::{param, DetectionParams, DetectionRule};
use crate::models::market::MarketSnapshot;
use crate::models::signal::{
    ConditionTag, SignalDirection, SignalStrength, SignalType, TradingSignal,
};
use serde_json::json;

pub struct VolumeRule;

impl VolumeRule {
    /// Current-bar volume against the average of the bars before it
    /// (up to `surge_window` of them). Direction follows the concurrent
    /// one-bar price change.
    fn surge_signal(
        &self,
        snapshot: &MarketSnapshot,
        params: &DetectionParams,
    ) -> Result<Option<TradingSignal>, DetectorError> {
        let window = param(params, "surge_window", 20.0) as usize;
        if snapshot.candles.len() < window {
            return Ok(None);
        }
        let Some((last, prior)) = snapshot.candles.split_last() else {
            return Ok(None);
        };

        let tail = &prior[prior.len().saturating_sub(window)..];
        let avg = tail.iter().map(|c| c.volume).sum::<f64>() / tail.len() as f64;
        if !avg.is_finite() || !last.volume.is_finite() {
            return Err(DetectorError::MalformedSeries(
                "non-finite volume in surge window".to_string(),
            ));
        }
        if avg <= 0.0 {
            return Ok(None);
        }

        let ratio = last.volume / avg;
        let surge_ratio = param(params, "surge_ratio", 2.0);
        let strong_ratio = param(params, "strong_surge_ratio", 3.0);
        if ratio < surge_ratio {
            return Ok(None);
        }

        let prev_close = tail.last().map(|c| c.close).unwrap_or(last.close);
        let change = last.close - prev_close;
        let direction = if change > 0.0 {
            SignalDirection::Buy
        } else if change < 0.0 {
            SignalDirection::Sell
        } else {
            SignalDirection::Hold
        };
        let strength = if ratio >= strong_ratio {
            SignalStrength::Strong
        } else {
            SignalStrength::Moderate
        };
        let confidence = (0.5 + (ratio - surge_ratio) * 0.1).min(0.9);

        Ok(Some(
            TradingSignal::new(
                SignalType::Volume,
                direction,
                strength,
                confidence,
                format!("volume surge: {:.1}x the {}-bar average", ratio, window),
            )
            .with_tag(ConditionTag::VolumeSurge)
            .with_detail("volume_ratio", ratio)
            .with_detail("price_change", change)
            .with_source_data(json!({
                "volume": last.volume,
                "average_volume": avg,
                "window": window,
            })),
        ))
    }

    /// Price and volume trending in opposite directions over the trailing
    /// window, read as a contrarian reversal warning.
    fn divergence_signal(
        &self,
        snapshot: &MarketSnapshot,
        params: &DetectionParams,
    ) -> Result<Option<TradingSignal>, DetectorError> {
        let window = param(params, "divergence_window", 10.0) as usize;
        if window < 2 || snapshot.candles.len() < window {
            return Ok(None);
        }

        let tail = &snapshot.candles[snapshot.candles.len() - window..];
        let (first, last) = (&tail[0], &tail[window - 1]);
        if first.close <= 0.0 || first.volume <= 0.0 {
            return Ok(None);
        }

        let price_trend = (last.close - first.close) / first.close;
        let volume_trend = (last.volume - first.volume) / first.volume;
        if !price_trend.is_finite() || !volume_trend.is_finite() {
            return Err(DetectorError::MalformedSeries(
                "non-finite trend in divergence window".to_string(),
            ));
        }

        let threshold = param(params, "divergence_threshold", 0.1);
        let signal = if price_trend > 0.0 && volume_trend < -threshold {
            Some(
                TradingSignal::new(
                    SignalType::Volume,
                    SignalDirection::Sell,
                    SignalStrength::Moderate,
                    0.6,
                    format!("price rising on fading volume over {} bars", window),
                )
                .with_tag(ConditionTag::BearishDivergence)
                .with_detail("price_trend", price_trend)
                .with_detail("volume_trend", volume_trend),
            )
        } else if price_trend < 0.0 && volume_trend > threshold {
            Some(
                TradingSignal::new(
                    SignalType::Volume,
                    SignalDirection::Buy,
                    SignalStrength::Moderate,
                    0.6,
                    format!("price falling on rising volume over {} bars", window),
                )
                .with_tag(ConditionTag::BullishDivergence)
                .with_detail("price_trend", price_trend)
                .with_detail("volume_trend", volume_trend),
            )
        } else {
            None
        };
        Ok(signal)
    }
}

impl DetectionRule for VolumeRule {
    fn signal_type(&self) -> SignalType {
        SignalType::Volume
    }

    fn default_params(&self) -> DetectionParams {
        DetectionParams::from([
            ("surge_window".to_string(), 20.0),
            ("surge_ratio".to_string(), 2.0),
            ("strong_surge_ratio".to_string(), 3.0),
            ("divergence_window".to_string(), 10.0),
            ("divergence_threshold".to_string(), 0.1),
        ])
    }

    fn evaluate(
        &self,
        snapshot: &MarketSnapshot,
        params: &DetectionParams,
    ) -> Result<Vec<TradingSignal>, DetectorError> {
        let mut signals = Vec::new();
        signals.extend(self.surge_signal(snapshot, params)?);
        signals.extend(self.divergence_signal(snapshot, params)?);
        Ok(signals)
    }
}
