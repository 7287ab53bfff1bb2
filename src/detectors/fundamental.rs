//! Fundamental detection rules: valuation ratios, profitability and
//! earnings growth.

use crate::detectors::error::DetectorError;
use crate::detectors::framework::{param, DetectionParams, DetectionRule};
use crate::models::market::MarketSnapshot;
use crate::models::signal::{
    ConditionTag, SignalDirection, SignalStrength, SignalType, TradingSignal,
};

pub struct FundamentalRule;

impl DetectionRule for FundamentalRule {
    fn signal_type(&self) -> SignalType {
        SignalType::Fundamental
    }

    fn default_params(&self) -> DetectionParams {
        DetectionParams::from([
            ("pe_high".to_string(), 30.0),
            ("pe_low".to_string(), 15.0),
            ("pb_high".to_string(), 3.0),
            ("pb_low".to_string(), 1.0),
            ("roe_high".to_string(), 15.0),
            ("growth_high".to_string(), 20.0),
            ("growth_low".to_string(), -10.0),
        ])
    }

    fn evaluate(
        &self,
        snapshot: &MarketSnapshot,
        params: &DetectionParams,
    ) -> Result<Vec<TradingSignal>, DetectorError> {
        let Some(fundamental) = &snapshot.fundamental else {
            return Ok(Vec::new());
        };
        let mut signals = Vec::new();

        if let Some(pe) = fundamental.pe_ratio {
            if !pe.is_finite() {
                return Err(DetectorError::NonFinite {
                    field: "pe_ratio",
                    value: pe,
                });
            }
            let pe_high = param(params, "pe_high", 30.0);
            let pe_low = param(params, "pe_low", 15.0);
            if pe > pe_high {
                let confidence = (0.5 + (pe - pe_high) / 50.0).min(0.8);
                signals.push(
                    TradingSignal::new(
                        SignalType::Fundamental,
                        SignalDirection::Sell,
                        SignalStrength::Moderate,
                        confidence,
                        format!("PE elevated: {:.1}", pe),
                    )
                    .with_tag(ConditionTag::Overvalued)
                    .with_detail("pe_ratio", pe),
                );
            } else if pe > 0.0 && pe < pe_low {
                let confidence = (0.5 + (pe_low - pe) / 30.0).min(0.8);
                signals.push(
                    TradingSignal::new(
                        SignalType::Fundamental,
                        SignalDirection::Buy,
                        SignalStrength::Moderate,
                        confidence,
                        format!("PE attractive: {:.1}", pe),
                    )
                    .with_tag(ConditionTag::Undervalued)
                    .with_detail("pe_ratio", pe),
                );
            }
        }

        if let Some(pb) = fundamental.pb_ratio {
            if !pb.is_finite() {
                return Err(DetectorError::NonFinite {
                    field: "pb_ratio",
                    value: pb,
                });
            }
            let pb_high = param(params, "pb_high", 3.0);
            let pb_low = param(params, "pb_low", 1.0);
            if pb > pb_high {
                signals.push(
                    TradingSignal::new(
                        SignalType::Fundamental,
                        SignalDirection::Sell,
                        SignalStrength::Weak,
                        0.6,
                        format!("PB elevated: {:.2}", pb),
                    )
                    .with_tag(ConditionTag::Overvalued)
                    .with_detail("pb_ratio", pb),
                );
            } else if pb > 0.0 && pb < pb_low {
                signals.push(
                    TradingSignal::new(
                        SignalType::Fundamental,
                        SignalDirection::Buy,
                        SignalStrength::Moderate,
                        0.7,
                        format!("PB below book value: {:.2}", pb),
                    )
                    .with_tag(ConditionTag::Undervalued)
                    .with_detail("pb_ratio", pb),
                );
            }
        }

        if let Some(roe) = fundamental.roe {
            if !roe.is_finite() {
                return Err(DetectorError::NonFinite {
                    field: "roe",
                    value: roe,
                });
            }
            let roe_high = param(params, "roe_high", 15.0);
            if roe > roe_high {
                let confidence = (roe / 30.0).min(0.8);
                signals.push(
                    TradingSignal::new(
                        SignalType::Fundamental,
                        SignalDirection::Buy,
                        SignalStrength::Moderate,
                        confidence,
                        format!("strong ROE: {:.1}%", roe),
                    )
                    .with_tag(ConditionTag::StrongProfitability)
                    .with_detail("roe", roe),
                );
            }
        }

        if let Some(growth) = fundamental.earnings_growth {
            if !growth.is_finite() {
                return Err(DetectorError::NonFinite {
                    field: "earnings_growth",
                    value: growth,
                });
            }
            let growth_high = param(params, "growth_high", 20.0);
            let growth_low = param(params, "growth_low", -10.0);
            if growth > growth_high {
                let confidence = (0.5 + growth / 100.0).min(0.9);
                signals.push(
                    TradingSignal::new(
                        SignalType::Fundamental,
                        SignalDirection::Buy,
                        SignalStrength::Strong,
                        confidence,
                        format!("earnings accelerating: {:+.1}%", growth),
                    )
                    .with_tag(ConditionTag::EarningsAcceleration)
                    .with_detail("earnings_growth", growth),
                );
            } else if growth < growth_low {
                signals.push(
                    TradingSignal::new(
                        SignalType::Fundamental,
                        SignalDirection::Sell,
                        SignalStrength::Moderate,
                        0.65,
                        format!("earnings declining: {:+.1}%", growth),
                    )
                    .with_tag(ConditionTag::EarningsDecline)
                    .with_detail("earnings_growth", growth),
                );
            }
        }

        Ok(signals)
    }
}
