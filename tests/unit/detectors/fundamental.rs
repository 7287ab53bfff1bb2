//! Unit tests for the fundamental detection rules

use alertrix::detectors::framework::{DetectionParams, Detector, SignalDetector};
use alertrix::detectors::fundamental::FundamentalRule;
use alertrix::models::market::{FundamentalIndicators, MarketSnapshot};
use alertrix::models::signal::{ConditionTag, SignalDirection, SignalStrength};

fn detect(snapshot: &MarketSnapshot) -> Vec<alertrix::models::signal::TradingSignal> {
    Detector::new("fundamental", FundamentalRule).detect_signals(snapshot)
}

fn with_fundamental(fundamental: FundamentalIndicators) -> MarketSnapshot {
    MarketSnapshot::new("ACME").with_fundamental(fundamental)
}

#[test]
fn elevated_pe_sells_with_capped_confidence() {
    let snapshot = with_fundamental(FundamentalIndicators {
        pe_ratio: Some(40.0),
        ..Default::default()
    });
    let signals = detect(&snapshot);

    assert_eq!(signals.len(), 1);
    let s = &signals[0];
    assert_eq!(s.direction, SignalDirection::Sell);
    assert!((s.confidence - 0.7).abs() < 1e-9);
    assert!(s.confidence <= 0.8);
    assert!(s.has_tag(ConditionTag::Overvalued));

    // Far overshoot still caps at 0.8.
    let extreme = with_fundamental(FundamentalIndicators {
        pe_ratio: Some(120.0),
        ..Default::default()
    });
    let signals = detect(&extreme);
    assert!((signals[0].confidence - 0.8).abs() < 1e-9);
}

#[test]
fn low_pe_buys() {
    let snapshot = with_fundamental(FundamentalIndicators {
        pe_ratio: Some(9.0),
        ..Default::default()
    });
    let signals = detect(&snapshot);
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].direction, SignalDirection::Buy);
    assert!(signals[0].has_tag(ConditionTag::Undervalued));
}

#[test]
fn pb_extremes() {
    let high = with_fundamental(FundamentalIndicators {
        pb_ratio: Some(4.0),
        ..Default::default()
    });
    let signals = detect(&high);
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].strength, SignalStrength::Weak);
    assert!((signals[0].confidence - 0.6).abs() < 1e-9);

    let low = with_fundamental(FundamentalIndicators {
        pb_ratio: Some(0.8),
        ..Default::default()
    });
    let signals = detect(&low);
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].direction, SignalDirection::Buy);
    assert_eq!(signals[0].strength, SignalStrength::Moderate);
    assert!((signals[0].confidence - 0.7).abs() < 1e-9);
}

#[test]
fn strong_roe_buys_scaled_by_level() {
    let snapshot = with_fundamental(FundamentalIndicators {
        roe: Some(24.0),
        ..Default::default()
    });
    let signals = detect(&snapshot);
    assert_eq!(signals.len(), 1);
    let s = &signals[0];
    assert_eq!(s.direction, SignalDirection::Buy);
    assert!((s.confidence - 0.8).abs() < 1e-9);
    assert!(s.has_tag(ConditionTag::StrongProfitability));

    // Very high ROE still caps at 0.8.
    let extreme = with_fundamental(FundamentalIndicators {
        roe: Some(60.0),
        ..Default::default()
    });
    assert!((detect(&extreme)[0].confidence - 0.8).abs() < 1e-9);
}

#[test]
fn earnings_growth_extremes() {
    let growth = with_fundamental(FundamentalIndicators {
        earnings_growth: Some(50.0),
        ..Default::default()
    });
    let signals = detect(&growth);
    assert_eq!(signals.len(), 1);
    let s = &signals[0];
    assert_eq!(s.direction, SignalDirection::Buy);
    assert_eq!(s.strength, SignalStrength::Strong);
    assert!((s.confidence - 0.9).abs() < 1e-9);

    let decline = with_fundamental(FundamentalIndicators {
        earnings_growth: Some(-20.0),
        ..Default::default()
    });
    let signals = detect(&decline);
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].direction, SignalDirection::Sell);
    assert!(signals[0].has_tag(ConditionTag::EarningsDecline));
}

#[test]
fn neutral_fundamentals_are_silent() {
    let snapshot = with_fundamental(FundamentalIndicators {
        pe_ratio: Some(20.0),
        pb_ratio: Some(2.0),
        roe: Some(10.0),
        earnings_growth: Some(5.0),
    });
    assert!(detect(&snapshot).is_empty());
}

#[test]
fn thresholds_are_overridable_per_instance() {
    let mut detector = Detector::new("fundamental", FundamentalRule);
    detector.update_parameters(&DetectionParams::from([("pe_high".to_string(), 50.0)]));

    let snapshot = with_fundamental(FundamentalIndicators {
        pe_ratio: Some(40.0),
        ..Default::default()
    });
    assert!(detector.detect_signals(&snapshot).is_empty());
}
