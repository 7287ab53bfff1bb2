//! Unit tests for the volume detection rules

use alertrix::detectors::framework::{Detector, SignalDetector};
use alertrix::detectors::volume::VolumeRule;
use alertrix::models::market::{Candle, MarketSnapshot};
use alertrix::models::signal::{ConditionTag, SignalDirection, SignalStrength};
use chrono::Utc;

fn detect(snapshot: &MarketSnapshot) -> Vec<alertrix::models::signal::TradingSignal> {
    Detector::new("volume", VolumeRule).detect_signals(snapshot)
}

fn candle(close: f64, volume: f64) -> Candle {
    Candle::new(close, close + 0.5, close - 0.5, close, volume, Utc::now())
}

#[test]
fn strong_surge_follows_positive_price_change() {
    // 19 baseline bars plus a 3.5x volume bar closing higher.
    let mut candles: Vec<Candle> = (0..19).map(|_| candle(100.0, 1000.0)).collect();
    candles.push(candle(101.0, 3500.0));
    let snapshot = MarketSnapshot::new("BTC-USD").with_candles(candles);

    let signals = detect(&snapshot);
    assert_eq!(signals.len(), 1);
    let s = &signals[0];
    assert_eq!(s.direction, SignalDirection::Buy);
    assert_eq!(s.strength, SignalStrength::Strong);
    assert!(s.has_tag(ConditionTag::VolumeSurge));
    assert!((s.details["volume_ratio"] - 3.5).abs() < 1e-9);
}

#[test]
fn moderate_surge_follows_negative_price_change() {
    // Rising baseline keeps the divergence rule quiet; the final bar dips
    // on 2.2x volume.
    let mut candles: Vec<Candle> = (0..19).map(|i| candle(100.0 + i as f64, 1000.0)).collect();
    candles.push(candle(117.0, 2200.0));
    let snapshot = MarketSnapshot::new("BTC-USD").with_candles(candles);

    let signals = detect(&snapshot);
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].direction, SignalDirection::Sell);
    assert_eq!(signals[0].strength, SignalStrength::Moderate);
}

#[test]
fn sub_threshold_volume_is_silent() {
    let mut candles: Vec<Candle> = (0..19).map(|_| candle(100.0, 1000.0)).collect();
    candles.push(candle(100.5, 1500.0));
    let snapshot = MarketSnapshot::new("BTC-USD").with_candles(candles);
    assert!(detect(&snapshot).is_empty());
}

#[test]
fn bearish_divergence_price_up_volume_down() {
    // Ten bars: price climbs, volume fades well past the threshold.
    let candles: Vec<Candle> = (0..10)
        .map(|i| candle(100.0 + i as f64, 2000.0 - 150.0 * i as f64))
        .collect();
    let snapshot = MarketSnapshot::new("BTC-USD").with_candles(candles);

    let signals = detect(&snapshot);
    assert_eq!(signals.len(), 1);
    let s = &signals[0];
    assert_eq!(s.direction, SignalDirection::Sell);
    assert_eq!(s.strength, SignalStrength::Moderate);
    assert!(s.has_tag(ConditionTag::BearishDivergence));
}

#[test]
fn bullish_divergence_price_down_volume_up() {
    let candles: Vec<Candle> = (0..10)
        .map(|i| candle(110.0 - i as f64, 1000.0 + 200.0 * i as f64))
        .collect();
    let snapshot = MarketSnapshot::new("BTC-USD").with_candles(candles);

    let signals = detect(&snapshot);
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].direction, SignalDirection::Buy);
    assert!(signals[0].has_tag(ConditionTag::BullishDivergence));
}

#[test]
fn short_series_is_a_normal_empty_outcome() {
    let candles: Vec<Candle> = (0..5).map(|_| candle(100.0, 1000.0)).collect();
    let snapshot = MarketSnapshot::new("BTC-USD").with_candles(candles);
    assert!(detect(&snapshot).is_empty());

    assert!(detect(&MarketSnapshot::new("BTC-USD")).is_empty());
}
