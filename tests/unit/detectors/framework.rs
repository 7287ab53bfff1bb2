//! Unit tests for the detector framework: enablement, parameters,
//! bounded history and failure isolation

use alertrix::detectors::error::DetectorError;
use alertrix::detectors::framework::{
    DetectionParams, DetectionRule, Detector, SignalDetector, DETECTOR_HISTORY_CAP,
};
use alertrix::detectors::technical::TechnicalRule;
use alertrix::models::market::{MarketSnapshot, TechnicalIndicators};
use alertrix::models::signal::{SignalDirection, SignalStrength, SignalType, TradingSignal};

struct AlwaysFailingRule;

impl DetectionRule for AlwaysFailingRule {
    fn signal_type(&self) -> SignalType {
        SignalType::Technical
    }

    fn evaluate(
        &self,
        _snapshot: &MarketSnapshot,
        _params: &DetectionParams,
    ) -> Result<Vec<TradingSignal>, DetectorError> {
        Err(DetectorError::MalformedSeries("boom".to_string()))
    }
}

struct OneSignalRule;

impl DetectionRule for OneSignalRule {
    fn signal_type(&self) -> SignalType {
        SignalType::Technical
    }

    fn evaluate(
        &self,
        _snapshot: &MarketSnapshot,
        _params: &DetectionParams,
    ) -> Result<Vec<TradingSignal>, DetectorError> {
        Ok(vec![TradingSignal::new(
            SignalType::Technical,
            SignalDirection::Buy,
            SignalStrength::Weak,
            0.5,
            "one",
        )])
    }
}

fn overbought_snapshot() -> MarketSnapshot {
    MarketSnapshot::new("BTC-USD")
        .with_technical(TechnicalIndicators::default().with_rsi(85.0))
}

#[test]
fn disabled_detector_short_circuits_to_empty() {
    let mut detector = Detector::new("technical", TechnicalRule);
    detector.disable();
    assert!(!detector.is_enabled());
    assert!(detector.detect_signals(&overbought_snapshot()).is_empty());
    assert!(detector.info().last_detection_time.is_none());

    detector.enable();
    assert_eq!(detector.detect_signals(&overbought_snapshot()).len(), 1);
}

#[test]
fn rule_errors_are_isolated_and_yield_no_signals() {
    let mut detector = Detector::new("failing", AlwaysFailingRule);
    let signals = detector.detect_signals(&MarketSnapshot::new("BTC-USD"));
    assert!(signals.is_empty());
    // A failed pass records nothing.
    assert!(detector.history().is_empty());
    assert!(detector.info().last_detection_time.is_none());
}

#[test]
fn non_finite_input_is_contained_at_the_boundary() {
    let snapshot = MarketSnapshot::new("BTC-USD")
        .with_technical(TechnicalIndicators::default().with_rsi(f64::NAN));
    let mut detector = Detector::new("technical", TechnicalRule);
    assert!(detector.detect_signals(&snapshot).is_empty());
}

#[test]
fn history_is_bounded_fifo() {
    let mut detector = Detector::new("one", OneSignalRule);
    let snapshot = MarketSnapshot::new("BTC-USD");
    for _ in 0..(DETECTOR_HISTORY_CAP + 20) {
        detector.detect_signals(&snapshot);
    }
    assert_eq!(detector.history().len(), DETECTOR_HISTORY_CAP);
    assert!(detector.info().last_detection_time.is_some());
}

#[test]
fn update_parameters_merges_without_clearing() {
    let mut detector = Detector::new("technical", TechnicalRule);
    let defaults = detector.info().params;
    assert_eq!(defaults.get("rsi_overbought"), Some(&80.0));

    let override_params = DetectionParams::from([("rsi_overbought".to_string(), 90.0)]);
    detector.update_parameters(&override_params);

    let params = detector.info().params;
    assert_eq!(params.get("rsi_overbought"), Some(&90.0));
    // Untouched keys survive the merge.
    assert_eq!(params.get("rsi_oversold"), Some(&20.0));

    // RSI 85 no longer crosses the raised threshold.
    assert!(detector.detect_signals(&overbought_snapshot()).is_empty());
}

#[test]
fn detector_info_reflects_weight_and_type() {
    let detector = Detector::new("fundamental", AlwaysFailingRule).with_weight(0.6);
    let info = detector.info();
    assert_eq!(info.name, "fundamental");
    assert_eq!(info.weight, 0.6);
    assert_eq!(info.signal_type, SignalType::Technical);
    assert!(info.enabled);
}
