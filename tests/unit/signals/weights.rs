//! Unit tests for the signal weight table

use alertrix::models::signal::SignalType;
use alertrix::signals::weights::{SignalWeights, DEFAULT_WEIGHT};
use std::collections::BTreeMap;

#[test]
fn default_table_matches_the_fusion_weights() {
    let weights = SignalWeights::default();
    assert!((weights.weight_for(SignalType::Technical) - 0.4).abs() < 1e-9);
    assert!((weights.weight_for(SignalType::Sentiment) - 0.3).abs() < 1e-9);
    assert!((weights.weight_for(SignalType::Fundamental) - 0.2).abs() < 1e-9);
    assert!((weights.weight_for(SignalType::MoneyFlow) - 0.1).abs() < 1e-9);
}

#[test]
fn unlisted_types_fall_back_to_the_default_weight() {
    let weights = SignalWeights::default();
    assert!((weights.weight_for(SignalType::News) - DEFAULT_WEIGHT).abs() < 1e-9);
    assert!((weights.weight_for(SignalType::Volume) - DEFAULT_WEIGHT).abs() < 1e-9);
}

#[test]
fn construction_rejects_invalid_weights() {
    let negative = BTreeMap::from([(SignalType::Technical, -0.1)]);
    assert!(SignalWeights::new(negative).is_err());

    let non_finite = BTreeMap::from([(SignalType::Sentiment, f64::NAN)]);
    assert!(SignalWeights::new(non_finite).is_err());
}

#[test]
fn with_weight_derives_a_new_table() {
    let weights = SignalWeights::default();
    let updated = weights
        .with_weight(SignalType::Volume, 0.25)
        .expect("valid weight");

    assert!((updated.weight_for(SignalType::Volume) - 0.25).abs() < 1e-9);
    // The original table is untouched.
    assert!((weights.weight_for(SignalType::Volume) - DEFAULT_WEIGHT).abs() < 1e-9);

    assert!(weights.with_weight(SignalType::Volume, -1.0).is_err());
}
