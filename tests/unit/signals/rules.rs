//! Unit tests for tag-based combination rules

use alertrix::models::alert::AlertLevel;
use alertrix::models::signal::{
    ConditionTag, SignalDirection, SignalStrength, SignalType, TradingSignal,
};
use alertrix::signals::rules::{combination_rules, evaluate_combinations};

fn tagged(tag: ConditionTag, direction: SignalDirection) -> TradingSignal {
    TradingSignal::new(
        SignalType::Technical,
        direction,
        SignalStrength::Strong,
        0.8,
        "test signal",
    )
    .with_tag(tag)
}

#[test]
fn rule_table_covers_both_fixed_combinations() {
    let rules = combination_rules();
    assert_eq!(rules.len(), 2);
    assert!(rules.iter().any(|r| r.level == AlertLevel::Danger && r.confidence == 0.9));
    assert!(rules.iter().any(|r| r.level == AlertLevel::Warning && r.confidence == 0.7));
}

#[test]
fn overbought_plus_greed_fires_the_danger_rule() {
    let signals = vec![
        tagged(ConditionTag::Overbought, SignalDirection::Sell),
        tagged(ConditionTag::ExtremeGreed, SignalDirection::Sell),
    ];
    let fired = evaluate_combinations(&signals);
    assert_eq!(fired.len(), 1);
    let (rule, members) = &fired[0];
    assert_eq!(rule.level, AlertLevel::Danger);
    assert_eq!(members.len(), 2);
}

#[test]
fn a_single_member_condition_does_not_fire() {
    let signals = vec![tagged(ConditionTag::Overbought, SignalDirection::Sell)];
    assert!(evaluate_combinations(&signals).is_empty());

    let signals = vec![tagged(ConditionTag::ExtremeGreed, SignalDirection::Sell)];
    assert!(evaluate_combinations(&signals).is_empty());
}

#[test]
fn breakout_plus_fear_fires_the_contrarian_rule() {
    let signals = vec![
        tagged(ConditionTag::Breakout, SignalDirection::Buy),
        tagged(ConditionTag::ExtremeFear, SignalDirection::Buy),
    ];
    let fired = evaluate_combinations(&signals);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].0.level, AlertLevel::Warning);
    assert!((fired[0].0.confidence - 0.7).abs() < 1e-9);
}

#[test]
fn matching_is_tag_based_not_message_based() {
    // Messages say nothing about the condition; only tags matter.
    let mut greed = tagged(ConditionTag::ExtremeGreed, SignalDirection::Sell);
    greed.message = "completely unrelated text".to_string();
    let mut overbought = tagged(ConditionTag::Overbought, SignalDirection::Sell);
    overbought.message = "also unrelated".to_string();

    let fired = evaluate_combinations(&[overbought, greed]);
    assert_eq!(fired.len(), 1);
}

#[test]
fn both_rules_can_fire_in_one_pass() {
    let signals = vec![
        tagged(ConditionTag::Overbought, SignalDirection::Sell),
        tagged(ConditionTag::ExtremeGreed, SignalDirection::Sell),
        tagged(ConditionTag::Breakout, SignalDirection::Buy),
        tagged(ConditionTag::ExtremeFear, SignalDirection::Buy),
    ];
    assert_eq!(evaluate_combinations(&signals).len(), 2);
}
