//! Fixed combination rules evaluated over one detection pass.
//!
//! Rules match on [`ConditionTag`]s carried by the signals, independent of
//! any localized message text.

use crate::models::alert::AlertLevel;
use crate::models::signal::{ConditionTag, TradingSignal};

#[derive(Debug, Clone, Copy)]
pub struct CombinationRule {
    pub name: &'static str,
    /// Both tags must be present in the pass's signal set for the rule to
    /// fire.
    pub required: [ConditionTag; 2],
    pub level: AlertLevel,
    pub confidence: f64,
    pub title: &'static str,
    pub message: &'static str,
    pub recommended_action: &'static str,
}

const RULES: &[CombinationRule] = &[
    CombinationRule {
        name: "overbought_extreme_greed",
        required: [ConditionTag::Overbought, ConditionTag::ExtremeGreed],
        level: AlertLevel::Danger,
        confidence: 0.9,
        title: "Overbought with extreme greed",
        message: "Technical overbought combined with extreme market greed, reduce exposure or stay out",
        recommended_action: "reduce_position",
    },
    CombinationRule {
        name: "breakout_extreme_fear",
        required: [ConditionTag::Breakout, ConditionTag::ExtremeFear],
        level: AlertLevel::Warning,
        confidence: 0.7,
        title: "Breakout amid extreme fear",
        message: "Technical breakout while sentiment shows extreme fear, possible contrarian opportunity",
        recommended_action: "watch_contrarian_entry",
    },
];

pub fn combination_rules() -> &'static [CombinationRule] {
    RULES
}

/// Evaluate every rule against one pass's signal set. A rule fires at most
/// once per pass; the returned members are the signals carrying either of
/// its required tags.
pub fn evaluate_combinations(
    signals: &[TradingSignal],
) -> Vec<(&'static CombinationRule, Vec<TradingSignal>)> {
    let mut fired = Vec::new();
    for rule in RULES {
        let both_present = rule
            .required
            .iter()
            .all(|tag| signals.iter().any(|s| s.has_tag(*tag)));
        if !both_present {
            continue;
        }
        let members: Vec<TradingSignal> = signals
            .iter()
            .filter(|s| rule.required.iter().any(|tag| s.has_tag(*tag)))
            .cloned()
            .collect();
        fired.push((rule, members));
    }
    fired
}
