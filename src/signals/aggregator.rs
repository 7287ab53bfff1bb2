//! Signal fusion core: weighting, direction grouping, combination rules,
//! bounded histories and rolling statistics.
//!
//! The aggregator is synchronous and single-writer: one `process_data`
//! call runs to completion before the next, and callers that share an
//! instance across threads serialize access at the service boundary.

use crate::detectors::registry::{DetectorRegistry, SENTIMENT_DETECTOR, TECHNICAL_DETECTOR};
use crate::models::alert::{AggregatedAlert, AlertLevel};
use crate::models::market::MarketSnapshot;
use crate::models::signal::{SignalDirection, SignalType, TradingSignal};
use crate::signals::events::{EventBus, EventSubscriber, SubscriberId};
use crate::signals::rules::evaluate_combinations;
use crate::signals::weights::SignalWeights;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, warn};

pub const SIGNAL_HISTORY_CAP: usize = 1000;
pub const ALERT_HISTORY_CAP: usize = 500;
/// Rolling window the statistics read over.
pub const STATISTICS_WINDOW_SECS: i64 = 3600;
/// Minimum same-direction signals for a group alert.
pub const GROUP_ALERT_MIN_SIGNALS: usize = 2;

/// Read-only rollup over the trailing statistics window.
#[derive(Debug, Clone, Serialize)]
pub struct SignalStatistics {
    pub window_seconds: i64,
    pub total: usize,
    pub buy_count: usize,
    pub sell_count: usize,
    pub avg_confidence: f64,
    pub signal_types: Vec<SignalType>,
}

/// Weighted group confidence: Σ(confidence · weight · strength/5) / Σ(weight).
///
/// Re-deriving this from an alert's signal snapshot and the current weight
/// table reproduces the alert's `overall_confidence` exactly.
pub fn weighted_confidence(signals: &[TradingSignal], weights: &SignalWeights) -> f64 {
    let total_weight: f64 = signals
        .iter()
        .map(|s| weights.weight_for(s.signal_type))
        .sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = signals
        .iter()
        .map(|s| s.confidence * weights.weight_for(s.signal_type) * s.strength.factor())
        .sum();
    (weighted / total_weight).clamp(0.0, 1.0)
}

fn push_bounded<T>(history: &mut VecDeque<T>, item: T, cap: usize) {
    if history.len() == cap {
        history.pop_front();
    }
    history.push_back(item);
}

/// The orchestration core of the engine.
///
/// Owns its histories exclusively; detectors own only their per-instance
/// history. The registry is injected; which registered detectors
/// participate in fusion is the ordered `fusion_sources` configuration
/// (default: technical, then sentiment). All other detectors stay
/// reachable through [`DetectorRegistry::detect_all_signals`].
pub struct SignalAggregator {
    registry: DetectorRegistry,
    weights: SignalWeights,
    fusion_sources: Vec<String>,
    bus: EventBus,
    signal_history: VecDeque<TradingSignal>,
    alert_history: VecDeque<AggregatedAlert>,
}

impl SignalAggregator {
    pub fn new(registry: DetectorRegistry, weights: SignalWeights) -> Self {
        Self {
            registry,
            weights,
            fusion_sources: vec![
                TECHNICAL_DETECTOR.to_string(),
                SENTIMENT_DETECTOR.to_string(),
            ],
            bus: EventBus::new(),
            signal_history: VecDeque::new(),
            alert_history: VecDeque::new(),
        }
    }

    /// Override which detectors feed fusion, in run order.
    pub fn with_fusion_sources(mut self, sources: Vec<String>) -> Self {
        self.fusion_sources = sources;
        self
    }

    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DetectorRegistry {
        &mut self.registry
    }

    pub fn weights(&self) -> &SignalWeights {
        &self.weights
    }

    /// Replace the weight table wholesale. The table is validated at
    /// construction, so the swap itself cannot fail.
    pub fn set_signal_weights(&mut self, weights: SignalWeights) {
        self.weights = weights;
    }

    pub fn subscribe(&mut self, subscriber: Arc<dyn EventSubscriber>) -> SubscriberId {
        self.bus.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// One full detection and aggregation pass. Returns the alerts this
    /// call generated; histories and subscribers observe them too.
    pub fn process_data(&mut self, snapshot: &MarketSnapshot) -> Vec<AggregatedAlert> {
        let sources = self.fusion_sources.clone();
        let mut signals = Vec::new();
        for name in &sources {
            match self.registry.get_mut(name) {
                Some(detector) => signals.extend(detector.detect_signals(snapshot)),
                None => warn!(detector = %name, "fusion source {} not registered", name),
            }
        }

        debug!(
            symbol = %snapshot.symbol,
            count = signals.len(),
            "detection pass produced {} signals",
            signals.len()
        );

        for signal in &signals {
            self.bus.publish_signal(signal);
            push_bounded(&mut self.signal_history, signal.clone(), SIGNAL_HISTORY_CAP);
        }

        let mut alerts = Vec::new();
        for direction in [SignalDirection::Buy, SignalDirection::Sell] {
            let group: Vec<&TradingSignal> = signals
                .iter()
                .filter(|s| s.direction == direction)
                .collect();
            if group.len() >= GROUP_ALERT_MIN_SIGNALS {
                alerts.push(self.build_group_alert(direction, &group));
            }
        }

        for (rule, members) in evaluate_combinations(&signals) {
            debug!(rule = rule.name, "combination rule {} fired", rule.name);
            alerts.push(AggregatedAlert::new(
                rule.level,
                rule.title,
                rule.message,
                members,
                rule.confidence,
                rule.recommended_action,
            ));
        }

        for alert in &alerts {
            self.bus.publish_alert(alert);
            push_bounded(&mut self.alert_history, alert.clone(), ALERT_HISTORY_CAP);
        }
        alerts
    }

    fn build_group_alert(
        &self,
        direction: SignalDirection,
        group: &[&TradingSignal],
    ) -> AggregatedAlert {
        let snapshot: Vec<TradingSignal> = group.iter().map(|s| (*s).clone()).collect();
        let confidence = weighted_confidence(&snapshot, &self.weights);

        let level = if confidence >= 0.8 {
            match direction {
                SignalDirection::Buy => AlertLevel::Success,
                _ => AlertLevel::Danger,
            }
        } else if confidence >= 0.6 {
            AlertLevel::Warning
        } else {
            AlertLevel::Info
        };

        let types: BTreeSet<&'static str> = snapshot
            .iter()
            .map(|s| s.signal_type.as_str())
            .collect();
        let type_list = types.into_iter().collect::<Vec<_>>().join(", ");

        let title = format!("{} {} signals agree", snapshot.len(), direction.as_str());
        let message = format!(
            "{} {} signals from {} sources (confidence {:.0}%)",
            snapshot.len(),
            direction.as_str(),
            type_list,
            confidence * 100.0
        );
        let recommended_action = match direction {
            SignalDirection::Buy if confidence >= 0.8 => "consider_entry",
            SignalDirection::Buy => "watch_for_entry",
            _ if confidence >= 0.8 => "reduce_position",
            _ => "review_holdings",
        };

        AggregatedAlert::new(level, title, message, snapshot, confidence, recommended_action)
    }

    /// Counts, mean confidence and distinct signal types over the trailing
    /// statistics window. Pure read-only rollup.
    pub fn signal_statistics(&self) -> SignalStatistics {
        let cutoff = Utc::now() - Duration::seconds(STATISTICS_WINDOW_SECS);
        let recent: Vec<&TradingSignal> = self
            .signal_history
            .iter()
            .filter(|s| s.timestamp >= cutoff)
            .collect();

        let total = recent.len();
        let buy_count = recent
            .iter()
            .filter(|s| s.direction == SignalDirection::Buy)
            .count();
        let sell_count = recent
            .iter()
            .filter(|s| s.direction == SignalDirection::Sell)
            .count();
        let avg_confidence = if total > 0 {
            recent.iter().map(|s| s.confidence).sum::<f64>() / total as f64
        } else {
            0.0
        };
        let signal_types: Vec<SignalType> = recent
            .iter()
            .map(|s| s.signal_type)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        SignalStatistics {
            window_seconds: STATISTICS_WINDOW_SECS,
            total,
            buy_count,
            sell_count,
            avg_confidence,
            signal_types,
        }
    }

    pub fn signal_history(&self) -> &VecDeque<TradingSignal> {
        &self.signal_history
    }

    pub fn alert_history(&self) -> &VecDeque<AggregatedAlert> {
        &self.alert_history
    }

    /// Most recent alerts first.
    pub fn recent_alerts(&self, limit: usize) -> Vec<AggregatedAlert> {
        self.alert_history
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Alerts not yet stale at `now`, most recent first.
    pub fn active_alerts(&self, now: DateTime<Utc>, limit: usize) -> Vec<AggregatedAlert> {
        self.alert_history
            .iter()
            .rev()
            .filter(|a| !a.is_stale(now))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Consumer-sweep helper: drop alerts whose lifetime has passed.
    /// Returns the number removed.
    pub fn prune_stale_alerts(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.alert_history.len();
        self.alert_history.retain(|a| !a.is_stale(now));
        before - self.alert_history.len()
    }
}
