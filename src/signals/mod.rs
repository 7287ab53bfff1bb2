//! Signal fusion: weights, combination rules, events and the aggregator.

pub mod aggregator;
pub mod events;
pub mod rules;
pub mod weights;

pub use aggregator::{
    weighted_confidence, SignalAggregator, SignalStatistics, ALERT_HISTORY_CAP,
    GROUP_ALERT_MIN_SIGNALS, SIGNAL_HISTORY_CAP, STATISTICS_WINDOW_SECS,
};
pub use events::{
    BroadcastBridge, EngineEvent, EventBus, EventSubscriber, LogSubscriber, SubscriberId,
};
pub use rules::{combination_rules, evaluate_combinations, CombinationRule};
pub use weights::{SignalWeights, DEFAULT_WEIGHT};
