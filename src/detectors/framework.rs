//! Detector framework: the capability contract plus the shared state every
//! detector carries (enablement, parameters, bounded history, failure
//! isolation).

use crate::detectors::error::DetectorError;
use crate::models::market::MarketSnapshot;
use crate::models::signal::{SignalType, TradingSignal};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use tracing::warn;

/// Per-detector history bound; oldest entries are dropped first.
pub const DETECTOR_HISTORY_CAP: usize = 100;

/// Per-instance tunable thresholds. Keys absent from the map fall back to
/// the rule's defaults, so a partial override never clears other values.
pub type DetectionParams = BTreeMap<String, f64>;

/// Read a parameter with a fallback default.
pub fn param(params: &DetectionParams, key: &str, default: f64) -> f64 {
    params.get(key).copied().unwrap_or(default)
}

/// Introspection metadata for one detector instance.
#[derive(Debug, Clone, Serialize)]
pub struct DetectorInfo {
    pub name: String,
    pub signal_type: SignalType,
    pub weight: f64,
    pub enabled: bool,
    pub params: DetectionParams,
    pub history_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_detection_time: Option<DateTime<Utc>>,
}

/// Capability contract every detector satisfies.
pub trait SignalDetector: Send + Sync {
    fn name(&self) -> &str;

    /// The source family this detector reports under.
    fn signal_type(&self) -> SignalType;

    /// Run one detection pass. Never fails: a disabled detector returns an
    /// empty list, and any rule error is logged and converted to an empty
    /// list at this boundary.
    fn detect_signals(&mut self, snapshot: &MarketSnapshot) -> Vec<TradingSignal>;

    fn info(&self) -> DetectorInfo;

    fn is_enabled(&self) -> bool;
    fn enable(&mut self);
    fn disable(&mut self);

    /// Merge `params` into the detector's parameter map, keeping existing
    /// keys that are not overridden.
    fn update_parameters(&mut self, params: &DetectionParams);

    fn history(&self) -> &VecDeque<TradingSignal>;
}

/// One source's pure detection logic. The [`Detector`] wrapper supplies
/// everything else: enablement, history, parameters, failure isolation.
pub trait DetectionRule: Send + Sync {
    fn signal_type(&self) -> SignalType;

    fn default_params(&self) -> DetectionParams {
        DetectionParams::new()
    }

    fn evaluate(
        &self,
        snapshot: &MarketSnapshot,
        params: &DetectionParams,
    ) -> Result<Vec<TradingSignal>, DetectorError>;
}

/// Framework wrapper turning a [`DetectionRule`] into a full
/// [`SignalDetector`].
pub struct Detector<R: DetectionRule> {
    name: String,
    weight: f64,
    enabled: bool,
    params: DetectionParams,
    history: VecDeque<TradingSignal>,
    last_detection_time: Option<DateTime<Utc>>,
    rule: R,
}

impl<R: DetectionRule> Detector<R> {
    pub fn new(name: impl Into<String>, rule: R) -> Self {
        let params = rule.default_params();
        Self {
            name: name.into(),
            weight: 1.0,
            enabled: true,
            params,
            history: VecDeque::new(),
            last_detection_time: None,
            rule,
        }
    }

    /// Relative contribution of this detector, default 1.0.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    fn record(&mut self, signals: &[TradingSignal]) {
        self.last_detection_time = Some(Utc::now());
        for signal in signals {
            if self.history.len() == DETECTOR_HISTORY_CAP {
                self.history.pop_front();
            }
            self.history.push_back(signal.clone());
        }
    }
}

impl<R: DetectionRule> SignalDetector for Detector<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn signal_type(&self) -> SignalType {
        self.rule.signal_type()
    }

    fn detect_signals(&mut self, snapshot: &MarketSnapshot) -> Vec<TradingSignal> {
        if !self.enabled {
            return Vec::new();
        }
        match self.rule.evaluate(snapshot, &self.params) {
            Ok(signals) => {
                self.record(&signals);
                signals
            }
            Err(e) => {
                warn!(
                    detector = %self.name,
                    error = %e,
                    "detection failed for {}, returning no signals",
                    self.name
                );
                Vec::new()
            }
        }
    }

    fn info(&self) -> DetectorInfo {
        DetectorInfo {
            name: self.name.clone(),
            signal_type: self.rule.signal_type(),
            weight: self.weight,
            enabled: self.enabled,
            params: self.params.clone(),
            history_len: self.history.len(),
            last_detection_time: self.last_detection_time,
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn update_parameters(&mut self, params: &DetectionParams) {
        for (key, value) in params {
            self.params.insert(key.clone(), *value);
        }
    }

    fn history(&self) -> &VecDeque<TradingSignal> {
        &self.history
    }
}
