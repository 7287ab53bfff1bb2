//! Detector registry: a named collection of detectors with isolated
//! fan-out.

use crate::detectors::framework::{Detector, DetectorInfo, SignalDetector};
use crate::detectors::fundamental::FundamentalRule;
use crate::detectors::sentiment::SentimentRule;
use crate::detectors::technical::TechnicalRule;
use crate::detectors::volume::VolumeRule;
use crate::models::market::MarketSnapshot;
use crate::models::signal::TradingSignal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Registry-wide introspection snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryInfo {
    pub detector_count: usize,
    pub enabled_count: usize,
    pub detectors: Vec<DetectorInfo>,
}

/// Named map of detectors. Keyed by detector name; iteration order is the
/// name order, so fan-out is deterministic.
///
/// `new` builds an empty registry; seeding the default detector set is the
/// explicit [`default_registry`] factory.
#[derive(Default)]
pub struct DetectorRegistry {
    detectors: BTreeMap<String, Box<dyn SignalDetector>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a detector under its own name, replacing any previous
    /// detector with that name.
    pub fn register(&mut self, detector: Box<dyn SignalDetector>) {
        let name = detector.name().to_string();
        debug!(detector = %name, "registering detector {}", name);
        self.detectors.insert(name, detector);
    }

    /// Remove a detector by name. Removing an unknown name is a no-op.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.detectors.remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&dyn SignalDetector> {
        self.detectors.get(name).map(|d| d.as_ref())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Box<dyn SignalDetector>> {
        self.detectors.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    pub fn detector_names(&self) -> Vec<String> {
        self.detectors.keys().cloned().collect()
    }

    /// Owned metadata snapshots for every registered detector.
    pub fn detector_infos(&self) -> Vec<DetectorInfo> {
        self.detectors.values().map(|d| d.info()).collect()
    }

    /// Fan one data bundle out to every registered detector.
    ///
    /// Failure isolation lives at the detector boundary: a failing or
    /// disabled detector contributes an empty list for its name and never
    /// aborts the others.
    pub fn detect_all_signals(
        &mut self,
        snapshot: &MarketSnapshot,
    ) -> BTreeMap<String, Vec<TradingSignal>> {
        let mut results = BTreeMap::new();
        for (name, detector) in self.detectors.iter_mut() {
            let signals = detector.detect_signals(snapshot);
            debug!(
                detector = %name,
                count = signals.len(),
                "detector {} produced {} signals",
                name,
                signals.len()
            );
            results.insert(name.clone(), signals);
        }
        results
    }

    pub fn registry_info(&self) -> RegistryInfo {
        let detectors = self.detector_infos();
        RegistryInfo {
            detector_count: detectors.len(),
            enabled_count: detectors.iter().filter(|d| d.enabled).count(),
            detectors,
        }
    }
}

/// Canonical detector names used by the default set.
pub const TECHNICAL_DETECTOR: &str = "technical";
pub const SENTIMENT_DETECTOR: &str = "sentiment";
pub const FUNDAMENTAL_DETECTOR: &str = "fundamental";
pub const VOLUME_DETECTOR: &str = "volume";

/// Build a registry seeded with the full default detector set.
pub fn default_registry() -> DetectorRegistry {
    let mut registry = DetectorRegistry::new();
    registry.register(Box::new(Detector::new(TECHNICAL_DETECTOR, TechnicalRule)));
    registry.register(Box::new(Detector::new(SENTIMENT_DETECTOR, SentimentRule)));
    registry.register(Box::new(
        Detector::new(FUNDAMENTAL_DETECTOR, FundamentalRule).with_weight(0.6),
    ));
    registry.register(Box::new(
        Detector::new(VOLUME_DETECTOR, VolumeRule).with_weight(0.3),
    ));
    registry
}
