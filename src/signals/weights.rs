//! Signal-type weight table used by confidence fusion.
//!
//! The table is a value, not shared mutable state: the aggregator replaces
//! it wholesale and validation happens at construction.

use crate::models::signal::SignalType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight applied to signal types absent from the table.
pub const DEFAULT_WEIGHT: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    weights: BTreeMap<SignalType, f64>,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            weights: BTreeMap::from([
                (SignalType::Technical, 0.4),
                (SignalType::Sentiment, 0.3),
                (SignalType::Fundamental, 0.2),
                (SignalType::MoneyFlow, 0.1),
            ]),
        }
    }
}

impl SignalWeights {
    /// Build a validated table. Every weight must be finite and
    /// non-negative.
    pub fn new(weights: BTreeMap<SignalType, f64>) -> Result<Self, String> {
        for (signal_type, weight) in &weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(format!(
                    "invalid weight for {}: {}",
                    signal_type.as_str(),
                    weight
                ));
            }
        }
        Ok(Self { weights })
    }

    /// Derive a new table with one weight changed.
    pub fn with_weight(&self, signal_type: SignalType, weight: f64) -> Result<Self, String> {
        let mut weights = self.weights.clone();
        weights.insert(signal_type, weight);
        Self::new(weights)
    }

    pub fn weight_for(&self, signal_type: SignalType) -> f64 {
        self.weights.get(&signal_type).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn as_map(&self) -> &BTreeMap<SignalType, f64> {
        &self.weights
    }
}
