//! Pluggable signal detectors and their registry.

pub mod error;
pub mod framework;
pub mod fundamental;
pub mod registry;
pub mod sentiment;
pub mod technical;
pub mod volume;

pub use error::DetectorError;
pub use framework::{
    param, DetectionParams, DetectionRule, Detector, DetectorInfo, SignalDetector,
    DETECTOR_HISTORY_CAP,
};
pub use fundamental::FundamentalRule;
pub use registry::{
    default_registry, DetectorRegistry, RegistryInfo, FUNDAMENTAL_DETECTOR, SENTIMENT_DETECTOR,
    TECHNICAL_DETECTOR, VOLUME_DETECTOR,
};
pub use sentiment::SentimentRule;
pub use technical::TechnicalRule;
pub use volume::VolumeRule;
