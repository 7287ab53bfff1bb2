//! Detector-boundary error taxonomy.
//!
//! Too-short series and missing indicator keys are not errors, just a
//! normal empty outcome. Errors here cover malformed inputs the upstream
//! pipeline should never have produced.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("non-finite {field} value: {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("malformed series: {0}")]
    MalformedSeries(String),
}
