//! Error taxonomy for the collection and query pipeline.
//!
//! Collectors distinguish three failure classes: a missing or malformed
//! source (`DataUnavailable`), an inventory path that does not resolve
//! (`PathNotFound`), and a live metric that could not be fetched for a
//! single resource (`MetricUnavailable`). Queries add `PeriodUnknown`
//! for labels with no configured dataset. None of these are fatal to the
//! process: collectors degrade to zero records, queries degrade to a
//! structured error payload.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Billing export or inventory snapshot is missing or malformed.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// Dotted inventory path does not resolve in the snapshot.
    #[error("inventory path not found: {0}")]
    PathNotFound(String),

    /// A live per-resource metric could not be fetched.
    #[error("metric unavailable for {resource}: {reason}")]
    MetricUnavailable { resource: String, reason: String },

    /// Query named a period label with no configured dataset.
    #[error("unknown period: {0}")]
    PeriodUnknown(String),

    #[error("dataset io: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset format: {0}")]
    Csv(#[from] csv::Error),

    #[error("snapshot format: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn metric_unavailable(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MetricUnavailable {
            resource: resource.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
