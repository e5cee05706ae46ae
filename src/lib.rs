//! costboard
//!
//! Collects per-service cloud cost data from monthly billing exports
//! and resource inventory snapshots, derives costs that are not
//! directly billed by allocating service-level totals across discovered
//! resources, and serves the aggregated result to a dashboard.
//!
//! ## Pipeline
//!
//! 1. [`billing`] reads the authoritative per-service totals from the
//!    period's billing export.
//! 2. [`inventory`] answers "which resources exist" from the platform's
//!    inventory snapshot.
//! 3. [`metrics`] supplies live per-resource numbers (storage bytes,
//!    request counts, processed bytes) behind the [`metrics::MetricSource`]
//!    trait.
//! 4. [`collectors`] turn those three sources into normalized
//!    [`models::CostRecord`]s, one collector per service, each with its
//!    own allocation strategy.
//! 5. [`combiner`] concatenates, sorts, and persists one [`models::Dataset`]
//!    artifact per period via [`dataset`].
//! 6. [`query`] answers aggregate and drill-down queries over persisted
//!    datasets only, regenerating a missing artifact on demand.
//! 7. [`server`] exposes the query engine as JSON over HTTP.
//!
//! Collection is synchronous and request-scoped; there is no background
//! scheduler. Failures isolate per resource, then per collector — no
//! condition in the pipeline is fatal to the process.

pub mod billing;
pub mod collectors;
pub mod combiner;
pub mod config;
pub mod dataset;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod query;
pub mod report;
pub mod server;

pub use error::{Error, Result};
pub use models::{AttrValue, CostRecord, Dataset, Period, Service};
