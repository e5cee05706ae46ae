//! Cost combiner.
//!
//! Runs every registered collector for one period, concatenates their
//! records into a deterministically sorted dataset, and persists it as
//! the period's artifact. Collector failures are demoted to per-service
//! outcomes: the combiner itself fails only when the artifact cannot be
//! written.

use crate::billing::BillingExport;
use crate::collectors::{self, Context, SkippedResource};
use crate::config::Config;
use crate::dataset;
use crate::error::Result;
use crate::inventory::Inventory;
use crate::metrics::SnapshotMetrics;
use crate::models::{CostRecord, Period, Service};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// What one collector contributed to the combined dataset.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ServiceOutcome {
    /// Records were produced; `skipped` lists resources dropped because
    /// their metric could not be fetched.
    Collected {
        records: usize,
        skipped: Vec<SkippedResource>,
    },
    /// The collector ran cleanly but found no resources.
    Empty,
    /// The collector aborted; it contributed nothing.
    Failed { reason: String },
}

#[derive(Debug, Serialize)]
pub struct ServiceReport {
    pub service: Service,
    #[serde(flatten)]
    pub outcome: ServiceOutcome,
}

#[derive(Debug, Serialize)]
pub struct CombineReport {
    pub period: Period,
    pub records: usize,
    pub dataset_path: PathBuf,
    pub services: Vec<ServiceReport>,
}

pub struct Combiner<'a> {
    config: &'a Config,
}

impl<'a> Combiner<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Collect and persist one period's dataset, replacing any prior
    /// artifact for that period.
    pub fn combine(&self, label: &str) -> Result<CombineReport> {
        let period_config = self.config.period_required(label)?;
        let period = period_config.period();

        // Source failures degrade to empty readers so that they surface
        // as per-collector outcomes, not a combiner-level error.
        let billing_path = self.config.billing_path(period_config);
        let billing = BillingExport::load(&billing_path).unwrap_or_else(|e| {
            warn!(period = %label, error = %e, "billing export unavailable");
            BillingExport::empty()
        });

        let inventory_path = self.config.inventory_path();
        let inventory = Inventory::load(&inventory_path).unwrap_or_else(|e| {
            warn!(period = %label, error = %e, "inventory snapshot unavailable");
            Inventory::empty()
        });

        let metrics_path = self.config.metrics_path(period_config);
        let metrics = SnapshotMetrics::load(&metrics_path).unwrap_or_else(|e| {
            warn!(period = %label, error = %e, "metrics snapshot unavailable");
            SnapshotMetrics::empty()
        });

        let cx = Context {
            period: &period,
            account_id: &self.config.account.account_id,
            prices: &self.config.prices,
            inventory_prefix: &self.config.inventory.prefix,
            ecr_repo_prefix: &self.config.inventory.ecr_repo_prefix,
            billing: &billing,
            inventory: &inventory,
            metrics: &metrics,
        };

        let mut all_records: Vec<CostRecord> = Vec::new();
        let mut services = Vec::new();

        for collector in collectors::registry() {
            let service = collector.service();
            let outcome = match collector.collect(&cx) {
                Ok(collected) => {
                    for skip in &collected.skipped {
                        warn!(
                            service = %service,
                            resource = %skip.resource_id,
                            reason = %skip.reason,
                            "resource skipped"
                        );
                    }
                    if collected.records.is_empty() && collected.skipped.is_empty() {
                        ServiceOutcome::Empty
                    } else {
                        let outcome = ServiceOutcome::Collected {
                            records: collected.records.len(),
                            skipped: collected.skipped,
                        };
                        all_records.extend(collected.records);
                        outcome
                    }
                }
                Err(e) => {
                    warn!(service = %service, error = %e, "collector failed, no records this period");
                    ServiceOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            services.push(ServiceReport { service, outcome });
        }

        sort_records(&mut all_records);

        let dataset_path = self.config.dataset_path(period_config);
        dataset::write_atomic(&dataset_path, &all_records)?;
        info!(
            period = %label,
            records = all_records.len(),
            path = %dataset_path.display(),
            "dataset persisted"
        );

        Ok(CombineReport {
            period,
            records: all_records.len(),
            dataset_path,
            services,
        })
    }

    /// Collect every configured period, returning each period's result.
    pub fn combine_all(&self) -> Vec<(String, Result<CombineReport>)> {
        self.config
            .periods
            .iter()
            .map(|p| (p.label.clone(), self.combine(&p.label)))
            .collect()
    }
}

/// Dataset order: period bounds, account, service label, then cost
/// descending within a service.
fn sort_records(records: &mut [CostRecord]) {
    records.sort_by(|a, b| {
        (a.start_date, a.end_date, &a.account_id, a.service.label())
            .cmp(&(b.start_date, b.end_date, &b.account_id, b.service.label()))
            .then_with(|| b.cost_usd.total_cmp(&a.cost_usd))
    });
}
