//! Aggregation and query engine.
//!
//! Queries operate on persisted datasets only, never on live sources;
//! if the requested period's artifact is missing it is regenerated via
//! the combiner before answering. Every public entry point degrades to
//! a structured payload with an `error` string on failure — nothing
//! here panics or bubbles an error to the HTTP boundary.

use crate::combiner::Combiner;
use crate::config::Config;
use crate::dataset;
use crate::error::Result;
use crate::models::{round2, Dataset, Service};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Rows returned by the top-resources panel.
pub const TOP_RESOURCES_LIMIT: usize = 10;

/// Attribute holding each service's human-readable resource name.
/// Services without an entry (the flat pass-through ones) display an
/// empty name rather than failing.
fn resource_name_attr(service: Service) -> Option<&'static str> {
    match service {
        Service::CloudWatch => Some("log_group_name"),
        Service::Ecr => Some("repository_name"),
        Service::Ec2 => Some("instance_type"),
        Service::Rds => Some("usage_name"),
        Service::Eks => Some("cluster_name"),
        Service::DynamoDb => Some("table_name"),
        Service::S3 => Some("name"),
        Service::Kms => Some("key_id"),
        Service::Vpc => Some("vpc_id"),
        Service::Elb => Some("name"),
        Service::NatGateway => Some("nat_id"),
        Service::Ebs => Some("volume_id"),
        Service::ApiGateway | Service::Waf | Service::Route53 | Service::Sqs => None,
    }
}

/// Fixed drill-down columns per service. Services outside the map fall
/// back to a single cost column.
fn detail_columns(service: Service) -> &'static [(&'static str, &'static str)] {
    match service {
        Service::CloudWatch => &[
            ("log_group_name", "Log Group"),
            ("size_gb", "Size (GB)"),
            ("cost_usd", "Cost (USD)"),
        ],
        Service::Ecr => &[
            ("repository_name", "Repository"),
            ("size_gb", "Size (GB)"),
            ("cost_usd", "Cost (USD)"),
        ],
        Service::Ec2 => &[
            ("instance_type", "Instance Type"),
            ("usage_type", "Usage Type"),
            ("cost_usd", "Cost (USD)"),
        ],
        Service::Rds => &[
            ("usage_name", "Usage"),
            ("usage_quantity", "Quantity"),
            ("cost_usd", "Cost (USD)"),
        ],
        Service::Eks => &[("cluster_name", "Cluster"), ("cost_usd", "Cost (USD)")],
        Service::DynamoDb => &[
            ("table_name", "Table"),
            ("size_gb", "Size (GB)"),
            ("cost_usd", "Cost (USD)"),
        ],
        Service::S3 => &[("name", "Bucket"), ("cost_usd", "Cost (USD)")],
        Service::Kms => &[("key_id", "Key ID"), ("cost_usd", "Cost (USD)")],
        Service::Vpc => &[("vpc_id", "VPC ID"), ("cost_usd", "Cost (USD)")],
        Service::NatGateway => &[
            ("nat_id", "NAT Gateway"),
            ("data_gb", "Data Processed (GB)"),
            ("cost_usd", "Cost (USD)"),
        ],
        Service::Ebs => &[
            ("volume_id", "Volume ID"),
            ("size_gb", "Size (GB)"),
            ("cost_usd", "Cost (USD)"),
        ],
        _ => &[("cost_usd", "Cost (USD)")],
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTrend {
    pub months: Vec<String>,
    pub costs: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MonthlyTrend {
    fn empty() -> Self {
        Self {
            months: Vec::new(),
            costs: Vec::new(),
            error: None,
        }
    }

    fn with_error(message: String) -> Self {
        Self {
            months: Vec::new(),
            costs: Vec::new(),
            error: Some(message),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopResource {
    pub resource_name: String,
    pub service: Service,
    pub cost_usd: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MostExpensiveService {
    pub name: String,
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_cost: f64,
    pub avg_monthly_cost: f64,
    pub most_expensive_service: MostExpensiveService,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostsOverview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub service_costs: BTreeMap<String, f64>,
    pub monthly_trend: MonthlyTrend,
    pub top_resources: Vec<TopResource>,
    pub summary: Summary,
}

impl CostsOverview {
    fn empty_with_error(message: String) -> Self {
        Self {
            error: Some(message),
            service_costs: BTreeMap::new(),
            monthly_trend: MonthlyTrend::empty(),
            top_resources: Vec::new(),
            summary: Summary {
                total_cost: 0.0,
                avg_monthly_cost: 0.0,
                most_expensive_service: MostExpensiveService {
                    name: "-".to_string(),
                    cost: 0.0,
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub columns: Vec<ColumnSpec>,
    pub resources: Vec<BTreeMap<&'static str, Value>>,
}

impl ServiceDetail {
    fn empty() -> Self {
        Self {
            error: None,
            columns: Vec::new(),
            resources: Vec::new(),
        }
    }

    fn with_error(message: String) -> Self {
        Self {
            error: Some(message),
            columns: Vec::new(),
            resources: Vec::new(),
        }
    }
}

pub struct QueryEngine {
    config: Arc<Config>,
}

impl QueryEngine {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load one period's dataset, regenerating the artifact on demand
    /// if it has not been materialized yet.
    pub fn dataset_for(&self, label: &str) -> Result<Dataset> {
        let period = self.config.period_required(label)?;
        let path = self.config.dataset_path(period);

        if !path.exists() {
            info!(period = %label, "dataset artifact missing, regenerating");
            Combiner::new(&self.config).combine(label)?;
        }

        dataset::read(&path)
    }

    /// Per-service totals for one dataset, rounded to 2dp.
    pub fn service_totals(&self, dataset: &Dataset) -> BTreeMap<String, f64> {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for record in &dataset.records {
            *totals.entry(record.service.label().to_string()).or_insert(0.0) +=
                record.cost_usd;
        }
        totals.values_mut().for_each(|v| *v = round2(*v));
        totals
    }

    /// Total cost per configured period, in configuration order.
    /// Periods whose artifact is absent or empty are skipped silently.
    pub fn trend(&self) -> MonthlyTrend {
        self.trend_filtered(None)
    }

    /// Like [`trend`](Self::trend), restricted to one service.
    pub fn service_trend(&self, service_label: &str) -> MonthlyTrend {
        let service = match Service::from_label(service_label) {
            Some(service) => service,
            None => {
                return MonthlyTrend::with_error(format!(
                    "No data available for {service_label}"
                ))
            }
        };

        let mut trend = self.trend_filtered(Some(service));
        if trend.months.is_empty() {
            trend.error = Some(format!("No data available for {service_label}"));
        }
        trend
    }

    fn trend_filtered(&self, service: Option<Service>) -> MonthlyTrend {
        let mut trend = MonthlyTrend::empty();

        for period in &self.config.periods {
            let path = self.config.dataset_path(period);
            if !path.exists() {
                continue;
            }
            let dataset = match dataset::read(&path) {
                Ok(dataset) => dataset,
                Err(e) => {
                    warn!(period = %period.label, error = %e, "skipping unreadable dataset");
                    continue;
                }
            };

            let total: f64 = dataset
                .records
                .iter()
                .filter(|r| service.map_or(true, |s| r.service == s))
                .map(|r| r.cost_usd)
                .sum();
            let matched = match service {
                None => !dataset.is_empty(),
                Some(s) => dataset.records.iter().any(|r| r.service == s),
            };

            if matched {
                trend.months.push(period.label.clone());
                trend.costs.push(round2(total));
            }
        }

        trend
    }

    /// The `n` highest-cost records with their display names.
    pub fn top_resources(&self, dataset: &Dataset, n: usize) -> Vec<TopResource> {
        let mut ranked: Vec<&crate::models::CostRecord> = dataset.records.iter().collect();
        ranked.sort_by(|a, b| b.cost_usd.total_cmp(&a.cost_usd));

        ranked
            .into_iter()
            .take(n)
            .map(|record| TopResource {
                resource_name: resource_name_attr(record.service)
                    .and_then(|attr| record.attr(attr))
                    .map(|value| value.to_string())
                    .unwrap_or_default(),
                service: record.service,
                cost_usd: record.cost_usd,
            })
            .collect()
    }

    /// Drill-down rows for one service, projected onto its fixed column
    /// set. Cost/size/quantity columns coerce to 2dp numbers with
    /// missing values as 0; other columns default to the empty string.
    pub fn service_detail(&self, dataset: &Dataset, service_label: &str) -> ServiceDetail {
        let service = Service::from_label(service_label);
        let rows: Vec<&crate::models::CostRecord> = dataset
            .records
            .iter()
            .filter(|r| Some(r.service) == service)
            .collect();

        if rows.is_empty() {
            return ServiceDetail::empty();
        }

        let service = service.expect("rows imply a known service");
        let columns: Vec<ColumnSpec> = detail_columns(service)
            .iter()
            .map(|&(key, label)| ColumnSpec { key, label })
            .collect();

        let resources = rows
            .into_iter()
            .map(|record| {
                let mut row: BTreeMap<&'static str, Value> = BTreeMap::new();
                for column in &columns {
                    let value = if column.key == "cost_usd" {
                        json!(round2(record.cost_usd))
                    } else if is_numeric_column(column.key) {
                        let n = record
                            .attr(column.key)
                            .and_then(|v| v.as_f64())
                            .unwrap_or(0.0);
                        json!(round2(n))
                    } else {
                        match record.attr(column.key) {
                            Some(value) => serde_json::to_value(value).unwrap_or(Value::Null),
                            None => json!(""),
                        }
                    };
                    row.insert(column.key, value);
                }
                row
            })
            .collect();

        ServiceDetail {
            error: None,
            columns,
            resources,
        }
    }

    /// Headline numbers for one dataset. `avg_monthly_cost` is defined
    /// identically to `total_cost`; the dashboard has always shown it
    /// that way.
    pub fn summary(&self, dataset: &Dataset) -> Summary {
        let totals = self.service_totals(dataset);
        let total_cost = round2(dataset.total_cost());

        let most_expensive = totals
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(name, cost)| MostExpensiveService {
                name: name.clone(),
                cost: *cost,
            })
            .unwrap_or(MostExpensiveService {
                name: "-".to_string(),
                cost: 0.0,
            });

        Summary {
            total_cost,
            avg_monthly_cost: total_cost,
            most_expensive_service: most_expensive,
        }
    }

    /// The full dashboard payload for one period.
    pub fn overview(&self, label: &str) -> CostsOverview {
        let dataset = match self.dataset_for(label) {
            Ok(dataset) => dataset,
            Err(e) => {
                warn!(period = %label, error = %e, "overview query failed");
                return CostsOverview::empty_with_error(e.to_string());
            }
        };

        if dataset.is_empty() {
            return CostsOverview::empty_with_error(format!("No data available for {label}"));
        }

        CostsOverview {
            error: None,
            service_costs: self.service_totals(&dataset),
            monthly_trend: self.trend(),
            top_resources: self.top_resources(&dataset, TOP_RESOURCES_LIMIT),
            summary: self.summary(&dataset),
        }
    }

    /// The drill-down payload for one period and service.
    pub fn details(&self, label: &str, service_label: &str) -> ServiceDetail {
        let dataset = match self.dataset_for(label) {
            Ok(dataset) => dataset,
            Err(e) => {
                warn!(period = %label, error = %e, "details query failed");
                return ServiceDetail::with_error(e.to_string());
            }
        };

        self.service_detail(&dataset, service_label)
    }
}

/// Columns coerced to 2dp numbers in drill-down views.
fn is_numeric_column(key: &str) -> bool {
    key == "cost_usd" || key.contains("size") || key.contains("quantity")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_column_rule() {
        assert!(is_numeric_column("cost_usd"));
        assert!(is_numeric_column("size_gb"));
        assert!(is_numeric_column("usage_quantity"));
        assert!(!is_numeric_column("data_gb"));
        assert!(!is_numeric_column("log_group_name"));
    }

    #[test]
    fn test_detail_columns_fall_back_to_cost_only() {
        assert_eq!(detail_columns(Service::Elb), &[("cost_usd", "Cost (USD)")][..]);
        assert_eq!(
            detail_columns(Service::ApiGateway),
            &[("cost_usd", "Cost (USD)")][..]
        );
        assert_eq!(detail_columns(Service::CloudWatch).len(), 3);
    }

    #[test]
    fn test_resource_name_attrs() {
        assert_eq!(resource_name_attr(Service::CloudWatch), Some("log_group_name"));
        assert_eq!(resource_name_attr(Service::Sqs), None);
    }
}
