//! Per-service cost collectors.
//!
//! Each collector owns one service category: it reads the billed total
//! and/or the inventory and live metrics for its service, applies its
//! allocation strategy, and emits normalized [`CostRecord`]s. A failure
//! fetching one resource's metric skips that resource and is reported
//! in [`Collected::skipped`]; a collector-level failure (missing export
//! column, absent inventory path) aborts only that collector and the
//! combiner records it as zero output for the service.

use crate::billing::BillingExport;
use crate::config::PriceTable;
use crate::error::Result;
use crate::inventory::Inventory;
use crate::metrics::MetricSource;
use crate::models::{AttrValue, CostRecord, Period, Service};
use serde::Serialize;

pub mod cloudwatch;
pub mod dynamodb;
pub mod ebs;
pub mod ec2;
pub mod ecr;
pub mod eks;
pub mod elb;
pub mod kms;
pub mod nat;
pub mod passthrough;
pub mod rds;
pub mod s3;
pub mod vpc;

/// Everything a collector may consult, borrowed for one run. Built by
/// the combiner; tests construct it directly against fixtures.
pub struct Context<'a> {
    pub period: &'a Period,
    pub account_id: &'a str,
    pub prices: &'a PriceTable,
    pub inventory_prefix: &'a str,
    pub ecr_repo_prefix: &'a str,
    pub billing: &'a BillingExport,
    pub inventory: &'a Inventory,
    pub metrics: &'a dyn MetricSource,
}

impl Context<'_> {
    /// Dotted inventory path under the configured platform prefix.
    pub fn inventory_path(&self, suffix: &str) -> String {
        format!("{}.{}", self.inventory_prefix, suffix)
    }

    /// Start a record for this run's period and account.
    pub fn record(
        &self,
        service: Service,
        resource_id: impl Into<String>,
        cost_usd: f64,
    ) -> CostRecord {
        CostRecord::new(service, resource_id, cost_usd, self.account_id, self.period)
    }
}

/// A resource dropped from one collector run, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedResource {
    pub resource_id: String,
    pub reason: String,
}

/// One collector's output: the records it produced and the resources it
/// had to skip. Both empty is a legitimate "no resources" outcome.
#[derive(Debug, Default)]
pub struct Collected {
    pub records: Vec<CostRecord>,
    pub skipped: Vec<SkippedResource>,
}

impl Collected {
    pub fn push(&mut self, record: CostRecord) {
        self.records.push(record);
    }

    pub fn skip(&mut self, resource_id: impl Into<String>, reason: impl ToString) {
        self.skipped.push(SkippedResource {
            resource_id: resource_id.into(),
            reason: reason.to_string(),
        });
    }
}

pub trait Collector {
    fn service(&self) -> Service;

    fn collect(&self, cx: &Context<'_>) -> Result<Collected>;
}

/// All registered collectors, in combination order.
pub fn registry() -> Vec<Box<dyn Collector>> {
    vec![
        Box::new(cloudwatch::CloudWatchLogs),
        Box::new(ecr::EcrRepositories),
        Box::new(ec2::Ec2Instances),
        Box::new(rds::AuroraStorage),
        Box::new(eks::EksClusters),
        Box::new(dynamodb::DynamoDbTables),
        Box::new(passthrough::FlatTotal::new(Service::ApiGateway)),
        Box::new(passthrough::FlatTotal::new(Service::Waf)),
        Box::new(s3::S3Buckets),
        Box::new(kms::KmsKeys),
        Box::new(passthrough::FlatTotal::new(Service::Route53)),
        Box::new(passthrough::FlatTotal::new(Service::Sqs)),
        Box::new(vpc::VpcNetwork),
        Box::new(elb::NetworkLoadBalancers),
        Box::new(nat::NatGateways),
        Box::new(ebs::ClusterVolumes),
    ]
}

/// Trailing ARN segment after a `marker` such as `table/` or `key/`.
/// ARNs that do not contain the marker pass through unchanged, as the
/// inventory sometimes stores bare names.
pub(crate) fn arn_suffix<'a>(arn: &'a str, marker: &str) -> &'a str {
    match arn.rfind(marker) {
        Some(idx) => &arn[idx + marker.len()..],
        None => arn,
    }
}

pub(crate) fn num(value: f64) -> AttrValue {
    AttrValue::Num(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arn_suffix() {
        assert_eq!(
            arn_suffix("arn:aws:dynamodb:ap-northeast-1:1:table/sessions", "table/"),
            "sessions"
        );
        assert_eq!(arn_suffix("arn:aws:s3:::my-bucket", ":"), "my-bucket");
        assert_eq!(arn_suffix("plain-name", "key/"), "plain-name");
    }

    #[test]
    fn test_registry_covers_every_service_once() {
        let mut services: Vec<Service> = registry().iter().map(|c| c.service()).collect();
        assert_eq!(services.len(), 16);
        services.sort();
        services.dedup();
        assert_eq!(services.len(), 16);
    }
}
