//! Core data models.
//!
//! The pipeline normalizes every billed resource into a [`CostRecord`]:
//! one record per resource per billing period, carrying the service
//! category, a service-specific resource id, the allocated cost, and a
//! small bag of display attributes. Records flow from the per-service
//! collectors through the combiner into a persisted [`Dataset`], which
//! is the only input the query engine reads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Closed set of service categories. Each variant is both a billing line
/// item and a grouping of concrete resources; the serde names are the
/// wire labels used in billing exports, dataset artifacts, and the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Service {
    #[serde(rename = "CloudWatch")]
    CloudWatch,
    #[serde(rename = "ECR")]
    Ecr,
    #[serde(rename = "EC2")]
    Ec2,
    #[serde(rename = "RDS")]
    Rds,
    #[serde(rename = "EKS")]
    Eks,
    #[serde(rename = "DynamoDB")]
    DynamoDb,
    #[serde(rename = "API Gateway")]
    ApiGateway,
    #[serde(rename = "WAF")]
    Waf,
    #[serde(rename = "S3")]
    S3,
    #[serde(rename = "KMS")]
    Kms,
    #[serde(rename = "Route 53")]
    Route53,
    #[serde(rename = "SQS")]
    Sqs,
    #[serde(rename = "VPC")]
    Vpc,
    #[serde(rename = "ELB")]
    Elb,
    #[serde(rename = "EC2-Others-NAT")]
    NatGateway,
    #[serde(rename = "EC2-Others-EBS")]
    Ebs,
}

pub const ALL_SERVICES: [Service; 16] = [
    Service::CloudWatch,
    Service::Ecr,
    Service::Ec2,
    Service::Rds,
    Service::Eks,
    Service::DynamoDb,
    Service::ApiGateway,
    Service::Waf,
    Service::S3,
    Service::Kms,
    Service::Route53,
    Service::Sqs,
    Service::Vpc,
    Service::Elb,
    Service::NatGateway,
    Service::Ebs,
];

impl Service {
    /// Wire label, as written to dataset artifacts and API payloads.
    pub fn label(&self) -> &'static str {
        match self {
            Service::CloudWatch => "CloudWatch",
            Service::Ecr => "ECR",
            Service::Ec2 => "EC2",
            Service::Rds => "RDS",
            Service::Eks => "EKS",
            Service::DynamoDb => "DynamoDB",
            Service::ApiGateway => "API Gateway",
            Service::Waf => "WAF",
            Service::S3 => "S3",
            Service::Kms => "KMS",
            Service::Route53 => "Route 53",
            Service::Sqs => "SQS",
            Service::Vpc => "VPC",
            Service::Elb => "ELB",
            Service::NatGateway => "EC2-Others-NAT",
            Service::Ebs => "EC2-Others-EBS",
        }
    }

    /// Column label in the monthly billing export. Differs from the wire
    /// label for services the export names in long form.
    pub fn billing_label(&self) -> &'static str {
        match self {
            Service::Ec2 => "EC2-Instances",
            Service::Eks => "Elastic Container Service for Kubernetes",
            other => other.label(),
        }
    }

    pub fn from_label(label: &str) -> Option<Service> {
        ALL_SERVICES.iter().copied().find(|s| s.label() == label)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One billing window with its human label (e.g. `feb-2025`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Service-specific attribute value. Attributes are either display text
/// (names, ARNs, ids) or numeric metrics (sizes, counts, sub-costs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Num(f64),
    Text(String),
}

impl AttrValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Num(n) => Some(*n),
            AttrValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Num(_) => None,
            AttrValue::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Num(n) => write!(f, "{}", n),
            AttrValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Num(v)
    }
}

impl From<u64> for AttrValue {
    fn from(v: u64) -> Self {
        AttrValue::Num(v as f64)
    }
}

impl From<u32> for AttrValue {
    fn from(v: u32) -> Self {
        AttrValue::Num(v as f64)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

/// The atomic unit: one resource's allocated cost for one period.
///
/// `cost_usd` is rounded to two decimals at construction; intermediate
/// unit rates must be applied unrounded before the record is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    pub service: Service,
    pub resource_id: String,
    pub cost_usd: f64,
    pub account_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttrValue>,
}

impl CostRecord {
    pub fn new(
        service: Service,
        resource_id: impl Into<String>,
        cost_usd: f64,
        account_id: &str,
        period: &Period,
    ) -> Self {
        Self {
            service,
            resource_id: resource_id.into(),
            cost_usd: round2(cost_usd),
            account_id: account_id.to_string(),
            start_date: period.start_date,
            end_date: period.end_date,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }
}

/// Ordered records for one period, as read from or written to the
/// persisted artifact. Regeneration replaces the whole artifact.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<CostRecord>,
}

impl Dataset {
    pub fn new(records: Vec<CostRecord>) -> Self {
        Self { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn total_cost(&self) -> f64 {
        self.records.iter().map(|r| r.cost_usd).sum()
    }
}

/// Round a monetary amount to two decimal places. Applied exactly once,
/// at the output boundary.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Bytes to GB with the 1024^3 divisor the billing formulas use.
pub fn bytes_to_gb(bytes: f64) -> f64 {
    bytes / (1024.0 * 1024.0 * 1024.0)
}
