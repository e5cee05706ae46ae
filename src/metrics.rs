//! Live per-resource metric sources.
//!
//! Every number the collectors need beyond the billing export and the
//! inventory — log storage bytes, image sizes, table sizes, request
//! counts, network bytes, and the grouped cost rows the billing API
//! serves for EC2 and Aurora — comes through the [`MetricSource`]
//! trait. The shipped implementation reads a per-period JSON snapshot;
//! a cloud-backed implementation slots in behind the same trait.
//!
//! Unavailability semantics mirror the underlying APIs: a missing
//! snapshot section behaves like a failed API call (`MetricUnavailable`),
//! while a missing entry inside a counter section behaves like "no
//! datapoints" and reads as zero.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogGroupMetric {
    pub name: String,
    pub stored_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketUsage {
    pub size_bytes: u64,
    pub object_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadBalancerMetric {
    pub name: String,
    pub arn: String,
    pub vpc_id: String,
    pub processed_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NatGatewayMetric {
    pub nat_id: String,
    pub vpc_id: String,
    pub bytes_processed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeMetric {
    pub volume_id: String,
    pub instance_id: String,
    pub instance_name: String,
    pub volume_type: String,
    pub size_gb: f64,
}

/// One (instance type, usage type) cost group from the billing API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceTypeGroup {
    pub instance_type: String,
    pub usage_type: String,
    pub cost_usd: f64,
}

/// One Aurora usage-type cost group from the billing API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuroraUsageGroup {
    pub usage_type: String,
    pub cost_usd: f64,
    pub usage_quantity: f64,
}

pub trait MetricSource {
    /// All log groups visible to the account, with stored bytes.
    fn log_groups(&self) -> Result<Vec<LogGroupMetric>>;

    /// Total image bytes in one repository.
    fn repository_image_bytes(&self, repository: &str) -> Result<u64>;

    /// Stored bytes of one table.
    fn table_size_bytes(&self, table: &str) -> Result<u64>;

    /// Stored bytes and object count of one bucket.
    fn bucket_usage(&self, bucket: &str) -> Result<BucketUsage>;

    /// Request count against one key over the period. Missing entries
    /// read as zero.
    fn kms_request_count(&self, key_id: &str) -> Result<f64>;

    /// Bytes egressed from one VPC over the period. Missing entries
    /// read as zero.
    fn vpc_egress_bytes(&self, vpc_id: &str) -> Result<f64>;

    /// Active VPN connections on one VPC. Missing entries read as zero.
    fn vpc_vpn_connections(&self, vpc_id: &str) -> Result<u32>;

    /// All network load balancers, with processed bytes.
    fn load_balancers(&self) -> Result<Vec<LoadBalancerMetric>>;

    /// All NAT gateways, with processed bytes.
    fn nat_gateways(&self) -> Result<Vec<NatGatewayMetric>>;

    /// EBS volumes attached to the cluster's instances.
    fn cluster_volumes(&self) -> Result<Vec<VolumeMetric>>;

    /// Grouped EC2 instance costs from the billing API.
    fn ec2_instance_groups(&self) -> Result<Vec<InstanceTypeGroup>>;

    /// Grouped Aurora storage costs from the billing API.
    fn aurora_usage_groups(&self) -> Result<Vec<AuroraUsageGroup>>;
}

/// Snapshot file layout. Every section is optional; collectors that
/// need an absent section fail with `MetricUnavailable` and contribute
/// no records, which matches a dead API in the live system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    #[serde(default)]
    pub log_groups: Option<Vec<LogGroupMetric>>,
    #[serde(default)]
    pub ecr_image_bytes: Option<HashMap<String, u64>>,
    #[serde(default)]
    pub dynamodb_table_bytes: Option<HashMap<String, u64>>,
    #[serde(default)]
    pub s3_buckets: Option<HashMap<String, BucketUsage>>,
    #[serde(default)]
    pub kms_requests: Option<HashMap<String, f64>>,
    #[serde(default)]
    pub vpc_egress_bytes: Option<HashMap<String, f64>>,
    #[serde(default)]
    pub vpc_vpn_connections: Option<HashMap<String, u32>>,
    #[serde(default)]
    pub load_balancers: Option<Vec<LoadBalancerMetric>>,
    #[serde(default)]
    pub nat_gateways: Option<Vec<NatGatewayMetric>>,
    #[serde(default)]
    pub cluster_volumes: Option<Vec<VolumeMetric>>,
    #[serde(default)]
    pub ec2_instance_groups: Option<Vec<InstanceTypeGroup>>,
    #[serde(default)]
    pub aurora_usage_groups: Option<Vec<AuroraUsageGroup>>,
}

/// File-backed metric source.
#[derive(Debug, Clone, Default)]
pub struct SnapshotMetrics {
    data: MetricsSnapshot,
}

impl SnapshotMetrics {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::DataUnavailable(format!("{}: {}", path.display(), e)))?;
        let data: MetricsSnapshot = serde_json::from_str(&content)
            .map_err(|e| Error::DataUnavailable(format!("{}: {}", path.display(), e)))?;
        Ok(Self { data })
    }

    /// A source with no sections; every call fails per resource.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_snapshot(data: MetricsSnapshot) -> Self {
        Self { data }
    }

    fn section<'a, T>(&self, section: &'a Option<T>, name: &str) -> Result<&'a T> {
        section
            .as_ref()
            .ok_or_else(|| Error::metric_unavailable(name, "snapshot section absent"))
    }
}

impl MetricSource for SnapshotMetrics {
    fn log_groups(&self) -> Result<Vec<LogGroupMetric>> {
        self.section(&self.data.log_groups, "log_groups").map(Clone::clone)
    }

    fn repository_image_bytes(&self, repository: &str) -> Result<u64> {
        let section = self.section(&self.data.ecr_image_bytes, repository)?;
        section
            .get(repository)
            .copied()
            .ok_or_else(|| Error::metric_unavailable(repository, "repository not in snapshot"))
    }

    fn table_size_bytes(&self, table: &str) -> Result<u64> {
        let section = self.section(&self.data.dynamodb_table_bytes, table)?;
        section
            .get(table)
            .copied()
            .ok_or_else(|| Error::metric_unavailable(table, "table not in snapshot"))
    }

    fn bucket_usage(&self, bucket: &str) -> Result<BucketUsage> {
        let section = self.section(&self.data.s3_buckets, bucket)?;
        section
            .get(bucket)
            .cloned()
            .ok_or_else(|| Error::metric_unavailable(bucket, "bucket not in snapshot"))
    }

    fn kms_request_count(&self, key_id: &str) -> Result<f64> {
        let section = self.section(&self.data.kms_requests, key_id)?;
        Ok(section.get(key_id).copied().unwrap_or(0.0))
    }

    fn vpc_egress_bytes(&self, vpc_id: &str) -> Result<f64> {
        let section = self.section(&self.data.vpc_egress_bytes, vpc_id)?;
        Ok(section.get(vpc_id).copied().unwrap_or(0.0))
    }

    fn vpc_vpn_connections(&self, vpc_id: &str) -> Result<u32> {
        let section = self.section(&self.data.vpc_vpn_connections, vpc_id)?;
        Ok(section.get(vpc_id).copied().unwrap_or(0))
    }

    fn load_balancers(&self) -> Result<Vec<LoadBalancerMetric>> {
        self.section(&self.data.load_balancers, "load_balancers").map(Clone::clone)
    }

    fn nat_gateways(&self) -> Result<Vec<NatGatewayMetric>> {
        self.section(&self.data.nat_gateways, "nat_gateways").map(Clone::clone)
    }

    fn cluster_volumes(&self) -> Result<Vec<VolumeMetric>> {
        self.section(&self.data.cluster_volumes, "cluster_volumes").map(Clone::clone)
    }

    fn ec2_instance_groups(&self) -> Result<Vec<InstanceTypeGroup>> {
        self.section(&self.data.ec2_instance_groups, "ec2_instance_groups")
            .map(Clone::clone)
    }

    fn aurora_usage_groups(&self) -> Result<Vec<AuroraUsageGroup>> {
        self.section(&self.data.aurora_usage_groups, "aurora_usage_groups").map(Clone::clone)
    }
}
