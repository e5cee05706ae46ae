#![allow(dead_code)]

use chrono::NaiveDate;
use costboard::config::{Config, PeriodConfig};
use std::fs;
use std::path::Path;

pub const GIB: u64 = 1024 * 1024 * 1024;

/// Config with one period (`feb-2025`) rooted in `dir`. Tests add more
/// periods by pushing onto `config.periods`.
pub fn fixture_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.paths.data_dir = dir.to_path_buf();
    config.account.account_id = "000000000000".to_string();
    config.periods = vec![period_config("feb-2025", (2025, 2, 1), (2025, 2, 24))];
    config
}

pub fn period_config(label: &str, start: (i32, u32, u32), end: (i32, u32, u32)) -> PeriodConfig {
    PeriodConfig {
        label: label.to_string(),
        start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
        end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        billing_export: format!("costs-{label}.csv").into(),
        metrics: format!("metrics-{label}.json").into(),
        dataset: format!("all_costs-{label}.csv").into(),
    }
}

pub fn write_billing_export(dir: &Path, label: &str) {
    let content = "\
Service($),CloudWatch($),EC2-Instances($),Elastic Container Service for Kubernetes($),API Gateway($),WAF($),Route 53($),SQS($),Total costs($)\n\
2025-02,100.0,250.0,60.0,15.5,10.0,3.5,1.25,440.25\n";
    fs::write(dir.join(format!("costs-{label}.csv")), content).unwrap();
}

pub fn write_inventory(dir: &Path) {
    let inventory = serde_json::json!({
        "model-inference": {
            "monitoring": {
                "cloudwatch": {
                    "resources": ["/aws/eks/platform/cluster", "/aws/lambda/ingest"]
                }
            },
            "storage": {
                "ecr": { "resources": ["api"] },
                "s3": { "resources": ["arn:aws:s3:::models-bucket"] }
            },
            "compute": {
                "eks": { "resources": ["platform", "platform-staging"] }
            },
            "databases": {
                "dynamodb": {
                    "resources": ["arn:aws:dynamodb:ap-northeast-1:000000000000:table/sessions"]
                }
            },
            "security": {
                "kms": {
                    "resources": ["arn:aws:kms:ap-northeast-1:000000000000:key/abc-123"]
                }
            },
            "networking": {
                "vpc": {
                    "resources": ["arn:aws:ec2:ap-northeast-1:000000000000:vpc/vpc-0123"]
                }
            }
        }
    });
    fs::write(
        dir.join("resources.json"),
        serde_json::to_string_pretty(&inventory).unwrap(),
    )
    .unwrap();
}

pub fn write_metrics_snapshot(dir: &Path, label: &str) {
    let metrics = serde_json::json!({
        "log_groups": [
            { "name": "/aws/eks/platform/cluster", "stored_bytes": 80 * GIB },
            { "name": "/aws/lambda/ingest", "stored_bytes": 20 * GIB }
        ],
        "ecr_image_bytes": { "prod/api": 10 * GIB },
        "dynamodb_table_bytes": { "sessions": 2 * GIB },
        "s3_buckets": {
            "models-bucket": { "size_bytes": 100 * GIB, "object_count": 1234 }
        },
        "kms_requests": { "abc-123": 30000.0 },
        "vpc_egress_bytes": { "vpc-0123": 10 * GIB },
        "vpc_vpn_connections": { "vpc-0123": 1 },
        "load_balancers": [
            {
                "name": "platform-nlb",
                "arn": "arn:aws:elasticloadbalancing:ap-northeast-1:000000000000:loadbalancer/net/platform-nlb/abc",
                "vpc_id": "vpc-0123",
                "processed_bytes": GIB
            }
        ],
        "nat_gateways": [
            { "nat_id": "nat-0a1", "vpc_id": "vpc-0123", "bytes_processed": 5 * GIB }
        ],
        "cluster_volumes": [
            {
                "volume_id": "vol-1",
                "instance_id": "i-1",
                "instance_name": "node-1",
                "volume_type": "gp2",
                "size_gb": 100.0
            },
            {
                "volume_id": "vol-2",
                "instance_id": "i-2",
                "instance_name": "node-2",
                "volume_type": "gp3",
                "size_gb": 50.0
            }
        ],
        "ec2_instance_groups": [
            {
                "instance_type": "t3.large",
                "usage_type": "APN1-BoxUsage:t3.large",
                "cost_usd": 150.0
            },
            {
                "instance_type": "g4dn.xlarge",
                "usage_type": "APN1-BoxUsage:g4dn.xlarge",
                "cost_usd": 100.0
            }
        ],
        "aurora_usage_groups": [
            {
                "usage_type": "APN1-Aurora:StorageUsage",
                "cost_usd": 12.0,
                "usage_quantity": 120.0
            }
        ]
    });
    fs::write(
        dir.join(format!("metrics-{label}.json")),
        serde_json::to_string_pretty(&metrics).unwrap(),
    )
    .unwrap();
}

/// All three sources for one period.
pub fn write_full_fixture(dir: &Path, label: &str) {
    write_billing_export(dir, label);
    write_inventory(dir);
    write_metrics_snapshot(dir, label);
}

/// Write the config out as a TOML file for CLI runs.
pub fn write_config_file(dir: &Path, config: &Config) -> std::path::PathBuf {
    let path = dir.join("costboard.toml");
    fs::write(&path, toml::to_string(config).unwrap()).unwrap();
    path
}
