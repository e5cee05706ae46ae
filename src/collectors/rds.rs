//! Aurora storage-cost collector.
//!
//! Like EC2, the billing API returns already-attributed groups, one per
//! storage usage type. Usage types are mapped to readable names and
//! units for the drill-down view.

use super::{num, Collected, Collector, Context};
use crate::error::Result;
use crate::models::{round2, Service};

pub struct AuroraStorage;

fn usage_name(usage_type: &str) -> &str {
    match usage_type {
        "APN1-Aurora:StorageUsage" => "Storage",
        "APN1-Aurora:StorageIOUsage" => "I/O Operations",
        "APN1-Aurora:BackupUsage" => "Backup Storage",
        other => other,
    }
}

// Checked in this order: StorageIOUsage matches the Storage arm first
// and reports GB-Month, which is what the dashboard has always shown.
fn usage_unit(usage_type: &str) -> &'static str {
    if usage_type.contains("Storage") {
        "GB-Month"
    } else if usage_type.contains("IO") {
        "IOs"
    } else {
        ""
    }
}

impl Collector for AuroraStorage {
    fn service(&self) -> Service {
        Service::Rds
    }

    fn collect(&self, cx: &Context<'_>) -> Result<Collected> {
        let groups = cx.metrics.aurora_usage_groups()?;

        let mut out = Collected::default();
        for group in groups {
            let record = cx
                .record(Service::Rds, group.usage_type.clone(), group.cost_usd)
                .with_attr("usage_type", group.usage_type.clone())
                .with_attr("usage_name", usage_name(&group.usage_type))
                .with_attr("usage_quantity", num(round2(group.usage_quantity)))
                .with_attr("unit", usage_unit(&group.usage_type));
            out.push(record);
        }

        Ok(out)
    }
}
