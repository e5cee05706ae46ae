//! CloudWatch log-group collector.
//!
//! Proportional attribution: the billed CloudWatch total is divided by
//! the total observed log storage to derive a cost per GB, and every
//! selected log group is charged its size times that same rate. The
//! derived rate is reused unrounded so the per-group costs sum back to
//! the billed total.

use super::{num, Collected, Collector, Context};
use crate::error::Result;
use crate::models::{bytes_to_gb, round2, Service};

pub struct CloudWatchLogs;

impl Collector for CloudWatchLogs {
    fn service(&self) -> Service {
        Service::CloudWatch
    }

    fn collect(&self, cx: &Context<'_>) -> Result<Collected> {
        let total_cost = cx.billing.total_cost(Service::CloudWatch.billing_label())?;
        let selected =
            cx.inventory
                .string_list_at(&cx.inventory_path("monitoring.cloudwatch.resources"))?;

        // Sizes are rounded to 2dp per group before summing, matching
        // how the storage API reports them on the dashboard.
        let sized: Vec<(String, f64)> = cx
            .metrics
            .log_groups()?
            .into_iter()
            .map(|g| (g.name, round2(bytes_to_gb(g.stored_bytes as f64))))
            .collect();

        let total_size_gb: f64 = sized.iter().map(|(_, size)| size).sum();
        let cost_per_gb = if total_size_gb > 0.0 {
            total_cost / total_size_gb
        } else {
            0.0
        };

        let mut out = Collected::default();
        for name in selected {
            match sized.iter().find(|(n, _)| *n == name) {
                Some((_, size_gb)) => {
                    let record = cx
                        .record(Service::CloudWatch, name.clone(), size_gb * cost_per_gb)
                        .with_attr("log_group_name", name)
                        .with_attr("size_gb", num(*size_gb))
                        .with_attr("cost_per_gb", num(round2(cost_per_gb)));
                    out.push(record);
                }
                None => out.skip(name, "log group absent from storage metrics"),
            }
        }

        Ok(out)
    }
}
