//! EKS cluster collector.
//!
//! Equal division: the control plane is billed per cluster-hour with no
//! finer per-cluster metric available, so the billed total is split
//! evenly across the clusters named in the inventory. Each record keeps
//! the undivided total alongside its share.

use super::{num, Collected, Collector, Context};
use crate::error::Result;
use crate::models::{round2, Service};

pub struct EksClusters;

impl Collector for EksClusters {
    fn service(&self) -> Service {
        Service::Eks
    }

    fn collect(&self, cx: &Context<'_>) -> Result<Collected> {
        let total_cost = cx.billing.total_cost(Service::Eks.billing_label())?;
        let clusters = cx
            .inventory
            .string_list_at(&cx.inventory_path("compute.eks.resources"))?;

        let mut out = Collected::default();
        if clusters.is_empty() {
            return Ok(out);
        }

        let divided = total_cost / clusters.len() as f64;
        for cluster in clusters {
            let record = cx
                .record(Service::Eks, cluster.clone(), divided)
                .with_attr("cluster_name", cluster)
                .with_attr("original_cost_usd", num(round2(total_cost)));
            out.push(record);
        }

        Ok(out)
    }
}
