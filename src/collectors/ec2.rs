//! EC2 instance-cost collector.
//!
//! The billing API already attributes EC2 spend to (instance type,
//! usage type) groups, so there is nothing to allocate: each group
//! becomes one record. The export's service-level total is read up
//! front so a missing export aborts the collector the same way it does
//! for the allocating services.

use super::{Collected, Collector, Context};
use crate::error::Result;
use crate::models::Service;
use tracing::debug;

pub struct Ec2Instances;

impl Collector for Ec2Instances {
    fn service(&self) -> Service {
        Service::Ec2
    }

    fn collect(&self, cx: &Context<'_>) -> Result<Collected> {
        let billed_total = cx.billing.total_cost(Service::Ec2.billing_label())?;
        let groups = cx.metrics.ec2_instance_groups()?;
        debug!(billed_total, groups = groups.len(), "EC2 instance groups");

        let mut out = Collected::default();
        for group in groups {
            let resource_id = format!("{}/{}", group.instance_type, group.usage_type);
            let record = cx
                .record(Service::Ec2, resource_id, group.cost_usd)
                .with_attr("instance_type", group.instance_type)
                .with_attr("usage_type", group.usage_type);
            out.push(record);
        }

        Ok(out)
    }
}
