//! EBS volume collector.
//!
//! Direct metric cost for the gp2 volumes attached to the cluster's
//! instances: provisioned size times the fixed GB-month rate. Other
//! volume types are not billed under this line item and are ignored.

use super::{num, Collected, Collector, Context};
use crate::error::Result;
use crate::models::{round2, Service};

pub struct ClusterVolumes;

impl Collector for ClusterVolumes {
    fn service(&self) -> Service {
        Service::Ebs
    }

    fn collect(&self, cx: &Context<'_>) -> Result<Collected> {
        let volumes = cx.metrics.cluster_volumes()?;

        let mut out = Collected::default();
        for volume in volumes {
            if volume.volume_type != "gp2" {
                continue;
            }

            let cost = volume.size_gb * cx.prices.ebs_gp2_gb_month;
            let record = cx
                .record(Service::Ebs, volume.volume_id.clone(), cost)
                .with_attr("volume_id", volume.volume_id)
                .with_attr("instance_id", volume.instance_id)
                .with_attr("instance_name", volume.instance_name)
                .with_attr("size_gb", num(round2(volume.size_gb)));
            out.push(record);
        }

        Ok(out)
    }
}
