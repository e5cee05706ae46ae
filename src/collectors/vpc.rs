//! VPC network-cost collector.
//!
//! Two cost components per VPC: VPN connection hours at the hourly
//! rate, and data egressed from the VPC's instances at the per-GB rate.
//! Both metrics read as zero when nothing is recorded, so a quiet VPC
//! yields a zero-cost record rather than disappearing.

use super::{arn_suffix, num, Collected, Collector, Context};
use crate::error::Result;
use crate::models::{bytes_to_gb, round2, Service};

pub struct VpcNetwork;

impl Collector for VpcNetwork {
    fn service(&self) -> Service {
        Service::Vpc
    }

    fn collect(&self, cx: &Context<'_>) -> Result<Collected> {
        let vpcs = cx
            .inventory
            .string_list_at(&cx.inventory_path("networking.vpc.resources"))?;

        let mut out = Collected::default();
        for vpc_arn in vpcs {
            let vpc_id = arn_suffix(&vpc_arn, "vpc/").to_string();

            let egress_bytes = cx.metrics.vpc_egress_bytes(&vpc_id)?;
            let vpn_connections = cx.metrics.vpc_vpn_connections(&vpc_id)?;

            let vpn_hours = vpn_connections as f64 * cx.prices.vpn_hours_per_month;
            let vpn_cost = vpn_hours * cx.prices.vpn_connection_hourly;
            let data_transfer_gb = bytes_to_gb(egress_bytes);
            let data_transfer_cost = data_transfer_gb * cx.prices.vpc_egress_gb;

            let record = cx
                .record(Service::Vpc, vpc_id.clone(), vpn_cost + data_transfer_cost)
                .with_attr("vpc_id", vpc_id)
                .with_attr("vpc_arn", vpc_arn)
                .with_attr("vpn_connections", vpn_connections)
                .with_attr("data_transfer_gb", num(round2(data_transfer_gb)))
                .with_attr("data_transfer_cost", num(round2(data_transfer_cost)))
                .with_attr("vpn_cost", num(round2(vpn_cost)));
            out.push(record);
        }

        Ok(out)
    }
}
