//! NAT gateway collector.
//!
//! Two cost components per gateway: the hourly running charge over the
//! month, and processed data at the per-GB rate.

use super::{num, Collected, Collector, Context};
use crate::error::Result;
use crate::models::{bytes_to_gb, round2, Service};

pub struct NatGateways;

impl Collector for NatGateways {
    fn service(&self) -> Service {
        Service::NatGateway
    }

    fn collect(&self, cx: &Context<'_>) -> Result<Collected> {
        let gateways = cx.metrics.nat_gateways()?;

        let mut out = Collected::default();
        for nat in gateways {
            let instance_cost = cx.prices.nat_hours_per_month * cx.prices.nat_hourly;
            let data_gb = bytes_to_gb(nat.bytes_processed as f64);
            let data_cost = data_gb * cx.prices.nat_data_gb;

            let record = cx
                .record(
                    Service::NatGateway,
                    nat.nat_id.clone(),
                    instance_cost + data_cost,
                )
                .with_attr("nat_id", nat.nat_id)
                .with_attr("vpc_id", nat.vpc_id)
                .with_attr("instance_cost", num(round2(instance_cost)))
                .with_attr("data_gb", num(round2(data_gb)))
                .with_attr("data_cost", num(round2(data_cost)));
            out.push(record);
        }

        Ok(out)
    }
}
