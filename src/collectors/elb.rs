//! Network load balancer collector.
//!
//! Two cost components per balancer: the hourly base charge over the
//! month, and LCU-hours at the LCU rate, with one LCU equated to one GB
//! processed. Balancers are enumerated from the live metric source, not
//! the inventory.

use super::{num, Collected, Collector, Context};
use crate::error::Result;
use crate::models::{bytes_to_gb, round2, Service};

pub struct NetworkLoadBalancers;

impl Collector for NetworkLoadBalancers {
    fn service(&self) -> Service {
        Service::Elb
    }

    fn collect(&self, cx: &Context<'_>) -> Result<Collected> {
        let balancers = cx.metrics.load_balancers()?;

        let mut out = Collected::default();
        for lb in balancers {
            let hours = cx.prices.nlb_hours_per_month;
            let base_cost = hours * cx.prices.nlb_hourly;

            let processed_gb = bytes_to_gb(lb.processed_bytes as f64);
            let lcu_hours = processed_gb * hours;
            let lcu_cost = lcu_hours * cx.prices.nlb_lcu_hourly;

            let record = cx
                .record(Service::Elb, lb.name.clone(), base_cost + lcu_cost)
                .with_attr("name", lb.name)
                .with_attr("arn", lb.arn)
                .with_attr("vpc_id", lb.vpc_id)
                .with_attr("processed_gb", num(round2(processed_gb)))
                .with_attr("base_cost", num(round2(base_cost)))
                .with_attr("lcu_hours", num(round2(lcu_hours)))
                .with_attr("lcu_cost", num(round2(lcu_cost)));
            out.push(record);
        }

        Ok(out)
    }
}
