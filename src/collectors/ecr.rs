//! ECR repository collector.
//!
//! Direct metric cost: total image bytes per repository times the fixed
//! storage price per GB-month. Repository names from the inventory get
//! the configured environment prefix before lookup.

use super::{num, Collected, Collector, Context};
use crate::error::Result;
use crate::models::{bytes_to_gb, round2, Service};

pub struct EcrRepositories;

impl Collector for EcrRepositories {
    fn service(&self) -> Service {
        Service::Ecr
    }

    fn collect(&self, cx: &Context<'_>) -> Result<Collected> {
        let repos = cx
            .inventory
            .string_list_at(&cx.inventory_path("storage.ecr.resources"))?;

        let mut out = Collected::default();
        for repo in repos {
            let full_name = format!("{}{}", cx.ecr_repo_prefix, repo);
            match cx.metrics.repository_image_bytes(&full_name) {
                Ok(bytes) => {
                    let size_gb = bytes_to_gb(bytes as f64);
                    let cost = size_gb * cx.prices.ecr_gb_month;
                    let record = cx
                        .record(Service::Ecr, full_name.clone(), cost)
                        .with_attr("repository_name", full_name)
                        .with_attr("size_gb", num(round2(size_gb)));
                    out.push(record);
                }
                Err(e) => out.skip(full_name, e),
            }
        }

        Ok(out)
    }
}
