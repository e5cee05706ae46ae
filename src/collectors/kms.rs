//! KMS key collector.
//!
//! Two cost components per key: the flat monthly key charge plus the
//! metered request charge per ten thousand requests. Keys with no
//! recorded requests still carry the flat charge.

use super::{arn_suffix, num, Collected, Collector, Context};
use crate::error::Result;
use crate::models::{round2, Service};

pub struct KmsKeys;

impl Collector for KmsKeys {
    fn service(&self) -> Service {
        Service::Kms
    }

    fn collect(&self, cx: &Context<'_>) -> Result<Collected> {
        let keys = cx
            .inventory
            .string_list_at(&cx.inventory_path("security.kms.resources"))?;

        let mut out = Collected::default();
        for key_arn in keys {
            let key_id = arn_suffix(&key_arn, "key/").to_string();
            match cx.metrics.kms_request_count(&key_id) {
                Ok(request_count) => {
                    let request_cost =
                        (request_count / 10_000.0) * cx.prices.kms_per_10k_requests;
                    let total = cx.prices.kms_key_month + request_cost;
                    let record = cx
                        .record(Service::Kms, key_id.clone(), total)
                        .with_attr("key_id", key_id)
                        .with_attr("key_arn", key_arn)
                        .with_attr("request_count", num(request_count.trunc()))
                        .with_attr("request_cost", num(round2(request_cost)))
                        .with_attr("key_cost", num(cx.prices.kms_key_month));
                    out.push(record);
                }
                Err(e) => out.skip(key_id, e),
            }
        }

        Ok(out)
    }
}
