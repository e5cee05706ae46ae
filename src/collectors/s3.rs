//! S3 bucket collector.
//!
//! Direct metric cost: total object bytes per bucket times the standard
//! storage price per GB-month. Bucket names are the trailing segment of
//! the inventory ARNs; a bucket that cannot be listed is skipped.

use super::{arn_suffix, num, Collected, Collector, Context};
use crate::error::Result;
use crate::models::{bytes_to_gb, round2, Service};

pub struct S3Buckets;

impl Collector for S3Buckets {
    fn service(&self) -> Service {
        Service::S3
    }

    fn collect(&self, cx: &Context<'_>) -> Result<Collected> {
        let buckets = cx
            .inventory
            .string_list_at(&cx.inventory_path("storage.s3.resources"))?;

        let mut out = Collected::default();
        for bucket_arn in buckets {
            let bucket_name = arn_suffix(&bucket_arn, ":").to_string();
            match cx.metrics.bucket_usage(&bucket_name) {
                Ok(usage) => {
                    let storage_gb = bytes_to_gb(usage.size_bytes as f64);
                    let cost = storage_gb * cx.prices.s3_gb_month;
                    let record = cx
                        .record(Service::S3, bucket_name.clone(), cost)
                        .with_attr("name", bucket_name)
                        .with_attr("arn", bucket_arn)
                        .with_attr("storage_gb", num(round2(storage_gb)))
                        .with_attr("total_objects", usage.object_count);
                    out.push(record);
                }
                Err(e) => out.skip(bucket_name, e),
            }
        }

        Ok(out)
    }
}
