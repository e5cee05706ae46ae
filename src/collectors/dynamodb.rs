//! DynamoDB table collector.
//!
//! Direct metric cost: stored bytes per table times the fixed
//! GB-month storage price. Table names are the trailing segment of the
//! inventory ARNs; a table whose size cannot be described is skipped.

use super::{arn_suffix, num, Collected, Collector, Context};
use crate::error::Result;
use crate::models::{bytes_to_gb, round2, Service};

pub struct DynamoDbTables;

impl Collector for DynamoDbTables {
    fn service(&self) -> Service {
        Service::DynamoDb
    }

    fn collect(&self, cx: &Context<'_>) -> Result<Collected> {
        let tables = cx
            .inventory
            .string_list_at(&cx.inventory_path("databases.dynamodb.resources"))?;

        let mut out = Collected::default();
        for table_arn in tables {
            let table_name = arn_suffix(&table_arn, "table/").to_string();
            match cx.metrics.table_size_bytes(&table_name) {
                Ok(bytes) => {
                    let size_gb = bytes_to_gb(bytes as f64);
                    let cost = size_gb * cx.prices.dynamodb_gb_month;
                    let record = cx
                        .record(Service::DynamoDb, table_name.clone(), cost)
                        .with_attr("table_name", table_name)
                        .with_attr("table_arn", table_arn)
                        .with_attr("size_gb", num(round2(size_gb)));
                    out.push(record);
                }
                Err(e) => out.skip(table_name, e),
            }
        }

        Ok(out)
    }
}
