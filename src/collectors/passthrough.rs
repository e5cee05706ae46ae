//! Flat pass-through collector.
//!
//! Some services (API Gateway, WAF, Route 53, SQS) have no constituent
//! resources to allocate across: the billed total is the whole story.
//! One parameterized collector emits a single record per service; the
//! registry instantiates it once per flat service.

use super::{Collected, Collector, Context};
use crate::error::Result;
use crate::models::Service;

pub struct FlatTotal {
    service: Service,
}

impl FlatTotal {
    pub fn new(service: Service) -> Self {
        Self { service }
    }
}

impl Collector for FlatTotal {
    fn service(&self) -> Service {
        self.service
    }

    fn collect(&self, cx: &Context<'_>) -> Result<Collected> {
        let total_cost = cx.billing.total_cost(self.service.billing_label())?;

        let mut out = Collected::default();
        out.push(cx.record(self.service, self.service.label(), total_cost));
        Ok(out)
    }
}
