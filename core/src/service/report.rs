// crm-core/src/service/report.rs

//! Activity aggregation for the scheduled report job. Formatting and
//! delivery of the report stay with the caller.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use crate::error::CoreResult;
use crate::repository::Repository;
use crate::service::Crm;

/// Totals over the persisted records: customer count, order count, and
/// revenue (sum of order totals as captured at order-creation time).
#[derive(Debug, Clone, Serialize)]
pub struct ActivityReport {
  pub customers: usize,
  pub orders: usize,
  pub revenue: Decimal,
}

impl Crm {
  #[instrument(skip(self), err(Display))]
  pub async fn activity_report(&self) -> CoreResult<ActivityReport> {
    let customers = self.repo.list_customers().await?.len();
    let orders = self.repo.list_orders().await?;
    let revenue: Decimal = orders.iter().map(|o| o.total_amount).sum();
    Ok(ActivityReport {
      customers,
      orders: orders.len(),
      revenue,
    })
  }
}
