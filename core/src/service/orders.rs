// crm-core/src/service/orders.rs

//! The order assembler: resolves a customer reference and a set of product
//! references, computes the derived total, and persists the composite order
//! atomically.

use std::sync::Arc;

use anyhow::anyhow;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::instrument;

use crate::error::{CoreError, CoreResult};
use crate::model::{AssembledOrder, NewOrder, Order};
use crate::repository::Repository;
use crate::service::Crm;
use crate::validate;

impl Crm {
  /// Assembles and persists an order.
  ///
  /// Resolution fails fast: an unknown customer id aborts before products
  /// are touched, and any unresolvable product id aborts with the explicit
  /// list of offenders. The total is the sum of the resolved products'
  /// prices at this moment; it is never recomputed later. The order and its
  /// associations commit as one atomic unit.
  #[instrument(
    skip(self, draft),
    fields(customer_id = %draft.customer_id, requested = draft.product_ids.len()),
    err(Display)
  )]
  pub async fn create_order(&self, draft: NewOrder) -> CoreResult<Order> {
    let customer = self
      .repo
      .find_customer_by_id(draft.customer_id)
      .await?
      .ok_or_else(|| CoreError::not_found(format!("Invalid customer ID: {}", draft.customer_id)))?;

    let resolved = self.repo.find_products_by_ids(&draft.product_ids).await?;
    validate::validate_order_products(&draft, &resolved)?;

    let total_amount: Decimal = resolved.iter().map(|p| p.price).sum();
    let order_date = draft.order_date.unwrap_or_else(|| self.clock.now());
    let assembled = AssembledOrder {
      customer_id: customer.id,
      total_amount,
      order_date,
    };

    let sink: Arc<Mutex<Option<Order>>> = Arc::new(Mutex::new(None));
    let collected = Arc::clone(&sink);
    self
      .repo
      .run_atomic(Box::new(move |tx| {
        Box::pin(async move {
          let order = tx.insert_order_with_associations(assembled, &resolved).await?;
          *collected.lock() = Some(order);
          Ok(())
        })
      }))
      .await?;

    let order = sink.lock().take();
    order.ok_or_else(|| CoreError::Infrastructure {
      source: anyhow!("order scope committed without yielding a record"),
    })
  }

  pub async fn list_orders(&self) -> CoreResult<Vec<Order>> {
    self.repo.list_orders().await
  }
}
