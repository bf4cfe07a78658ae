// crm-core/src/service/restock.rs

//! Scheduled bulk restock of low-inventory products.

use serde::Serialize;
use tracing::{info, instrument};

use crate::error::CoreResult;
use crate::model::Product;
use crate::repository::Repository;
use crate::service::Crm;

/// Products with stock strictly below this are selected for restocking.
pub const RESTOCK_THRESHOLD: i64 = 10;

/// Added to each selected product's stock. Kept at least as large as the
/// threshold so a single pass lifts every selected product out of the
/// selection range; re-running immediately then selects nothing.
pub const RESTOCK_INCREMENT: i64 = 10;

/// Result of a restock pass: the updated records plus a count-bearing
/// summary for the job log.
#[derive(Debug, Serialize)]
pub struct Restocked {
  pub updated: Vec<Product>,
  pub message: String,
}

impl Crm {
  /// Restocks with the default threshold and increment.
  pub async fn restock_low_stock(&self) -> CoreResult<Restocked> {
    self.restock_below(RESTOCK_THRESHOLD, RESTOCK_INCREMENT).await
  }

  /// Selects every product with `stock < threshold` and persists
  /// `stock + increment` for each, in repository order. Each update is its
  /// own unit; this is a best-effort bulk mutation over already-validated
  /// records, so there is nothing to roll back.
  #[instrument(skip(self), err(Display))]
  pub async fn restock_below(&self, threshold: i64, increment: i64) -> CoreResult<Restocked> {
    let low = self.repo.find_products_below_stock(threshold).await?;
    let mut updated = Vec::with_capacity(low.len());
    for product in low {
      updated.push(self.repo.update_product_stock(product.id, product.stock + increment).await?);
    }
    let message = format!("{} products updated successfully!", updated.len());
    info!(count = updated.len(), "restock pass finished");
    Ok(Restocked { updated, message })
  }
}
