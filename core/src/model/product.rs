// crm-core/src/model/product.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted product record. Only `stock` is ever mutated after creation,
/// and only by the restocker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  /// Strictly positive.
  pub price: Decimal,
  /// Never negative.
  pub stock: i64,
}

/// Candidate record for a product pending validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
  pub name: String,
  pub price: Decimal,
  #[serde(default)]
  pub stock: Option<i64>,
}

impl NewProduct {
  /// Stock defaults to zero when the caller omits it.
  pub fn stock_or_default(&self) -> i64 {
    self.stock.unwrap_or(0)
  }
}
