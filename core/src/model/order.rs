// crm-core/src/model/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted order: one customer, one-or-more product associations, and a
/// total captured at creation time.
///
/// `total_amount` equals the sum of the associated products' prices as they
/// existed when the order was assembled; it is never recomputed when a price
/// later changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
  pub id: Uuid,
  pub customer_id: Uuid,
  pub product_ids: Vec<Uuid>,
  pub total_amount: Decimal,
  pub order_date: DateTime<Utc>,
}

/// Candidate record for an order pending reference resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
  pub customer_id: Uuid,
  pub product_ids: Vec<Uuid>,
  /// Defaults to the clock collaborator's now when omitted.
  #[serde(default)]
  pub order_date: Option<DateTime<Utc>>,
}

/// An order whose references have been resolved and whose total has been
/// computed, ready for atomic persistence together with its associations.
#[derive(Debug, Clone)]
pub struct AssembledOrder {
  pub customer_id: Uuid,
  pub total_amount: Decimal,
  pub order_date: DateTime<Utc>,
}
