// crm-core/src/model/customer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted customer record. `id` and `created_at` are assigned by the
/// repository on insert and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
  pub id: Uuid,
  pub name: String,
  /// Globally unique, compared case-sensitively.
  pub email: String,
  pub phone: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Candidate record for a customer pending validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
  pub name: String,
  pub email: String,
  #[serde(default)]
  pub phone: Option<String>,
}
