// crm-core/src/validate.rs

//! Per-record validation rules.
//!
//! Every function here is pure: the facts a rule needs from storage (the
//! current holder of an email, the resolved subset of a product-id set) are
//! looked up by the calling service and passed in. Re-running a check on the
//! same inputs always yields the same result, and a failing record is
//! reported as an error value rather than anything that could abort sibling
//! validation in a batch.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::model::{Customer, NewCustomer, NewOrder, NewProduct, Product};

/// Accepted phone shapes: international (`+` then 10-15 digits) or local
/// dashed (`123-456-7890`). Anything else is rejected.
static PHONE_SHAPES: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^(\+\d{10,15}|\d{3}-\d{3}-\d{4})$").expect("phone pattern is valid"));

/// Checks a customer candidate against structural rules and the uniqueness
/// pre-check. `email_holder` is the persisted customer currently holding the
/// candidate's email, if any, as resolved by the caller.
pub fn validate_customer(draft: &NewCustomer, email_holder: Option<&Customer>) -> CoreResult<()> {
  if draft.name.trim().is_empty() {
    return Err(CoreError::validation("Name is required."));
  }
  if draft.email.trim().is_empty() {
    return Err(CoreError::validation("Email is required."));
  }
  if email_holder.is_some() {
    return Err(CoreError::validation(format!("Email already exists: {}", draft.email)));
  }
  if let Some(phone) = &draft.phone {
    if !PHONE_SHAPES.is_match(phone) {
      return Err(CoreError::validation(format!("Invalid phone format: {}", phone)));
    }
  }
  Ok(())
}

/// Checks a product candidate: non-empty name, strictly positive price,
/// non-negative stock (stock defaults to zero when omitted).
pub fn validate_product(draft: &NewProduct) -> CoreResult<()> {
  if draft.name.trim().is_empty() {
    return Err(CoreError::validation("Name is required."));
  }
  if draft.price <= Decimal::ZERO {
    return Err(CoreError::validation("Price must be positive."));
  }
  if draft.stock_or_default() < 0 {
    return Err(CoreError::validation("Stock cannot be negative."));
  }
  Ok(())
}

/// Checks an order candidate's product reference set against the subset the
/// repository could resolve. The set must be non-empty, and a failure
/// enumerates exactly the ids that did not resolve, in request order.
pub fn validate_order_products(draft: &NewOrder, resolved: &[Product]) -> CoreResult<()> {
  if draft.product_ids.is_empty() {
    return Err(CoreError::validation("At least one product is required."));
  }
  let missing = unresolved_ids(&draft.product_ids, resolved);
  if !missing.is_empty() {
    let listed: Vec<String> = missing.iter().map(Uuid::to_string).collect();
    return Err(CoreError::validation(format!("Invalid product IDs: {}", listed.join(", "))));
  }
  Ok(())
}

// Set difference between requested and resolved ids, de-duplicated,
// preserving request order.
fn unresolved_ids(requested: &[Uuid], resolved: &[Product]) -> Vec<Uuid> {
  let mut missing = Vec::new();
  for id in requested {
    if !resolved.iter().any(|p| p.id == *id) && !missing.contains(id) {
      missing.push(*id);
    }
  }
  missing
}
