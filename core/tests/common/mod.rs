// tests/common/mod.rs
#![allow(dead_code)] // Allow unused helpers in this common test module

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use crm_core::{Crm, Customer, FixedClock, MemoryRepository, NewCustomer, NewProduct, Product};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tracing::Level;

// --- Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Fixtures ---

/// A service over a fresh in-memory store, plus the store itself for direct
/// inspection of persisted state.
pub fn new_crm() -> (Crm, Arc<MemoryRepository>) {
  let repo = Arc::new(MemoryRepository::new());
  (Crm::new(repo.clone()), repo)
}

/// Same, but with order dates pinned to `instant`.
pub fn new_crm_at(instant: DateTime<Utc>) -> (Crm, Arc<MemoryRepository>) {
  let repo = Arc::new(MemoryRepository::new());
  (Crm::with_clock(repo.clone(), Arc::new(FixedClock(instant))), repo)
}

pub fn some_instant() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).single().expect("valid fixture instant")
}

pub fn customer_draft(name: &str, email: &str) -> NewCustomer {
  NewCustomer {
    name: name.to_string(),
    email: email.to_string(),
    phone: None,
  }
}

pub fn customer_draft_with_phone(name: &str, email: &str, phone: &str) -> NewCustomer {
  NewCustomer {
    phone: Some(phone.to_string()),
    ..customer_draft(name, email)
  }
}

pub fn product_draft(name: &str, price: Decimal, stock: Option<i64>) -> NewProduct {
  NewProduct {
    name: name.to_string(),
    price,
    stock,
  }
}

pub async fn seed_customer(crm: &Crm, name: &str, email: &str) -> Customer {
  crm
    .create_customer(customer_draft(name, email))
    .await
    .expect("seeding a valid customer should succeed")
}

pub async fn seed_product(crm: &Crm, name: &str, price: Decimal, stock: i64) -> Product {
  crm
    .create_product(product_draft(name, price, Some(stock)))
    .await
    .expect("seeding a valid product should succeed")
}
