// tests/order_assembly_tests.rs
mod common;

use common::*;
use crm_core::{CoreError, NewOrder};
use rust_decimal_macros::dec;
use uuid::Uuid;

#[tokio::test]
async fn order_total_is_the_sum_of_resolved_prices_at_creation_time() {
  setup_tracing();
  let (crm, _repo) = new_crm();
  let customer = seed_customer(&crm, "Alice", "alice@example.com").await;
  let p1 = seed_product(&crm, "Widget", dec!(10.00), 5).await;
  let p2 = seed_product(&crm, "Gadget", dec!(15.50), 5).await;

  let order = crm
    .create_order(NewOrder {
      customer_id: customer.id,
      product_ids: vec![p1.id, p2.id],
      order_date: None,
    })
    .await
    .expect("valid order should be created");

  assert_eq!(order.total_amount, dec!(25.50));
  assert_eq!(order.product_ids, vec![p1.id, p2.id]);
  assert_eq!(order.customer_id, customer.id);
}

#[tokio::test]
async fn unknown_customer_fails_fast_naming_the_id_and_persists_nothing() {
  setup_tracing();
  let (crm, _repo) = new_crm();
  let ghost = Uuid::new_v4();

  let err = crm
    .create_order(NewOrder {
      customer_id: ghost,
      product_ids: vec![Uuid::new_v4()],
      order_date: None,
    })
    .await
    .expect_err("missing customer should be rejected");

  assert!(matches!(err, CoreError::NotFound { .. }));
  assert_eq!(err.to_string(), format!("Invalid customer ID: {}", ghost));
  assert!(crm.list_orders().await.expect("list should succeed").is_empty());
}

#[tokio::test]
async fn unresolved_product_ids_are_enumerated_and_nothing_is_persisted() {
  setup_tracing();
  let (crm, _repo) = new_crm();
  let customer = seed_customer(&crm, "Alice", "alice@example.com").await;
  let p1 = seed_product(&crm, "Widget", dec!(10.00), 5).await;
  let p2 = seed_product(&crm, "Gadget", dec!(15.50), 5).await;
  let ghost = Uuid::new_v4();

  let err = crm
    .create_order(NewOrder {
      customer_id: customer.id,
      product_ids: vec![p1.id, p2.id, ghost],
      order_date: None,
    })
    .await
    .expect_err("unresolved product should be rejected");

  assert_eq!(err.to_string(), format!("Invalid product IDs: {}", ghost));
  assert!(crm.list_orders().await.expect("list should succeed").is_empty());
}

#[tokio::test]
async fn order_date_defaults_to_the_clock_when_omitted() {
  setup_tracing();
  let instant = some_instant();
  let (crm, _repo) = new_crm_at(instant);
  let customer = seed_customer(&crm, "Alice", "alice@example.com").await;
  let p1 = seed_product(&crm, "Widget", dec!(10.00), 5).await;

  let order = crm
    .create_order(NewOrder {
      customer_id: customer.id,
      product_ids: vec![p1.id],
      order_date: None,
    })
    .await
    .expect("valid order should be created");

  assert_eq!(order.order_date, instant);
}

#[tokio::test]
async fn caller_supplied_order_date_wins_over_the_clock() {
  setup_tracing();
  let (crm, _repo) = new_crm_at(some_instant());
  let customer = seed_customer(&crm, "Alice", "alice@example.com").await;
  let p1 = seed_product(&crm, "Widget", dec!(10.00), 5).await;
  let supplied = some_instant() - chrono::Duration::days(3);

  let order = crm
    .create_order(NewOrder {
      customer_id: customer.id,
      product_ids: vec![p1.id],
      order_date: Some(supplied),
    })
    .await
    .expect("valid order should be created");

  assert_eq!(order.order_date, supplied);
}

#[tokio::test]
async fn total_is_not_recomputed_when_a_price_changes_later() {
  setup_tracing();
  let (crm, repo) = new_crm();
  let customer = seed_customer(&crm, "Alice", "alice@example.com").await;
  let p1 = seed_product(&crm, "Widget", dec!(10.00), 1).await;

  let order = crm
    .create_order(NewOrder {
      customer_id: customer.id,
      product_ids: vec![p1.id],
      order_date: None,
    })
    .await
    .expect("valid order should be created");
  assert_eq!(order.total_amount, dec!(10.00));

  // Mutate the product's stock (the only in-place mutation the engine does)
  // and re-read the order: the captured total is unchanged.
  use crm_core::Repository;
  repo.update_product_stock(p1.id, 50).await.expect("update should succeed");
  let orders = crm.list_orders().await.expect("list should succeed");
  assert_eq!(orders[0].total_amount, dec!(10.00));
}
