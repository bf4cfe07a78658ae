// tests/restock_report_tests.rs
mod common;

use common::*;
use crm_core::NewOrder;
use rust_decimal_macros::dec;

#[tokio::test]
async fn restock_lifts_exactly_the_below_threshold_products() {
  setup_tracing();
  let (crm, _repo) = new_crm();
  let low_a = seed_product(&crm, "Bolts", dec!(1.00), 3).await;
  let low_b = seed_product(&crm, "Nuts", dec!(1.00), 9).await;
  let at_threshold = seed_product(&crm, "Washers", dec!(1.00), 10).await;
  let plenty = seed_product(&crm, "Screws", dec!(1.00), 15).await;

  let restocked = crm.restock_low_stock().await.expect("restock should succeed");

  assert_eq!(restocked.message, "2 products updated successfully!");
  let updated_ids: Vec<_> = restocked.updated.iter().map(|p| p.id).collect();
  assert_eq!(updated_ids, vec![low_a.id, low_b.id]);
  assert_eq!(restocked.updated[0].stock, 13);
  assert_eq!(restocked.updated[1].stock, 19);

  // Untouched records keep their stock.
  let products = crm.list_products().await.expect("list should succeed");
  let stock_of = |id| products.iter().find(|p| p.id == id).map(|p| p.stock);
  assert_eq!(stock_of(at_threshold.id), Some(10));
  assert_eq!(stock_of(plenty.id), Some(15));
}

#[tokio::test]
async fn an_immediate_second_restock_selects_nothing() {
  setup_tracing();
  let (crm, _repo) = new_crm();
  seed_product(&crm, "Bolts", dec!(1.00), 3).await;
  seed_product(&crm, "Nuts", dec!(1.00), 9).await;

  let first = crm.restock_low_stock().await.expect("restock should succeed");
  assert_eq!(first.message, "2 products updated successfully!");

  let second = crm.restock_low_stock().await.expect("restock should succeed");
  assert!(second.updated.is_empty());
  assert_eq!(second.message, "0 products updated successfully!");
}

#[tokio::test]
async fn restock_with_a_custom_threshold_and_increment() {
  setup_tracing();
  let (crm, _repo) = new_crm();
  seed_product(&crm, "Bolts", dec!(1.00), 0).await;
  seed_product(&crm, "Nuts", dec!(1.00), 4).await;

  let restocked = crm.restock_below(5, 20).await.expect("restock should succeed");
  assert_eq!(restocked.message, "2 products updated successfully!");
  assert_eq!(restocked.updated[0].stock, 20);
  assert_eq!(restocked.updated[1].stock, 24);
}

#[tokio::test]
async fn activity_report_counts_records_and_sums_captured_totals() {
  setup_tracing();
  let (crm, _repo) = new_crm();
  let alice = seed_customer(&crm, "Alice", "alice@example.com").await;
  seed_customer(&crm, "Bob", "bob@example.com").await;
  let p1 = seed_product(&crm, "Widget", dec!(10.00), 5).await;
  let p2 = seed_product(&crm, "Gadget", dec!(15.50), 5).await;

  for product_ids in [vec![p1.id], vec![p1.id, p2.id]] {
    crm
      .create_order(NewOrder {
        customer_id: alice.id,
        product_ids,
        order_date: None,
      })
      .await
      .expect("valid order should be created");
  }

  let report = crm.activity_report().await.expect("report should succeed");
  assert_eq!(report.customers, 2);
  assert_eq!(report.orders, 2);
  assert_eq!(report.revenue, dec!(35.50));
}

#[tokio::test]
async fn activity_report_over_an_empty_store_is_all_zeroes() {
  setup_tracing();
  let (crm, _repo) = new_crm();

  let report = crm.activity_report().await.expect("report should succeed");
  assert_eq!(report.customers, 0);
  assert_eq!(report.orders, 0);
  assert_eq!(report.revenue, rust_decimal::Decimal::ZERO);
}
