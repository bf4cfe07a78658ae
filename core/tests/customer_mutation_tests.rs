// tests/customer_mutation_tests.rs
mod common;

use common::*;
use crm_core::CoreError;

#[tokio::test]
async fn create_customer_assigns_id_and_keeps_fields() {
  setup_tracing();
  let (crm, _repo) = new_crm();

  let created = crm
    .create_customer(customer_draft_with_phone("Alice", "alice@example.com", "+1234567890"))
    .await
    .expect("valid customer should be created");

  assert_eq!(created.name, "Alice");
  assert_eq!(created.email, "alice@example.com");
  assert_eq!(created.phone.as_deref(), Some("+1234567890"));

  let listed = crm.list_customers().await.expect("list should succeed");
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].id, created.id);
}

#[tokio::test]
async fn create_customer_with_taken_email_persists_nothing() {
  setup_tracing();
  let (crm, _repo) = new_crm();
  seed_customer(&crm, "Alice", "alice@example.com").await;

  let err = crm
    .create_customer(customer_draft("Impostor", "alice@example.com"))
    .await
    .expect_err("duplicate email should be rejected");

  assert_eq!(err.to_string(), "Email already exists: alice@example.com");
  assert_eq!(crm.list_customers().await.expect("list should succeed").len(), 1);
}

#[tokio::test]
async fn create_customer_with_bad_phone_is_rejected() {
  setup_tracing();
  let (crm, _repo) = new_crm();

  let err = crm
    .create_customer(customer_draft_with_phone("Alice", "alice@example.com", "555-0100"))
    .await
    .expect_err("bad phone should be rejected");

  assert!(matches!(err, CoreError::Validation { .. }));
  assert_eq!(err.to_string(), "Invalid phone format: 555-0100");
  assert!(crm.list_customers().await.expect("list should succeed").is_empty());
}

#[tokio::test]
async fn bulk_create_reports_partial_success_in_input_order() {
  setup_tracing();
  let (crm, _repo) = new_crm();
  seed_customer(&crm, "Bob", "bob@example.com").await;

  let outcome = crm
    .bulk_create_customers(vec![
      customer_draft("Alice", "alice@example.com"),
      customer_draft("Bob Again", "bob@example.com"), // duplicate of the seeded email
      customer_draft("Carol", "carol@example.com"),
    ])
    .await
    .expect("best-effort batches do not fail outright");

  assert_eq!(outcome.created.len(), 2);
  assert_eq!(outcome.created[0].name, "Alice");
  assert_eq!(outcome.created[1].name, "Carol");
  assert_eq!(outcome.error_messages(), vec!["Record 2: Email already exists: bob@example.com"]);

  // The failure in the middle rolled nothing back.
  let emails: Vec<String> = crm
    .list_customers()
    .await
    .expect("list should succeed")
    .into_iter()
    .map(|c| c.email)
    .collect();
  assert_eq!(
    emails,
    vec!["bob@example.com", "alice@example.com", "carol@example.com"]
  );
}

#[tokio::test]
async fn bulk_create_rejects_the_second_occurrence_of_an_email_within_one_batch() {
  setup_tracing();
  let (crm, _repo) = new_crm();

  let outcome = crm
    .bulk_create_customers(vec![
      customer_draft("First", "shared@example.com"),
      customer_draft("Second", "shared@example.com"),
    ])
    .await
    .expect("best-effort batches do not fail outright");

  // The first record committed before the second was validated, so the
  // duplicate loses the ordinary uniqueness pre-check.
  assert_eq!(outcome.created.len(), 1);
  assert_eq!(outcome.created[0].name, "First");
  assert_eq!(outcome.error_messages(), vec!["Record 2: Email already exists: shared@example.com"]);
}

#[tokio::test]
async fn bulk_create_collects_every_kind_of_rejection_with_positions() {
  setup_tracing();
  let (crm, _repo) = new_crm();

  let outcome = crm
    .bulk_create_customers(vec![
      customer_draft_with_phone("Alice", "alice@example.com", "123-456-7890"),
      customer_draft_with_phone("Bad Phone", "bp@example.com", "not-a-phone"),
      customer_draft("", "noname@example.com"),
      customer_draft("Dave", "dave@example.com"),
    ])
    .await
    .expect("best-effort batches do not fail outright");

  assert_eq!(outcome.created.len(), 2);
  assert_eq!(
    outcome.error_messages(),
    vec![
      "Record 2: Invalid phone format: not-a-phone",
      "Record 3: Name is required.",
    ]
  );
}
