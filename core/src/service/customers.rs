// crm-core/src/service/customers.rs

//! Customer creation: the single all-or-nothing form and the best-effort
//! bulk form share one apply step, so both run the same validation and the
//! same uniqueness pre-check against persisted state.

use tracing::instrument;

use crate::batch::{self, ApplyFuture, BatchOutcome, BatchPolicy};
use crate::error::CoreResult;
use crate::model::{Customer, NewCustomer};
use crate::repository::Repository;
use crate::service::Crm;
use crate::validate;

impl Crm {
  /// Creates one customer, or persists nothing.
  #[instrument(skip(self, draft), fields(email = %draft.email), err(Display))]
  pub async fn create_customer(&self, draft: NewCustomer) -> CoreResult<Customer> {
    batch::run_single(&*self.repo, draft, apply_customer).await
  }

  /// Creates customers best-effort, in input order. The outcome carries the
  /// created subset plus a `Record {n}: {reason}` entry per rejected
  /// candidate; a rejection never rolls back earlier records.
  ///
  /// Each record commits before the next is validated, so the second
  /// occurrence of an email inside one batch fails its uniqueness pre-check
  /// like any other duplicate.
  #[instrument(skip(self, drafts), fields(candidates = drafts.len()))]
  pub async fn bulk_create_customers(&self, drafts: Vec<NewCustomer>) -> CoreResult<BatchOutcome<Customer>> {
    batch::run_batch(&*self.repo, drafts, BatchPolicy::BestEffort, apply_customer).await
  }

  pub async fn list_customers(&self) -> CoreResult<Vec<Customer>> {
    self.repo.list_customers().await
  }
}

// One candidate: uniqueness pre-check, structural rules, insert. The insert
// re-enforces uniqueness durably, so a raced pre-check still loses cleanly.
fn apply_customer(repo: &dyn Repository, draft: NewCustomer) -> ApplyFuture<'_, Customer> {
  Box::pin(async move {
    let holder = repo.find_customer_by_email(&draft.email).await?;
    validate::validate_customer(&draft, holder.as_ref())?;
    repo.insert_customer(draft).await
  })
}
