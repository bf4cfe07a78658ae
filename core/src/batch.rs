// crm-core/src/batch.rs

//! The batch executor: drives validation + persistence for an ordered
//! sequence of candidate records under a chosen atomicity policy.
//!
//! The executor itself knows nothing about entity kinds; callers hand it an
//! `apply` step that validates one candidate against a repository view and
//! persists it. The executor owns ordering, per-record error capture, and
//! the atomic scope when the policy demands one.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::anyhow;
use parking_lot::Mutex;
use tracing::{event, span, Level};

use crate::error::{CoreError, CoreResult};
use crate::repository::Repository;

/// Atomicity policy for a batch of candidate records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPolicy {
  /// Each candidate is its own unit of persistence. A failure on record *i*
  /// is recorded against its position and does not prevent record *i+1*;
  /// already-committed records stay committed. Partial commit is the
  /// intended outcome, not a bug.
  BestEffort,
  /// The whole batch is one unit inside the repository's atomic scope. The
  /// first failure aborts and rolls back everything.
  AllOrNothing,
}

/// A per-record failure, tagged with the candidate's 1-based input position.
#[derive(Debug)]
pub struct BatchError {
  pub position: usize,
  pub reason: CoreError,
}

impl fmt::Display for BatchError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Record {}: {}", self.position, self.reason)
  }
}

/// Outcome of a batch execution: created records in candidate order, plus
/// per-record errors in candidate order. For best-effort batches both lists
/// can be non-empty at once; success and partial failure are not mutually
/// exclusive.
#[derive(Debug)]
pub struct BatchOutcome<T> {
  pub created: Vec<T>,
  pub errors: Vec<BatchError>,
}

impl<T> Default for BatchOutcome<T> {
  fn default() -> Self {
    BatchOutcome {
      created: Vec::new(),
      errors: Vec::new(),
    }
  }
}

impl<T> BatchOutcome<T> {
  /// Error strings in the caller-facing `Record {n}: {reason}` form.
  pub fn error_messages(&self) -> Vec<String> {
    self.errors.iter().map(BatchError::to_string).collect()
  }
}

/// Future returned by an `apply` step, borrowing the repository view it was
/// handed.
pub type ApplyFuture<'r, T> = Pin<Box<dyn Future<Output = CoreResult<T>> + Send + 'r>>;

/// Executes `candidates` in strict input order under `policy`.
///
/// `apply` validates and persists a single candidate against the given
/// repository view; it runs exactly once per candidate per execution, so an
/// already-persisted record is never persisted twice by re-running
/// validation. Under [`BatchPolicy::AllOrNothing`] the view is the atomic
/// scope's transactional one and the first `Err` aborts the whole unit;
/// under [`BatchPolicy::BestEffort`] the call itself only fails if the
/// outcome cannot be assembled at all, never because an individual record
/// was rejected.
pub async fn run_batch<C, T, F>(
  repo: &dyn Repository,
  candidates: Vec<C>,
  policy: BatchPolicy,
  apply: F,
) -> CoreResult<BatchOutcome<T>>
where
  C: Send + 'static,
  T: Send + 'static,
  F: for<'r> Fn(&'r dyn Repository, C) -> ApplyFuture<'r, T> + Send + Sync + 'static,
{
  let batch_span = span!(Level::INFO, "run_batch", ?policy, candidates = candidates.len());
  let _batch_guard = batch_span.enter();

  match policy {
    BatchPolicy::BestEffort => {
      let mut outcome = BatchOutcome::default();
      for (idx, candidate) in candidates.into_iter().enumerate() {
        let record_span = span!(Level::DEBUG, "batch_record", position = idx + 1);
        let _record_guard = record_span.enter();
        match apply(repo, candidate).await {
          Ok(record) => outcome.created.push(record),
          Err(reason) => {
            event!(Level::WARN, position = idx + 1, %reason, "record rejected, continuing batch");
            outcome.errors.push(BatchError { position: idx + 1, reason });
          }
        }
      }
      event!(
        Level::INFO,
        created = outcome.created.len(),
        errors = outcome.errors.len(),
        "best-effort batch finished"
      );
      Ok(outcome)
    }
    BatchPolicy::AllOrNothing => {
      let sink: Arc<Mutex<Vec<T>>> = Arc::new(Mutex::new(Vec::new()));
      let collected = Arc::clone(&sink);
      repo
        .run_atomic(Box::new(move |tx| {
          Box::pin(async move {
            for candidate in candidates {
              let record = apply(tx, candidate).await?;
              collected.lock().push(record);
            }
            Ok(())
          })
        }))
        .await?;
      let created = match Arc::try_unwrap(sink) {
        Ok(cell) => cell.into_inner(),
        // The scope has finished, so this arm only runs if the store kept a
        // clone of the closure alive; drain through the lock instead.
        Err(shared) => shared.lock().drain(..).collect(),
      };
      event!(Level::INFO, created = created.len(), "all-or-nothing batch committed");
      Ok(BatchOutcome {
        created,
        errors: Vec::new(),
      })
    }
  }
}

/// Runs a single candidate as an all-or-nothing unit and returns the one
/// created record.
pub async fn run_single<C, T, F>(repo: &dyn Repository, candidate: C, apply: F) -> CoreResult<T>
where
  C: Send + 'static,
  T: Send + 'static,
  F: for<'r> Fn(&'r dyn Repository, C) -> ApplyFuture<'r, T> + Send + Sync + 'static,
{
  let outcome = run_batch(repo, vec![candidate], BatchPolicy::AllOrNothing, apply).await?;
  outcome.created.into_iter().next().ok_or_else(|| CoreError::Infrastructure {
    source: anyhow!("atomic unit committed without yielding a record"),
  })
}
