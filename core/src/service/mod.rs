// crm-core/src/service/mod.rs

//! The operations facade the API layer talks to.
//!
//! `Crm` owns nothing but its collaborators: the repository boundary and a
//! clock. Each operation lives in the module for its concern; they all meet
//! here as `impl Crm` blocks.

pub mod customers;
pub mod orders;
pub mod products;
pub mod report;
pub mod restock;

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::repository::Repository;

pub use report::ActivityReport;
pub use restock::{Restocked, RESTOCK_INCREMENT, RESTOCK_THRESHOLD};

/// Entry point for every core operation: mutations, queries, and the
/// scheduled-job bodies (restock, report aggregation).
#[derive(Clone)]
pub struct Crm {
  pub(crate) repo: Arc<dyn Repository>,
  pub(crate) clock: Arc<dyn Clock>,
}

impl Crm {
  pub fn new(repo: Arc<dyn Repository>) -> Self {
    Self::with_clock(repo, Arc::new(SystemClock))
  }

  /// Constructor for callers that supply their own clock (tests pin order
  /// dates with a fixed one).
  pub fn with_clock(repo: Arc<dyn Repository>, clock: Arc<dyn Clock>) -> Self {
    Crm { repo, clock }
  }
}
