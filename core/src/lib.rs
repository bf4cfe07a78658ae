// crm-core/src/lib.rs

//! crm-core: the transactional batch-mutation engine for a small
//! business-records service (customers, products, orders).
//!
//! The engine governs how a request that creates or updates several related
//! records validates each one, decides what is atomic versus best-effort,
//! and reports per-record success or failure without losing committed work:
//!  - Typed candidate records (`NewCustomer`, `NewProduct`, `NewOrder`)
//!    validated by pure rule functions.
//!  - An injectable `Repository` boundary with an explicit atomic-scope
//!    primitive; storage is never touched directly by the rules.
//!  - A batch executor with two policies: best-effort-per-record (partial
//!    commit is the intended outcome) and all-or-nothing.
//!  - An order assembler that resolves references, derives the total, and
//!    persists the composite atomically.
//!  - Scheduled-job bodies: low-stock restocking and activity aggregation.

pub mod batch;
pub mod clock;
pub mod error;
pub mod model;
pub mod repository;
pub mod service;
pub mod validate;

// --- Re-exports for the Public API ---

pub use crate::batch::{BatchError, BatchOutcome, BatchPolicy};
pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::error::{CoreError, CoreResult};
pub use crate::model::{AssembledOrder, Customer, NewCustomer, NewOrder, NewProduct, Order, Product};
pub use crate::repository::{AtomicScope, MemoryRepository, Repository, ScopeFuture};
pub use crate::service::{ActivityReport, Crm, Restocked, RESTOCK_INCREMENT, RESTOCK_THRESHOLD};
