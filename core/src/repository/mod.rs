// crm-core/src/repository/mod.rs

//! The persistence boundary.
//!
//! Components above this module (validator, batch executor, services) never
//! touch storage directly; they are handed a `dyn Repository` and an atomic
//! scope primitive. Two implementations exist: [`memory::MemoryRepository`]
//! in this crate (the test fake and demo store) and the sqlx/Postgres store
//! in the server crate.

pub mod memory;

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::model::{AssembledOrder, Customer, NewCustomer, NewProduct, Order, Product};

pub use memory::MemoryRepository;

/// Future returned by an atomic scope, borrowing the transactional view it
/// was handed.
pub type ScopeFuture<'r> = Pin<Box<dyn Future<Output = CoreResult<()>> + Send + 'r>>;

/// A unit of work executed against a transactional view of the repository.
///
/// Every write issued through the view commits together with the rest of the
/// scope, or not at all. Results are handed out through captured state (the
/// scope owns everything it needs), which keeps [`Repository`] object-safe.
pub type AtomicScope = Box<dyn for<'r> FnOnce(&'r dyn Repository) -> ScopeFuture<'r> + Send>;

/// Lookup, insert, and atomic-scope operations the engine consumes.
///
/// Implementations must enforce email uniqueness durably: a validator
/// pre-check can always lose a race, and the loser must surface as
/// [`CoreError::Conflict`](crate::CoreError) from the insert itself.
#[async_trait]
pub trait Repository: Send + Sync {
  async fn find_customer_by_email(&self, email: &str) -> CoreResult<Option<Customer>>;

  async fn find_customer_by_id(&self, id: Uuid) -> CoreResult<Option<Customer>>;

  /// Returns only the resolvable products, in repository order. Callers
  /// compute the difference against what they asked for.
  async fn find_products_by_ids(&self, ids: &[Uuid]) -> CoreResult<Vec<Product>>;

  /// Products with stock strictly below `threshold`, in repository order.
  async fn find_products_below_stock(&self, threshold: i64) -> CoreResult<Vec<Product>>;

  /// Persists a customer, assigning its id and creation timestamp.
  async fn insert_customer(&self, draft: NewCustomer) -> CoreResult<Customer>;

  /// Persists a product, assigning its id.
  async fn insert_product(&self, draft: NewProduct) -> CoreResult<Product>;

  /// Persists an order and its product associations as one unit.
  async fn insert_order_with_associations(
    &self,
    order: AssembledOrder,
    products: &[Product],
  ) -> CoreResult<Order>;

  /// Overwrites a product's stock, returning the updated record.
  async fn update_product_stock(&self, id: Uuid, new_stock: i64) -> CoreResult<Product>;

  async fn list_customers(&self) -> CoreResult<Vec<Customer>>;

  async fn list_products(&self) -> CoreResult<Vec<Product>>;

  async fn list_orders(&self) -> CoreResult<Vec<Order>>;

  /// Runs `scope` against a transactional view: all writes issued inside
  /// commit together on `Ok`, or are rolled back entirely on `Err`.
  /// Concurrent readers never observe a partially applied scope.
  async fn run_atomic(&self, scope: AtomicScope) -> CoreResult<()>;
}
