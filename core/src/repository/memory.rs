// crm-core/src/repository/memory.rs

//! In-memory [`Repository`] implementation.
//!
//! Serves as the test fake and the zero-setup demo store. Tables live behind
//! a `parking_lot::RwLock`; every guard is taken and released within a single
//! synchronous section and is never held across an `.await` point.
//!
//! Atomic scopes get snapshot isolation: the scope runs against a staged copy
//! of the tables which is swapped in wholesale on success and dropped on
//! failure, so concurrent readers never observe a partially applied unit.
//! A tokio mutex serializes writers against in-flight scopes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::model::{AssembledOrder, Customer, NewCustomer, NewProduct, Order, Product};
use crate::repository::{AtomicScope, Repository};

#[derive(Debug, Clone, Default)]
struct Tables {
  customers: Vec<Customer>,
  products: Vec<Product>,
  orders: Vec<Order>,
}

pub struct MemoryRepository {
  tables: Arc<RwLock<Tables>>,
  // Held for the duration of an atomic scope; plain writes take it briefly
  // so they cannot interleave with a staged snapshot swap.
  write_gate: Arc<AsyncMutex<()>>,
}

impl MemoryRepository {
  pub fn new() -> Self {
    MemoryRepository {
      tables: Arc::new(RwLock::new(Tables::default())),
      write_gate: Arc::new(AsyncMutex::new(())),
    }
  }

  fn staged_copy(&self) -> Self {
    MemoryRepository {
      tables: Arc::new(RwLock::new(self.tables.read().clone())),
      // Fresh gate: writes inside the scope target the staged tables only.
      write_gate: Arc::new(AsyncMutex::new(())),
    }
  }
}

impl Default for MemoryRepository {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Repository for MemoryRepository {
  async fn find_customer_by_email(&self, email: &str) -> CoreResult<Option<Customer>> {
    Ok(self.tables.read().customers.iter().find(|c| c.email == email).cloned())
  }

  async fn find_customer_by_id(&self, id: Uuid) -> CoreResult<Option<Customer>> {
    Ok(self.tables.read().customers.iter().find(|c| c.id == id).cloned())
  }

  async fn find_products_by_ids(&self, ids: &[Uuid]) -> CoreResult<Vec<Product>> {
    let tables = self.tables.read();
    Ok(tables.products.iter().filter(|p| ids.contains(&p.id)).cloned().collect())
  }

  async fn find_products_below_stock(&self, threshold: i64) -> CoreResult<Vec<Product>> {
    let tables = self.tables.read();
    Ok(tables.products.iter().filter(|p| p.stock < threshold).cloned().collect())
  }

  #[instrument(skip(self, draft), fields(email = %draft.email))]
  async fn insert_customer(&self, draft: NewCustomer) -> CoreResult<Customer> {
    let _gate = self.write_gate.lock().await;
    let mut tables = self.tables.write();
    // The durable uniqueness check: a raced pre-check still loses here.
    if tables.customers.iter().any(|c| c.email == draft.email) {
      return Err(CoreError::conflict(format!("Email already exists: {}", draft.email)));
    }
    let customer = Customer {
      id: Uuid::new_v4(),
      name: draft.name,
      email: draft.email,
      phone: draft.phone,
      created_at: Utc::now(),
    };
    tables.customers.push(customer.clone());
    debug!(customer_id = %customer.id, "customer inserted");
    Ok(customer)
  }

  #[instrument(skip(self, draft), fields(name = %draft.name))]
  async fn insert_product(&self, draft: NewProduct) -> CoreResult<Product> {
    let _gate = self.write_gate.lock().await;
    let stock = draft.stock_or_default();
    let product = Product {
      id: Uuid::new_v4(),
      name: draft.name,
      price: draft.price,
      stock,
    };
    self.tables.write().products.push(product.clone());
    debug!(product_id = %product.id, "product inserted");
    Ok(product)
  }

  #[instrument(skip(self, order, products), fields(customer_id = %order.customer_id))]
  async fn insert_order_with_associations(
    &self,
    order: AssembledOrder,
    products: &[Product],
  ) -> CoreResult<Order> {
    let _gate = self.write_gate.lock().await;
    let record = Order {
      id: Uuid::new_v4(),
      customer_id: order.customer_id,
      product_ids: products.iter().map(|p| p.id).collect(),
      total_amount: order.total_amount,
      order_date: order.order_date,
    };
    self.tables.write().orders.push(record.clone());
    debug!(order_id = %record.id, associations = record.product_ids.len(), "order inserted");
    Ok(record)
  }

  async fn update_product_stock(&self, id: Uuid, new_stock: i64) -> CoreResult<Product> {
    let _gate = self.write_gate.lock().await;
    let mut tables = self.tables.write();
    match tables.products.iter_mut().find(|p| p.id == id) {
      Some(product) => {
        product.stock = new_stock;
        Ok(product.clone())
      }
      None => Err(CoreError::not_found(format!("Product not found: {}", id))),
    }
  }

  async fn list_customers(&self) -> CoreResult<Vec<Customer>> {
    Ok(self.tables.read().customers.clone())
  }

  async fn list_products(&self) -> CoreResult<Vec<Product>> {
    Ok(self.tables.read().products.clone())
  }

  async fn list_orders(&self) -> CoreResult<Vec<Order>> {
    Ok(self.tables.read().orders.clone())
  }

  #[instrument(skip(self, scope))]
  async fn run_atomic(&self, scope: AtomicScope) -> CoreResult<()> {
    let _gate = self.write_gate.lock().await;
    let staged = self.staged_copy();
    scope(&staged).await?;
    let committed = staged.tables.read().clone();
    *self.tables.write() = committed;
    debug!("atomic scope committed");
    Ok(())
  }
}
