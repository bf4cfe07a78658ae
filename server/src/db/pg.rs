// crm-server/src/db/pg.rs

//! sqlx/Postgres implementation of the core `Repository` boundary.
//!
//! Queries are runtime-checked (`sqlx::query_as` with `FromRow` row structs,
//! no compile-time database requirement). Row structs are private to this
//! module and convert into core records at the edge.
//!
//! Atomic scopes map onto real transactions: `run_atomic` begins one on the
//! pool and hands the scope a view whose every query runs on that
//! transaction's connection; commit on `Ok`, rollback on `Err`. The unique
//! index on `customers.email` is the durable uniqueness check — a raced
//! validator pre-check loses here and surfaces as a conflict.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crm_core::{
  AssembledOrder, AtomicScope, CoreError, CoreResult, Customer, NewCustomer, NewProduct, Order, Product, Repository,
};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use sqlx::{FromRow, PgConnection, Postgres, Transaction};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, instrument};
use uuid::Uuid;

pub struct PgRepository {
  pool: PgPool,
}

impl PgRepository {
  pub fn new(pool: PgPool) -> Self {
    PgRepository { pool }
  }
}

// --- Row structs (database shape) ---

#[derive(Debug, FromRow)]
struct CustomerRow {
  id: Uuid,
  name: String,
  email: String,
  phone: Option<String>,
  created_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
  fn from(row: CustomerRow) -> Self {
    Customer {
      id: row.id,
      name: row.name,
      email: row.email,
      phone: row.phone,
      created_at: row.created_at,
    }
  }
}

#[derive(Debug, FromRow)]
struct ProductRow {
  id: Uuid,
  name: String,
  price: Decimal,
  stock: i64,
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    Product {
      id: row.id,
      name: row.name,
      price: row.price,
      stock: row.stock,
    }
  }
}

#[derive(Debug, FromRow)]
struct OrderRow {
  id: Uuid,
  customer_id: Uuid,
  total_amount: Decimal,
  order_date: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct AssociationRow {
  order_id: Uuid,
  product_id: Uuid,
}

// --- Error mapping ---

fn infra(err: sqlx::Error) -> CoreError {
  CoreError::Infrastructure {
    source: anyhow::Error::new(err),
  }
}

// Postgres unique_violation on the email index becomes the engine's conflict
// kind; everything else is an infrastructure fault.
fn map_insert_customer_err(err: sqlx::Error, email: &str) -> CoreError {
  if let sqlx::Error::Database(db_err) = &err {
    if db_err.code().as_deref() == Some("23505") {
      return CoreError::conflict(format!("Email already exists: {}", email));
    }
  }
  infra(err)
}

// --- Queries, shared between the pool-backed store and transactional views ---

async fn find_customer_by_email_on(conn: &mut PgConnection, email: &str) -> CoreResult<Option<Customer>> {
  let row: Option<CustomerRow> =
    sqlx::query_as("SELECT id, name, email, phone, created_at FROM customers WHERE email = $1")
      .bind(email)
      .fetch_optional(conn)
      .await
      .map_err(infra)?;
  Ok(row.map(Customer::from))
}

async fn find_customer_by_id_on(conn: &mut PgConnection, id: Uuid) -> CoreResult<Option<Customer>> {
  let row: Option<CustomerRow> =
    sqlx::query_as("SELECT id, name, email, phone, created_at FROM customers WHERE id = $1")
      .bind(id)
      .fetch_optional(conn)
      .await
      .map_err(infra)?;
  Ok(row.map(Customer::from))
}

async fn find_products_by_ids_on(conn: &mut PgConnection, ids: &[Uuid]) -> CoreResult<Vec<Product>> {
  let rows: Vec<ProductRow> = sqlx::query_as("SELECT id, name, price, stock FROM products WHERE id = ANY($1)")
    .bind(ids)
    .fetch_all(conn)
    .await
    .map_err(infra)?;
  Ok(rows.into_iter().map(Product::from).collect())
}

async fn find_products_below_stock_on(conn: &mut PgConnection, threshold: i64) -> CoreResult<Vec<Product>> {
  let rows: Vec<ProductRow> =
    sqlx::query_as("SELECT id, name, price, stock FROM products WHERE stock < $1 ORDER BY name ASC")
      .bind(threshold)
      .fetch_all(conn)
      .await
      .map_err(infra)?;
  Ok(rows.into_iter().map(Product::from).collect())
}

async fn insert_customer_on(conn: &mut PgConnection, draft: &NewCustomer) -> CoreResult<Customer> {
  let row: CustomerRow = sqlx::query_as(
    "INSERT INTO customers (id, name, email, phone, created_at) VALUES ($1, $2, $3, $4, now()) \
     RETURNING id, name, email, phone, created_at",
  )
  .bind(Uuid::new_v4())
  .bind(&draft.name)
  .bind(&draft.email)
  .bind(&draft.phone)
  .fetch_one(conn)
  .await
  .map_err(|e| map_insert_customer_err(e, &draft.email))?;
  debug!(customer_id = %row.id, "customer inserted");
  Ok(row.into())
}

async fn insert_product_on(conn: &mut PgConnection, draft: &NewProduct) -> CoreResult<Product> {
  let row: ProductRow = sqlx::query_as(
    "INSERT INTO products (id, name, price, stock) VALUES ($1, $2, $3, $4) RETURNING id, name, price, stock",
  )
  .bind(Uuid::new_v4())
  .bind(&draft.name)
  .bind(draft.price)
  .bind(draft.stock_or_default())
  .fetch_one(conn)
  .await
  .map_err(infra)?;
  debug!(product_id = %row.id, "product inserted");
  Ok(row.into())
}

async fn insert_order_on(conn: &mut PgConnection, order: &AssembledOrder, products: &[Product]) -> CoreResult<Order> {
  let row: OrderRow = sqlx::query_as(
    "INSERT INTO orders (id, customer_id, total_amount, order_date) VALUES ($1, $2, $3, $4) \
     RETURNING id, customer_id, total_amount, order_date",
  )
  .bind(Uuid::new_v4())
  .bind(order.customer_id)
  .bind(order.total_amount)
  .bind(order.order_date)
  .fetch_one(&mut *conn)
  .await
  .map_err(infra)?;

  for product in products {
    sqlx::query("INSERT INTO order_products (order_id, product_id) VALUES ($1, $2)")
      .bind(row.id)
      .bind(product.id)
      .execute(&mut *conn)
      .await
      .map_err(infra)?;
  }

  debug!(order_id = %row.id, associations = products.len(), "order inserted");
  Ok(Order {
    id: row.id,
    customer_id: row.customer_id,
    product_ids: products.iter().map(|p| p.id).collect(),
    total_amount: row.total_amount,
    order_date: row.order_date,
  })
}

async fn update_product_stock_on(conn: &mut PgConnection, id: Uuid, new_stock: i64) -> CoreResult<Product> {
  let row: Option<ProductRow> =
    sqlx::query_as("UPDATE products SET stock = $2 WHERE id = $1 RETURNING id, name, price, stock")
      .bind(id)
      .bind(new_stock)
      .fetch_optional(conn)
      .await
      .map_err(infra)?;
  match row {
    Some(row) => Ok(row.into()),
    None => Err(CoreError::not_found(format!("Product not found: {}", id))),
  }
}

async fn list_customers_on(conn: &mut PgConnection) -> CoreResult<Vec<Customer>> {
  let rows: Vec<CustomerRow> =
    sqlx::query_as("SELECT id, name, email, phone, created_at FROM customers ORDER BY created_at ASC")
      .fetch_all(conn)
      .await
      .map_err(infra)?;
  Ok(rows.into_iter().map(Customer::from).collect())
}

async fn list_products_on(conn: &mut PgConnection) -> CoreResult<Vec<Product>> {
  let rows: Vec<ProductRow> = sqlx::query_as("SELECT id, name, price, stock FROM products ORDER BY name ASC")
    .fetch_all(conn)
    .await
    .map_err(infra)?;
  Ok(rows.into_iter().map(Product::from).collect())
}

async fn list_orders_on(conn: &mut PgConnection) -> CoreResult<Vec<Order>> {
  let rows: Vec<OrderRow> =
    sqlx::query_as("SELECT id, customer_id, total_amount, order_date FROM orders ORDER BY order_date ASC")
      .fetch_all(&mut *conn)
      .await
      .map_err(infra)?;

  let order_ids: Vec<Uuid> = rows.iter().map(|o| o.id).collect();
  let associations: Vec<AssociationRow> =
    sqlx::query_as("SELECT order_id, product_id FROM order_products WHERE order_id = ANY($1)")
      .bind(&order_ids)
      .fetch_all(&mut *conn)
      .await
      .map_err(infra)?;

  let mut products_by_order: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
  for assoc in associations {
    products_by_order.entry(assoc.order_id).or_default().push(assoc.product_id);
  }

  Ok(
    rows
      .into_iter()
      .map(|row| Order {
        product_ids: products_by_order.remove(&row.id).unwrap_or_default(),
        id: row.id,
        customer_id: row.customer_id,
        total_amount: row.total_amount,
        order_date: row.order_date,
      })
      .collect(),
  )
}

// --- Pool-backed store ---

#[async_trait]
impl Repository for PgRepository {
  async fn find_customer_by_email(&self, email: &str) -> CoreResult<Option<Customer>> {
    let mut conn = self.pool.acquire().await.map_err(infra)?;
    find_customer_by_email_on(&mut conn, email).await
  }

  async fn find_customer_by_id(&self, id: Uuid) -> CoreResult<Option<Customer>> {
    let mut conn = self.pool.acquire().await.map_err(infra)?;
    find_customer_by_id_on(&mut conn, id).await
  }

  async fn find_products_by_ids(&self, ids: &[Uuid]) -> CoreResult<Vec<Product>> {
    let mut conn = self.pool.acquire().await.map_err(infra)?;
    find_products_by_ids_on(&mut conn, ids).await
  }

  async fn find_products_below_stock(&self, threshold: i64) -> CoreResult<Vec<Product>> {
    let mut conn = self.pool.acquire().await.map_err(infra)?;
    find_products_below_stock_on(&mut conn, threshold).await
  }

  async fn insert_customer(&self, draft: NewCustomer) -> CoreResult<Customer> {
    let mut conn = self.pool.acquire().await.map_err(infra)?;
    insert_customer_on(&mut conn, &draft).await
  }

  async fn insert_product(&self, draft: NewProduct) -> CoreResult<Product> {
    let mut conn = self.pool.acquire().await.map_err(infra)?;
    insert_product_on(&mut conn, &draft).await
  }

  // Called outside an explicit scope, the order and its associations still
  // commit as one unit: this opens its own transaction.
  async fn insert_order_with_associations(
    &self,
    order: AssembledOrder,
    products: &[Product],
  ) -> CoreResult<Order> {
    let mut tx = self.pool.begin().await.map_err(infra)?;
    let created = insert_order_on(&mut tx, &order, products).await?;
    tx.commit().await.map_err(infra)?;
    Ok(created)
  }

  async fn update_product_stock(&self, id: Uuid, new_stock: i64) -> CoreResult<Product> {
    let mut conn = self.pool.acquire().await.map_err(infra)?;
    update_product_stock_on(&mut conn, id, new_stock).await
  }

  async fn list_customers(&self) -> CoreResult<Vec<Customer>> {
    let mut conn = self.pool.acquire().await.map_err(infra)?;
    list_customers_on(&mut conn).await
  }

  async fn list_products(&self) -> CoreResult<Vec<Product>> {
    let mut conn = self.pool.acquire().await.map_err(infra)?;
    list_products_on(&mut conn).await
  }

  async fn list_orders(&self) -> CoreResult<Vec<Order>> {
    let mut conn = self.pool.acquire().await.map_err(infra)?;
    list_orders_on(&mut conn).await
  }

  #[instrument(skip(self, scope))]
  async fn run_atomic(&self, scope: AtomicScope) -> CoreResult<()> {
    let tx = self.pool.begin().await.map_err(infra)?;
    let view = PgTxRepository {
      tx: AsyncMutex::new(tx),
    };
    match scope(&view).await {
      Ok(()) => {
        view.tx.into_inner().commit().await.map_err(infra)?;
        debug!("atomic scope committed");
        Ok(())
      }
      Err(err) => {
        // Roll back explicitly; dropping the transaction would too, but the
        // error path should not also hide a rollback failure silently.
        if let Err(rb_err) = view.tx.into_inner().rollback().await {
          tracing::warn!(error = %rb_err, "rollback after failed atomic scope also failed");
        }
        Err(err)
      }
    }
  }
}

// --- Transactional view handed to atomic scopes ---

struct PgTxRepository {
  // One scope drives the transaction sequentially; the mutex satisfies the
  // shared-reference trait surface.
  tx: AsyncMutex<Transaction<'static, Postgres>>,
}

#[async_trait]
impl Repository for PgTxRepository {
  async fn find_customer_by_email(&self, email: &str) -> CoreResult<Option<Customer>> {
    let mut tx = self.tx.lock().await;
    find_customer_by_email_on(&mut tx, email).await
  }

  async fn find_customer_by_id(&self, id: Uuid) -> CoreResult<Option<Customer>> {
    let mut tx = self.tx.lock().await;
    find_customer_by_id_on(&mut tx, id).await
  }

  async fn find_products_by_ids(&self, ids: &[Uuid]) -> CoreResult<Vec<Product>> {
    let mut tx = self.tx.lock().await;
    find_products_by_ids_on(&mut tx, ids).await
  }

  async fn find_products_below_stock(&self, threshold: i64) -> CoreResult<Vec<Product>> {
    let mut tx = self.tx.lock().await;
    find_products_below_stock_on(&mut tx, threshold).await
  }

  async fn insert_customer(&self, draft: NewCustomer) -> CoreResult<Customer> {
    let mut tx = self.tx.lock().await;
    insert_customer_on(&mut tx, &draft).await
  }

  async fn insert_product(&self, draft: NewProduct) -> CoreResult<Product> {
    let mut tx = self.tx.lock().await;
    insert_product_on(&mut tx, &draft).await
  }

  async fn insert_order_with_associations(
    &self,
    order: AssembledOrder,
    products: &[Product],
  ) -> CoreResult<Order> {
    let mut tx = self.tx.lock().await;
    insert_order_on(&mut tx, &order, products).await
  }

  async fn update_product_stock(&self, id: Uuid, new_stock: i64) -> CoreResult<Product> {
    let mut tx = self.tx.lock().await;
    update_product_stock_on(&mut tx, id, new_stock).await
  }

  async fn list_customers(&self) -> CoreResult<Vec<Customer>> {
    let mut tx = self.tx.lock().await;
    list_customers_on(&mut tx).await
  }

  async fn list_products(&self) -> CoreResult<Vec<Product>> {
    let mut tx = self.tx.lock().await;
    list_products_on(&mut tx).await
  }

  async fn list_orders(&self) -> CoreResult<Vec<Order>> {
    let mut tx = self.tx.lock().await;
    list_orders_on(&mut tx).await
  }

  async fn run_atomic(&self, scope: AtomicScope) -> CoreResult<()> {
    // Already inside a transaction: a nested scope joins it instead of
    // opening a savepoint of its own.
    scope(self).await
  }
}
