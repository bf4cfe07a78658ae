// crm-server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::ApiError;
use crate::state::AppState;
use crm_core::NewOrder;

#[instrument(
  name = "handler::create_order",
  skip(app_state, payload),
  fields(customer_id = %payload.customer_id, requested = payload.product_ids.len())
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<NewOrder>,
) -> Result<HttpResponse, ApiError> {
  let order = app_state.crm.create_order(payload.into_inner()).await?;
  info!(order_id = %order.id, total = %order.total_amount, "order created");

  Ok(HttpResponse::Created().json(json!({
      "message": "Order created successfully.",
      "order": order
  })))
}

#[instrument(name = "handler::list_orders", skip(app_state))]
pub async fn list_orders_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
  let orders = app_state.crm.list_orders().await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}
