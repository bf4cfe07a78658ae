// crm-server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::ApiError;
use crate::state::AppState;
use crm_core::NewProduct;

#[instrument(name = "handler::create_product", skip(app_state, payload))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<NewProduct>,
) -> Result<HttpResponse, ApiError> {
  let product = app_state.crm.create_product(payload.into_inner()).await?;
  info!(product_id = %product.id, "product created");

  Ok(HttpResponse::Created().json(json!({
      "message": "Product created successfully.",
      "product": product
  })))
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
  let products = app_state.crm.list_products().await?;
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}
