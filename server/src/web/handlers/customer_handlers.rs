// crm-server/src/web/handlers/customer_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::ApiError;
use crate::state::AppState;
use crm_core::NewCustomer;

#[derive(Deserialize, Debug)]
pub struct BulkCustomersRequest {
  pub customers: Vec<NewCustomer>,
}

#[instrument(name = "handler::create_customer", skip(app_state, payload))]
pub async fn create_customer_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<NewCustomer>,
) -> Result<HttpResponse, ApiError> {
  let customer = app_state.crm.create_customer(payload.into_inner()).await?;
  info!(customer_id = %customer.id, "customer created");

  Ok(HttpResponse::Created().json(json!({
      "message": "Customer created successfully.",
      "customer": customer
  })))
}

#[instrument(name = "handler::bulk_create_customers", skip(app_state, payload), fields(candidates = payload.customers.len()))]
pub async fn bulk_create_customers_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<BulkCustomersRequest>,
) -> Result<HttpResponse, ApiError> {
  let outcome = app_state.crm.bulk_create_customers(payload.into_inner().customers).await?;
  info!(
    created = outcome.created.len(),
    errors = outcome.errors.len(),
    "bulk customer creation finished"
  );

  // Success and partial failure are not mutually exclusive: both lists go
  // back to the caller, always.
  Ok(HttpResponse::Ok().json(json!({
      "customers": outcome.created,
      "errors": outcome.error_messages()
  })))
}

#[instrument(name = "handler::list_customers", skip(app_state))]
pub async fn list_customers_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
  let customers = app_state.crm.list_customers().await?;
  Ok(HttpResponse::Ok().json(json!({ "customers": customers })))
}
