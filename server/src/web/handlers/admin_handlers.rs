// crm-server/src/web/handlers/admin_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::ApiError;
use crate::state::AppState;

/// Manual trigger for the restock pass, alongside the scheduled one.
#[instrument(name = "handler::restock", skip(app_state))]
pub async fn restock_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
  let restocked = app_state.crm.restock_low_stock().await?;
  info!(count = restocked.updated.len(), "manual restock finished");

  Ok(HttpResponse::Ok().json(json!({
      "message": restocked.message,
      "updated": restocked.updated
  })))
}

#[instrument(name = "handler::activity_report", skip(app_state))]
pub async fn activity_report_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
  let report = app_state.crm.activity_report().await?;
  Ok(HttpResponse::Ok().json(json!({ "report": report })))
}
