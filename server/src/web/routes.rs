// crm-server/src/web/routes.rs

use actix_web::web;

// Liveness probe; storage health is left to the jobs' own logging.
async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// This function is called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1") // Base path for API version 1
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Customer Routes
      .service(
        web::scope("/customers")
          .route(
            "",
            web::post().to(crate::web::handlers::customer_handlers::create_customer_handler),
          )
          .route(
            "",
            web::get().to(crate::web::handlers::customer_handlers::list_customers_handler),
          )
          .route(
            "/bulk",
            web::post().to(crate::web::handlers::customer_handlers::bulk_create_customers_handler),
          ),
      )
      // Product Routes
      .service(
        web::scope("/products")
          .route(
            "",
            web::post().to(crate::web::handlers::product_handlers::create_product_handler),
          )
          .route(
            "",
            web::get().to(crate::web::handlers::product_handlers::list_products_handler),
          ),
      )
      // Order Routes
      .service(
        web::scope("/orders")
          .route(
            "",
            web::post().to(crate::web::handlers::order_handlers::create_order_handler),
          )
          .route(
            "",
            web::get().to(crate::web::handlers::order_handlers::list_orders_handler),
          ),
      )
      // Report + Admin Routes
      .route(
        "/report",
        web::get().to(crate::web::handlers::admin_handlers::activity_report_handler),
      )
      .service(web::scope("/admin").route(
        "/restock",
        web::post().to(crate::web::handlers::admin_handlers::restock_handler),
      )),
  );
}
