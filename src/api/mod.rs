// ============================================================================
// Request Handling Layer
// ============================================================================
//
// Thin HTTP glue over the order store and lifecycle:
//
//   GET    /                liveness
//   GET    /health          backend ping
//   GET    /metrics         Prometheus exposition
//   POST   /orders          create
//   GET    /orders?cursor=N list
//   GET    /orders/{id}     find
//   PUT    /orders/{id}     status transition
//   DELETE /orders/{id}     delete
//
// ============================================================================

mod errors;
mod handlers;

use actix_web::web;
use std::sync::Arc;

use crate::metrics::Metrics;
use crate::store::OrderStore;

pub use errors::ApiError;

/// Shared per-process state handed to every handler
pub struct AppState {
    pub store: OrderStore,
    pub metrics: Arc<Metrics>,
    pub page_size: u64,
}

impl AppState {
    pub fn new(store: OrderStore, metrics: Arc<Metrics>, page_size: u64) -> Self {
        Self {
            store,
            metrics,
            page_size,
        }
    }
}

/// Malformed JSON bodies answer with the same error shape as everything else
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::root))
        .route("/health", web::get().to(handlers::health))
        .route("/metrics", web::get().to(handlers::metrics_handler))
        .service(
            web::scope("/orders")
                .service(
                    web::resource(["", "/"])
                        .route(web::post().to(handlers::create_order))
                        .route(web::get().to(handlers::list_orders)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(handlers::find_order))
                        .route(web::put().to(handlers::update_order))
                        .route(web::delete().to(handlers::delete_order)),
                ),
        );
}
