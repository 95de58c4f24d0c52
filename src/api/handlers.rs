use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::future::Future;
use uuid::Uuid;

use super::errors::ApiError;
use super::AppState;
use crate::domain::order::{transition_str, LineItem, Order, OrderStatus};
use crate::metrics::Metrics;
use crate::store::ListPage;

// ============================================================================
// Request / Response Payloads
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub items: Vec<Order>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<u64>,
}

// ============================================================================
// Helpers
// ============================================================================

async fn timed<T>(metrics: &Metrics, operation: &str, fut: impl Future<Output = T>) -> T {
    let _timer = metrics.store_timer(operation);
    fut.await
}

fn failed(operation: &'static str, order_id: Option<u64>, error: impl Into<ApiError>) -> ApiError {
    let error = error.into();
    error.log(operation, order_id);
    error
}

fn parse_order_id(operation: &'static str, raw: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| failed(operation, None, ApiError::BadRequest(format!("Invalid order id: {:?}", raw))))
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn root() -> HttpResponse {
    HttpResponse::Ok().finish()
}

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    match state.store.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "service": "orders-api",
            "backend": state.store.backend_name(),
        })),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "service": "orders-api",
                "backend": state.store.backend_name(),
            }))
        }
    }
}

pub async fn metrics_handler(state: web::Data<AppState>) -> HttpResponse {
    match state.metrics.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let order = Order::new(body.customer_id, body.line_items);

    timed(&state.metrics, "insert", state.store.insert(&order))
        .await
        .map_err(|e| failed("create", Some(order.order_id), e))?;

    tracing::info!(
        order_id = order.order_id,
        customer_id = %order.customer_id,
        item_count = order.line_items.len(),
        "Created order"
    );

    Ok(HttpResponse::Created().json(order))
}

pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let offset = match query.cursor.as_deref() {
        None | Some("") => 0,
        Some(raw) => raw.parse().map_err(|_| {
            failed("list", None, ApiError::BadRequest(format!("Invalid cursor: {:?}", raw)))
        })?,
    };

    let page = timed(
        &state.metrics,
        "list",
        state.store.list(ListPage {
            offset,
            size: state.page_size,
        }),
    )
    .await
    .map_err(|e| failed("list", None, e))?;

    Ok(HttpResponse::Ok().json(ListResponse {
        items: page.orders,
        next: page.next,
    }))
}

pub async fn find_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let order_id = parse_order_id("find", &path)?;

    let order = timed(&state.metrics, "find", state.store.find(order_id))
        .await
        .map_err(|e| failed("find", Some(order_id), e))?;

    Ok(HttpResponse::Ok().json(order))
}

pub async fn update_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, ApiError> {
    let order_id = parse_order_id("update", &path)?;

    let current = timed(&state.metrics, "find", state.store.find(order_id))
        .await
        .map_err(|e| failed("update", Some(order_id), e))?;

    let target = body
        .status
        .parse::<OrderStatus>()
        .map(|status| status.as_str())
        .unwrap_or("unknown");

    let next = match transition_str(&current, &body.status, Utc::now()) {
        Ok(next) => next,
        Err(e) => {
            state.metrics.record_transition(target, "rejected");
            return Err(failed("update", Some(order_id), e));
        }
    };

    // Conditional write: a concurrent update since the read fails with Conflict
    timed(&state.metrics, "update", state.store.update_from(&current, &next))
        .await
        .map_err(|e| {
            state.metrics.record_transition(target, "failed");
            failed("update", Some(order_id), e)
        })?;

    state.metrics.record_transition(target, "applied");
    tracing::info!(order_id, status = target, "Updated order status");

    Ok(HttpResponse::Ok().json(next))
}

pub async fn delete_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let order_id = parse_order_id("delete", &path)?;

    timed(&state.metrics, "delete", state.store.delete(order_id))
        .await
        .map_err(|e| failed("delete", Some(order_id), e))?;

    tracing::info!(order_id, "Deleted order");

    Ok(HttpResponse::NoContent().finish())
}

// ============================================================================
// Unit Tests
// ============================================================================
