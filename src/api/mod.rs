//! API 模块
//!
//! 提供 REST API 支持。路径与原有移动客户端保持一致，没有版本前缀。

#[cfg(test)]
mod api_tests;
pub mod app_state;
pub mod dto;
pub mod extract;
pub mod handlers;
pub mod routes;

use crate::api::app_state::AppState;
use crate::error::{AppError, ErrorResponse};
use crate::observability::metrics_middleware;
use axum::{
    Json, Router,
    extract::Request,
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(app_state: AppState) -> Router {
    let metrics = app_state.metrics.clone();

    Router::new()
        .merge(routes::admin_routes::create_admin_router())
        .merge(routes::student_routes::create_student_router())
        .fallback(route_not_found)
        .layer(middleware::from_fn(method_not_allowed_envelope))
        .layer(middleware::from_fn_with_state(metrics, metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

/// 路径存在但方法不匹配时，把 405 包装成错误信封，保留 `Allow` 头
async fn method_not_allowed_envelope(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    tracing::debug!("method not allowed");
    let allow = response.headers().get(header::ALLOW).cloned();
    let mut envelope = (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method not allowed")),
    )
        .into_response();
    if let Some(allow) = allow {
        envelope.headers_mut().insert(header::ALLOW, allow);
    }
    envelope
}
