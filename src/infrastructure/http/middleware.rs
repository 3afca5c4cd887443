//! HTTP Middleware
//!
//! 请求结果日志中间件

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

/// 请求结果日志中间件
///
/// 4xx 记为 warn，5xx 记为 error，附带路由模板和耗时。
/// 错误原因本身在 ApiError::into_response() 中记录。
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            route = %route,
            status = status.as_u16(),
            latency_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            route = %route,
            status = status.as_u16(),
            latency_ms,
            "HTTP client error"
        );
    } else {
        tracing::debug!(
            method = %method,
            route = %route,
            status = status.as_u16(),
            latency_ms,
            "HTTP request completed"
        );
    }

    response
}
