//! HTTP Middleware
//!
//! - HTTP 状态码错误日志中间件
//! - 管理接口令牌校验

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::error::ApiError;
use super::state::AppState;

/// HTTP 状态码错误日志中间件
///
/// 拦截 HTTP 响应，当状态码为 4xx 或 5xx 时记录日志
/// 注意：业务错误的详细信息在 ApiError::into_response() 中记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP client error"
        );
    }

    response
}

/// 管理接口令牌校验
///
/// 要求 `Authorization: Bearer <token>` 与配置的 `admin.token` 一致。
/// 未配置令牌时管理接口整体关闭（403）。
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let expected = state
        .access
        .admin_token
        .as_deref()
        .ok_or_else(|| ApiError::Forbidden("Admin API is disabled".to_string()))?;

    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    match provided {
        Some(token) if token_matches(token, expected) => Ok(next.run(request).await),
        Some(_) => Err(ApiError::Unauthorized("Invalid admin token".to_string())),
        None => Err(ApiError::Unauthorized("Missing admin token".to_string())),
    }
}

/// 比较令牌摘要，耗时与令牌内容和长度无关
fn token_matches(provided: &str, expected: &str) -> bool {
    let a = md5::compute(provided.as_bytes());
    let b = md5::compute(expected.as_bytes());
    a.0.iter().zip(b.0.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
