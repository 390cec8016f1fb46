//! Ping Handler - 健康检查

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::infrastructure::http::dto::ApiResponse;

/// Ping 响应
#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
    /// 服务端当前时间，前端据此判断投票阶段
    pub server_time: DateTime<Utc>,
}

/// Ping endpoint
pub async fn ping() -> Json<ApiResponse<PingResponse>> {
    Json(ApiResponse::success(PingResponse {
        status: "ok",
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        server_time: Utc::now(),
    }))
}
