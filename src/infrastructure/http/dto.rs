//! Data Transfer Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::poll::PollKind;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self::success(Empty {})
    }
}

// ============================================================================
// 通用请求
// ============================================================================

/// 按 ID 操作的请求（获取、删除、重新计票）
#[derive(Debug, Deserialize)]
pub struct IdRequest {
    pub id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListPollsParams {
    #[serde(default)]
    pub active_only: bool,
}

// ============================================================================
// Vote DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CastVoteRequest {
    pub poll_id: Uuid,
    pub option_id: Uuid,
    pub fingerprint: Option<String>,
    pub components: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
pub struct VoteStatusRequest {
    pub poll_id: Uuid,
    pub fingerprint: Option<String>,
    pub components: Option<BTreeMap<String, String>>,
}

// ============================================================================
// Comment DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListCommentsRequest {
    pub poll_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct PostCommentRequest {
    pub poll_id: Uuid,
    pub author: Option<String>,
    pub content: String,
    pub fingerprint: Option<String>,
    pub components: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
pub struct ReactRequest {
    pub comment_id: Uuid,
    pub reaction: String,
    pub fingerprint: Option<String>,
    pub components: Option<BTreeMap<String, String>>,
}

// ============================================================================
// Admin DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OptionRequest {
    pub label: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePollRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub kind: PollKind,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub options: Vec<OptionRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePollRequest {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    /// 移除时间窗口，投票不再受时间限制
    #[serde(default)]
    pub clear_schedule: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub id: Uuid,
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct AddOptionRequest {
    pub poll_id: Uuid,
    pub label: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}
