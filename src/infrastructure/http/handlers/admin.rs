//! Admin HTTP Handlers
//!
//! 全部挂在 `require_admin` 之后

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    AddPollOption, CreatePoll, DeleteComment, DeletePoll, NewOption, OptionView, PollView,
    RecountPoll, RecountResponse, SetPollActive, UpdatePoll,
};
use crate::infrastructure::http::dto::{
    AddOptionRequest, ApiResponse, CreatePollRequest, Empty, IdRequest, SetActiveRequest,
    UpdatePollRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::ApiJson;
use crate::infrastructure::http::state::AppState;

/// 创建投票
pub async fn create_poll(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreatePollRequest>,
) -> Result<Json<ApiResponse<PollView>>, ApiError> {
    let command = CreatePoll {
        title: req.title,
        description: req.description,
        kind: req.kind,
        starts_at: req.starts_at,
        ends_at: req.ends_at,
        options: req
            .options
            .into_iter()
            .map(|o| NewOption {
                label: o.label,
                description: o.description,
                image_url: o.image_url,
            })
            .collect(),
    };

    let poll = state.create_poll_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(poll)))
}

/// 修改标题、描述或时间窗口
pub async fn update_poll(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<UpdatePollRequest>,
) -> Result<Json<ApiResponse<PollView>>, ApiError> {
    let command = UpdatePoll {
        poll_id: req.id,
        title: req.title,
        description: req.description,
        starts_at: req.starts_at,
        ends_at: req.ends_at,
        clear_schedule: req.clear_schedule,
    };

    let poll = state.update_poll_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(poll)))
}

/// 启用 / 停用投票
pub async fn set_active(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SetActiveRequest>,
) -> Result<Json<ApiResponse<PollView>>, ApiError> {
    let poll = state
        .set_poll_active_handler
        .handle(SetPollActive {
            poll_id: req.id,
            active: req.active,
        })
        .await?;

    Ok(Json(ApiResponse::success(poll)))
}

/// 追加选项
pub async fn add_option(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<AddOptionRequest>,
) -> Result<Json<ApiResponse<OptionView>>, ApiError> {
    let command = AddPollOption {
        poll_id: req.poll_id,
        option: NewOption {
            label: req.label,
            description: req.description,
            image_url: req.image_url,
        },
    };

    let option = state.add_poll_option_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(option)))
}

/// 删除投票
pub async fn delete_poll(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<IdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_poll_handler
        .handle(DeletePoll { poll_id: req.id })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 重新计票
pub async fn recount(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<IdRequest>,
) -> Result<Json<ApiResponse<RecountResponse>>, ApiError> {
    let result = state
        .recount_poll_handler
        .handle(RecountPoll { poll_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// 删除评论
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<IdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_comment_handler
        .handle(DeleteComment { comment_id: req.id })
        .await?;

    Ok(Json(ApiResponse::ok()))
}
