//! Poll HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    GetPoll, GetPollResults, ListPolls, PollResultsView, PollView,
};
use crate::infrastructure::http::dto::{ApiResponse, IdRequest, ListPollsParams};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, ApiQuery};
use crate::infrastructure::http::state::AppState;

/// 获取投票列表
pub async fn list_polls(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListPollsParams>,
) -> Result<Json<ApiResponse<Vec<PollView>>>, ApiError> {
    let polls = state
        .list_polls_handler
        .handle(ListPolls {
            active_only: params.active_only,
        })
        .await?;

    Ok(Json(ApiResponse::success(polls)))
}

/// 获取投票详情（含选项）
pub async fn get_poll(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<IdRequest>,
) -> Result<Json<ApiResponse<PollView>>, ApiError> {
    let poll = state
        .get_poll_handler
        .handle(GetPoll { poll_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(poll)))
}

/// 获取投票结果
pub async fn get_results(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<IdRequest>,
) -> Result<Json<ApiResponse<PollResultsView>>, ApiError> {
    let results = state
        .get_poll_results_handler
        .handle(GetPollResults { poll_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(results)))
}
