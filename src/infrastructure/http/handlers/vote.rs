//! Vote HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{CastVote, GetVoteStatus, VoteReceipt, VoteStatusResponse};
use crate::infrastructure::http::client_ip::ClientIp;
use crate::infrastructure::http::dto::{ApiResponse, CastVoteRequest, VoteStatusRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::ApiJson;
use crate::infrastructure::http::state::AppState;

/// 投票
pub async fn cast_vote(
    State(state): State<Arc<AppState>>,
    ClientIp(ip_address): ClientIp,
    ApiJson(req): ApiJson<CastVoteRequest>,
) -> Result<Json<ApiResponse<VoteReceipt>>, ApiError> {
    let command = CastVote {
        poll_id: req.poll_id,
        option_id: req.option_id,
        fingerprint: req.fingerprint,
        components: req.components,
        ip_address,
    };

    let receipt = state.cast_vote_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(receipt)))
}

/// 查询当前投票人是否已投票
pub async fn vote_status(
    State(state): State<Arc<AppState>>,
    ClientIp(ip_address): ClientIp,
    ApiJson(req): ApiJson<VoteStatusRequest>,
) -> Result<Json<ApiResponse<VoteStatusResponse>>, ApiError> {
    let query = GetVoteStatus {
        poll_id: req.poll_id,
        fingerprint: req.fingerprint,
        components: req.components,
        ip_address,
    };

    let status = state.get_vote_status_handler.handle(query).await?;
    Ok(Json(ApiResponse::success(status)))
}
