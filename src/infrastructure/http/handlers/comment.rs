//! Comment HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{CommentView, ListComments, PostComment, ReactToComment};
use crate::infrastructure::http::client_ip::ClientIp;
use crate::infrastructure::http::dto::{
    ApiResponse, ListCommentsRequest, PostCommentRequest, ReactRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::ApiJson;
use crate::infrastructure::http::state::AppState;

/// 获取投票下的评论
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ListCommentsRequest>,
) -> Result<Json<ApiResponse<Vec<CommentView>>>, ApiError> {
    let comments = state
        .list_comments_handler
        .handle(ListComments {
            poll_id: req.poll_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(comments)))
}

/// 发表评论
pub async fn post_comment(
    State(state): State<Arc<AppState>>,
    ClientIp(ip_address): ClientIp,
    ApiJson(req): ApiJson<PostCommentRequest>,
) -> Result<Json<ApiResponse<CommentView>>, ApiError> {
    let command = PostComment {
        poll_id: req.poll_id,
        author: req.author,
        content: req.content,
        fingerprint: req.fingerprint,
        components: req.components,
        ip_address,
    };

    let comment = state.post_comment_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(comment)))
}

/// 点赞 / 点踩
pub async fn react(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ReactRequest>,
) -> Result<Json<ApiResponse<CommentView>>, ApiError> {
    let command = ReactToComment {
        comment_id: req.comment_id,
        reaction: req.reaction,
        fingerprint: req.fingerprint,
        components: req.components,
    };

    let comment = state.react_to_comment_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(comment)))
}
