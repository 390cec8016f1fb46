//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    AddPollOptionHandler, CastVoteHandler, CreatePollHandler, DeleteCommentHandler,
    DeletePollHandler, PostCommentHandler, ReactToCommentHandler, RecountPollHandler,
    SetPollActiveHandler, UpdatePollHandler,
    // Query handlers
    GetPollHandler, GetPollResultsHandler, GetVoteStatusHandler, ListCommentsHandler,
    ListPollsHandler,
    // Ports
    CommentRepositoryPort, PollRepositoryPort, VoteRepositoryPort,
};
use crate::domain::ballot::DedupPolicy;

/// 与请求来源相关的设置（去重策略、管理员令牌、代理头）
#[derive(Debug, Clone, Default)]
pub struct AccessSettings {
    pub dedup_policy: DedupPolicy,
    /// 未配置时管理接口全部返回 403
    pub admin_token: Option<String>,
    /// 是否信任 X-Forwarded-For / X-Real-IP
    pub trust_proxy_headers: bool,
}

/// 应用状态
pub struct AppState {
    pub access: AccessSettings,

    // ========== Command Handlers ==========
    pub create_poll_handler: CreatePollHandler,
    pub update_poll_handler: UpdatePollHandler,
    pub set_poll_active_handler: SetPollActiveHandler,
    pub add_poll_option_handler: AddPollOptionHandler,
    pub delete_poll_handler: DeletePollHandler,
    pub recount_poll_handler: RecountPollHandler,
    pub cast_vote_handler: CastVoteHandler,
    pub post_comment_handler: PostCommentHandler,
    pub react_to_comment_handler: ReactToCommentHandler,
    pub delete_comment_handler: DeleteCommentHandler,

    // ========== Query Handlers ==========
    pub get_poll_handler: GetPollHandler,
    pub list_polls_handler: ListPollsHandler,
    pub get_poll_results_handler: GetPollResultsHandler,
    pub get_vote_status_handler: GetVoteStatusHandler,
    pub list_comments_handler: ListCommentsHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        poll_repo: Arc<dyn PollRepositoryPort>,
        vote_repo: Arc<dyn VoteRepositoryPort>,
        comment_repo: Arc<dyn CommentRepositoryPort>,
        access: AccessSettings,
    ) -> Self {
        let policy = access.dedup_policy;

        Self {
            access,

            // Command handlers
            create_poll_handler: CreatePollHandler::new(poll_repo.clone()),
            update_poll_handler: UpdatePollHandler::new(poll_repo.clone()),
            set_poll_active_handler: SetPollActiveHandler::new(poll_repo.clone()),
            add_poll_option_handler: AddPollOptionHandler::new(poll_repo.clone()),
            delete_poll_handler: DeletePollHandler::new(poll_repo.clone()),
            recount_poll_handler: RecountPollHandler::new(poll_repo.clone(), vote_repo.clone()),
            cast_vote_handler: CastVoteHandler::new(poll_repo.clone(), vote_repo.clone(), policy),
            post_comment_handler: PostCommentHandler::new(poll_repo.clone(), comment_repo.clone()),
            react_to_comment_handler: ReactToCommentHandler::new(comment_repo.clone()),
            delete_comment_handler: DeleteCommentHandler::new(comment_repo.clone()),

            // Query handlers
            get_poll_handler: GetPollHandler::new(poll_repo.clone()),
            list_polls_handler: ListPollsHandler::new(poll_repo.clone()),
            get_poll_results_handler: GetPollResultsHandler::new(
                poll_repo.clone(),
                vote_repo.clone(),
            ),
            get_vote_status_handler: GetVoteStatusHandler::new(
                poll_repo.clone(),
                vote_repo,
                policy,
            ),
            list_comments_handler: ListCommentsHandler::new(poll_repo, comment_repo),
        }
    }
}
