//! Comment Query Handlers

use std::sync::Arc;

use crate::application::assembler::CommentView;
use crate::application::error::ApplicationError;
use crate::application::ports::{CommentRepositoryPort, PollRepositoryPort};
use crate::application::queries::ListComments;

/// ListComments Handler
pub struct ListCommentsHandler {
    poll_repo: Arc<dyn PollRepositoryPort>,
    comment_repo: Arc<dyn CommentRepositoryPort>,
}

impl ListCommentsHandler {
    pub fn new(
        poll_repo: Arc<dyn PollRepositoryPort>,
        comment_repo: Arc<dyn CommentRepositoryPort>,
    ) -> Self {
        Self {
            poll_repo,
            comment_repo,
        }
    }

    pub async fn handle(&self, query: ListComments) -> Result<Vec<CommentView>, ApplicationError> {
        // 验证投票存在
        self.poll_repo
            .find_by_id(query.poll_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Poll", query.poll_id))?;

        let comments = self.comment_repo.find_by_poll(query.poll_id).await?;
        Ok(comments.into_iter().map(CommentView::from).collect())
    }
}
