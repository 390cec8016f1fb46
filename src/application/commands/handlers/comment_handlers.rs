//! Comment Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::assembler::CommentView;
use crate::application::commands::{DeleteComment, PostComment, ReactToComment};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    CommentRecord, CommentRepositoryPort, PollRepositoryPort, RepositoryError,
};
use crate::domain::ballot::{Fingerprint, VoterIdentity};
use crate::domain::comment::{AuthorName, CommentBody, ReactionKind};

// ============================================================================
// PostComment
// ============================================================================

/// PostComment Handler
pub struct PostCommentHandler {
    poll_repo: Arc<dyn PollRepositoryPort>,
    comment_repo: Arc<dyn CommentRepositoryPort>,
}

impl PostCommentHandler {
    pub fn new(
        poll_repo: Arc<dyn PollRepositoryPort>,
        comment_repo: Arc<dyn CommentRepositoryPort>,
    ) -> Self {
        Self {
            poll_repo,
            comment_repo,
        }
    }

    pub async fn handle(&self, command: PostComment) -> Result<CommentView, ApplicationError> {
        self.poll_repo
            .find_by_id(command.poll_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Poll", command.poll_id))?;

        let body = CommentBody::new(command.content)?;
        let author = AuthorName::new(command.author)?;
        let fingerprint =
            Fingerprint::resolve(command.fingerprint.as_deref(), command.components.as_ref())?;
        let commenter = VoterIdentity::new(fingerprint, command.ip_address);

        let comment = CommentRecord {
            id: Uuid::new_v4(),
            poll_id: command.poll_id,
            author: author.as_str().to_string(),
            content: body.as_str().to_string(),
            fingerprint: commenter.fingerprint().to_string(),
            ip_address: commenter.ip_address().to_string(),
            likes: 0,
            dislikes: 0,
            created_at: Utc::now(),
        };
        self.comment_repo.save(&comment).await?;

        tracing::info!(
            comment_id = %comment.id,
            poll_id = %comment.poll_id,
            "Comment posted"
        );

        Ok(CommentView::from(comment))
    }
}

// ============================================================================
// ReactToComment
// ============================================================================

/// ReactToComment Handler
pub struct ReactToCommentHandler {
    comment_repo: Arc<dyn CommentRepositoryPort>,
}

impl ReactToCommentHandler {
    pub fn new(comment_repo: Arc<dyn CommentRepositoryPort>) -> Self {
        Self { comment_repo }
    }

    pub async fn handle(&self, command: ReactToComment) -> Result<CommentView, ApplicationError> {
        let reaction = ReactionKind::parse(&command.reaction)?;
        let fingerprint =
            Fingerprint::resolve(command.fingerprint.as_deref(), command.components.as_ref())?;

        match self
            .comment_repo
            .react(command.comment_id, fingerprint.as_str(), reaction)
            .await
        {
            Ok(updated) => {
                tracing::debug!(
                    comment_id = %command.comment_id,
                    reaction = reaction.as_str(),
                    "Comment reaction recorded"
                );
                Ok(CommentView::from(updated))
            }
            Err(RepositoryError::Duplicate(_)) => Err(ApplicationError::conflict(
                "You have already reacted to this comment",
            )),
            Err(RepositoryError::NotFound(_)) => {
                Err(ApplicationError::not_found("Comment", command.comment_id))
            }
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// DeleteComment
// ============================================================================

/// DeleteComment Handler - 管理员删除评论
pub struct DeleteCommentHandler {
    comment_repo: Arc<dyn CommentRepositoryPort>,
}

impl DeleteCommentHandler {
    pub fn new(comment_repo: Arc<dyn CommentRepositoryPort>) -> Self {
        Self { comment_repo }
    }

    pub async fn handle(&self, command: DeleteComment) -> Result<(), ApplicationError> {
        let comment_id = command.comment_id;

        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Comment", comment_id))?;

        self.comment_repo.delete(comment_id).await?;

        tracing::info!(
            comment_id = %comment_id,
            poll_id = %comment.poll_id,
            "Comment deleted"
        );

        Ok(())
    }
}
