//! Comment Queries

use uuid::Uuid;

/// 列出投票下的评论
#[derive(Debug, Clone)]
pub struct ListComments {
    pub poll_id: Uuid,
}
