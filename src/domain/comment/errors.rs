//! Comment Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommentError {
    #[error("无效的评论内容: {0}")]
    InvalidContent(String),

    #[error("无效的昵称: {0}")]
    InvalidAuthor(String),

    #[error("未知的表态类型: {0}")]
    UnknownReaction(String),
}
