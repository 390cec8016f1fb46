//! Comment Context - Value Objects

use serde::{Deserialize, Serialize};

use super::CommentError;

/// 未填写昵称时的默认作者名
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// 评论正文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentBody(String);

impl CommentBody {
    pub fn new(content: impl Into<String>) -> Result<Self, CommentError> {
        let content = content.into().trim().to_string();
        if content.is_empty() {
            return Err(CommentError::InvalidContent("评论不能为空".to_string()));
        }
        if content.chars().count() > 1000 {
            return Err(CommentError::InvalidContent(
                "评论长度不能超过1000字符".to_string(),
            ));
        }
        Ok(Self(content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 评论者昵称
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorName(String);

impl AuthorName {
    /// 空白或缺省时回落为 [`DEFAULT_AUTHOR`]
    pub fn new(name: Option<String>) -> Result<Self, CommentError> {
        let name = name.map(|n| n.trim().to_string()).unwrap_or_default();
        if name.is_empty() {
            return Ok(Self(DEFAULT_AUTHOR.to_string()));
        }
        if name.chars().count() > 50 {
            return Err(CommentError::InvalidAuthor(
                "昵称长度不能超过50字符".to_string(),
            ));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 对评论的表态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Dislike => "dislike",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CommentError> {
        match s.trim().to_lowercase().as_str() {
            "like" => Ok(ReactionKind::Like),
            "dislike" => Ok(ReactionKind::Dislike),
            other => Err(CommentError::UnknownReaction(other.to_string())),
        }
    }
}
