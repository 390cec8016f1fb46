//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::RepositoryError;
use crate::domain::ballot::BallotError;
use crate::domain::comment::CommentError;
use crate::domain::poll::PollError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: Uuid,
    },

    /// 仓储层报告的记录缺失（并发删除等）
    #[error("Not found: {0}")]
    EntityNotFound(String),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 业务规则违反
    #[error("Business rule violation: {0}")]
    BusinessRuleViolation(String),

    /// 与已有数据冲突（重复投票、重复表态）
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource_type, id }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建业务规则违反错误
    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRuleViolation(message.into())
    }

    /// 创建冲突错误
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => Self::EntityNotFound(msg),
            RepositoryError::Duplicate(msg) => Self::Conflict(msg),
            e => Self::RepositoryError(e.to_string()),
        }
    }
}

impl From<PollError> for ApplicationError {
    fn from(err: PollError) -> Self {
        match err {
            PollError::OptionNotFound(id) => Self::not_found("Option", *id.as_uuid()),
            e if e.is_validation() => Self::ValidationError(e.to_string()),
            e => Self::BusinessRuleViolation(e.to_string()),
        }
    }
}

impl From<BallotError> for ApplicationError {
    fn from(err: BallotError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<CommentError> for ApplicationError {
    fn from(err: CommentError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::poll::OptionId;

    #[test]
    fn test_poll_errors_are_classified() {
        assert!(matches!(
            ApplicationError::from(PollError::InvalidTitle("x".into())),
            ApplicationError::ValidationError(_)
        ));
        assert!(matches!(
            ApplicationError::from(PollError::Ended),
            ApplicationError::BusinessRuleViolation(_)
        ));
        assert!(matches!(
            ApplicationError::from(PollError::OptionNotFound(OptionId::new())),
            ApplicationError::NotFound { resource_type: "Option", .. }
        ));
    }

    #[test]
    fn test_repository_errors_are_classified() {
        assert!(matches!(
            ApplicationError::from(RepositoryError::Duplicate("option position 2".into())),
            ApplicationError::Conflict(_)
        ));
        assert!(matches!(
            ApplicationError::from(RepositoryError::NotFound("poll 42".into())),
            ApplicationError::EntityNotFound(_)
        ));
        assert!(matches!(
            ApplicationError::from(RepositoryError::DatabaseError("locked".into())),
            ApplicationError::RepositoryError(_)
        ));
    }
}
