//! Poll Context - Errors

use thiserror::Error;

use super::OptionId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PollError {
    #[error("无效的标题: {0}")]
    InvalidTitle(String),

    #[error("无效的描述: {0}")]
    InvalidDescription(String),

    #[error("无效的选项: {0}")]
    InvalidOption(String),

    #[error("选项数量不足: 至少需要 {min} 个，实际 {actual} 个")]
    TooFewOptions { min: usize, actual: usize },

    #[error("选项数量过多: 最多 {max} 个")]
    TooManyOptions { max: usize },

    #[error("选项重复: {0}")]
    DuplicateOption(String),

    #[error("无效的时间窗口: {0}")]
    InvalidSchedule(String),

    #[error("投票已被停用")]
    Inactive,

    #[error("投票尚未开始")]
    NotStarted,

    #[error("投票已结束")]
    Ended,

    #[error("选项不存在: {0}")]
    OptionNotFound(OptionId),
}

impl PollError {
    /// 是否属于输入校验类错误
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PollError::InvalidTitle(_)
                | PollError::InvalidDescription(_)
                | PollError::InvalidOption(_)
                | PollError::TooFewOptions { .. }
                | PollError::TooManyOptions { .. }
                | PollError::DuplicateOption(_)
                | PollError::InvalidSchedule(_)
        )
    }
}
